//! 포트폴리오 구성 자산.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Percent;

/// 포트폴리오에 편입되는 자산 하나의 구성.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSpec {
    /// 자산 식별자 (실행 내에서 유일, 예: "QQQ", "069500")
    pub id: String,

    /// 목표 비중 (%, 0 ~ 100)
    pub weight: Percent,

    /// 레버리지 배수 (기본 1)
    #[serde(default = "default_leverage")]
    pub leverage: Decimal,
}

fn default_leverage() -> Decimal {
    Decimal::ONE
}

impl AssetSpec {
    /// 레버리지 1배 자산을 생성합니다.
    pub fn new(id: impl Into<String>, weight: Percent) -> Self {
        Self {
            id: id.into(),
            weight,
            leverage: default_leverage(),
        }
    }

    /// 레버리지 배수를 설정합니다.
    pub fn with_leverage(mut self, leverage: Decimal) -> Self {
        self.leverage = leverage;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_leverage_defaults_to_one() {
        let asset: AssetSpec = serde_json::from_str(r#"{"id": "QQQ", "weight": 50}"#).unwrap();
        assert_eq!(asset.leverage, Decimal::ONE);
        assert_eq!(asset.weight, dec!(50));

        let leveraged = AssetSpec::new("TQQQ", dec!(60)).with_leverage(dec!(3));
        assert_eq!(leveraged.leverage, dec!(3));
    }
}
