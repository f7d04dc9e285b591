//! 정밀한 금융 계산을 위한 Decimal 유틸리티.
//!
//! 금액, 비중, 등락률은 모두 `Decimal`로 다룹니다.
//! 비중과 등락률은 퍼센트 단위(50 = 50%)로 저장됩니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 금액 타입 (평가금액, 납입금 등).
pub type Amount = Decimal;

/// 퍼센트 타입 (1.5 = 1.5%).
pub type Percent = Decimal;

/// 비중 합계 비교에 사용하는 허용 오차.
pub const WEIGHT_EPSILON: Decimal = dec!(0.000000001);

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 퍼센트 값만큼의 몫을 반환합니다 (`self × pct / 100`).
    fn portion(&self, pct: Percent) -> Decimal;

    /// 레버리지를 적용한 등락률로 값을 갱신합니다.
    ///
    /// `self × (1 + change_pct / 100 × leverage)`
    fn apply_change(&self, change_pct: Percent, leverage: Decimal) -> Decimal;

    /// 퍼센트 문자열로 변환합니다 (예: "5.25%").
    fn to_percentage_string(&self) -> String;

    /// 허용 오차 내에서 같은지 확인합니다.
    fn approx_eq(&self, other: Decimal, epsilon: Decimal) -> bool;
}

impl DecimalExt for Decimal {
    fn portion(&self, pct: Percent) -> Decimal {
        *self * pct / Decimal::ONE_HUNDRED
    }

    fn apply_change(&self, change_pct: Percent, leverage: Decimal) -> Decimal {
        *self * (Decimal::ONE + change_pct / Decimal::ONE_HUNDRED * leverage)
    }

    fn to_percentage_string(&self) -> String {
        format!("{:.2}%", self)
    }

    fn approx_eq(&self, other: Decimal, epsilon: Decimal) -> bool {
        (*self - other).abs() <= epsilon
    }
}

/// 천 단위 구분 기호를 넣어 정수 금액 문자열로 변환합니다 (예: "1,234,567").
pub fn format_amount(amount: Amount) -> String {
    let rounded = amount.round();
    let digits = rounded.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", out)
    } else {
        out
    }
}
