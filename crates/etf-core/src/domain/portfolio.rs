//! 포트폴리오 상태.
//!
//! 자산별 날짜 → 평가금액 시계열과 누적 납입 원금을 관리합니다.
//! 어느 날짜든 자산별 평가금액의 합이 그 날의 포트폴리오 총액입니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Amount;

/// 백테스트 한 번이 단독으로 소유하는 포트폴리오 상태.
///
/// 자산은 식별자 정렬 순서로 순회됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    /// 자산별 평가금액 시계열
    holdings: BTreeMap<String, BTreeMap<NaiveDate, Amount>>,
    /// 누적 납입 원금 (초기 투자금 + 적립금)
    contributed: Amount,
}

impl PortfolioState {
    /// 빈 포트폴리오 상태를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 자산의 특정 날짜 평가금액을 기록합니다.
    pub fn set_amount(&mut self, asset_id: &str, date: NaiveDate, amount: Amount) {
        match self.holdings.get_mut(asset_id) {
            Some(history) => {
                history.insert(date, amount);
            }
            None => {
                self.holdings
                    .insert(asset_id.to_string(), BTreeMap::from([(date, amount)]));
            }
        }
    }

    /// 자산의 특정 날짜 평가금액을 조회합니다.
    pub fn amount(&self, asset_id: &str, date: NaiveDate) -> Option<Amount> {
        self.holdings
            .get(asset_id)
            .and_then(|history| history.get(&date))
            .copied()
    }

    /// 특정 날짜의 포트폴리오 총액 (자산별 평가금액 합계).
    pub fn total(&self, date: NaiveDate) -> Amount {
        self.holdings
            .values()
            .filter_map(|history| history.get(&date))
            .sum()
    }

    /// 특정 날짜의 자산별 평가금액 (식별자 정렬 순서).
    pub fn snapshot(&self, date: NaiveDate) -> Vec<(String, Amount)> {
        self.holdings
            .iter()
            .filter_map(|(id, history)| history.get(&date).map(|amount| (id.clone(), *amount)))
            .collect()
    }

    /// 납입 원금을 증가시킵니다.
    ///
    /// 납입 원금은 감소하지 않으므로 음수 금액은 무시됩니다.
    pub fn contribute(&mut self, amount: Amount) {
        if amount > Decimal::ZERO {
            self.contributed += amount;
        }
    }

    /// 누적 납입 원금.
    pub fn contributed(&self) -> Amount {
        self.contributed
    }

    /// 보유 자산 식별자 (정렬 순서).
    pub fn asset_ids(&self) -> impl Iterator<Item = &str> {
        self.holdings.keys().map(String::as_str)
    }

    /// 자산의 전체 평가금액 시계열.
    pub fn history(&self, asset_id: &str) -> Option<&BTreeMap<NaiveDate, Amount>> {
        self.holdings.get(asset_id)
    }

    /// 기록된 마지막 날짜.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.holdings
            .values()
            .filter_map(|history| history.keys().next_back())
            .max()
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, d).unwrap()
    }

    #[test]
    fn test_total_is_sum_of_assets() {
        let mut state = PortfolioState::new();
        state.set_amount("QQQ", date(3), dec!(600));
        state.set_amount("SHY", date(3), dec!(400));
        state.set_amount("QQQ", date(4), dec!(630));

        assert_eq!(state.total(date(3)), dec!(1000));
        assert_eq!(state.total(date(4)), dec!(630));
        assert_eq!(state.amount("SHY", date(4)), None);
        assert_eq!(state.last_date(), Some(date(4)));
    }

    #[test]
    fn test_snapshot_sorted_by_asset_id() {
        let mut state = PortfolioState::new();
        state.set_amount("ZZZ", date(3), dec!(1));
        state.set_amount("AAA", date(3), dec!(2));

        let ids: Vec<String> = state.snapshot(date(3)).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["AAA", "ZZZ"]);
        assert_eq!(state.asset_ids().collect::<Vec<_>>(), vec!["AAA", "ZZZ"]);
    }

    #[test]
    fn test_contributed_never_decreases() {
        let mut state = PortfolioState::new();
        state.contribute(dec!(1000));
        state.contribute(dec!(-50));
        state.contribute(dec!(200));
        assert_eq!(state.contributed(), dec!(1200));
    }
}
