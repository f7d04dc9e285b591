//! 자산 곡선(Equity Curve) 데이터 모듈
//!
//! 포트폴리오 총 평가금액의 일별 변화를 추적합니다.
//!
//! # 주요 기능
//!
//! - 일별 평가금액 추적
//! - 고점 및 최대 낙폭(MDD) 계산
//! - 연말 평가금액 집계
//!
//! 적립금 입금도 평가금액을 올리므로, 여기서의 낙폭은 납입 원금 대비가 아닌
//! 평가금액 고점 대비 하락률입니다.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use etf_core::Amount;

/// 단일 자산 곡선 데이터 포인트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct EquityPoint {
    /// 날짜
    date: NaiveDate,

    /// 포트폴리오 총 평가금액
    equity: Amount,

    /// 고점 대비 낙폭 (%)
    /// 0 이상의 값 (0 = 고점, 양수 = 하락 중)
    drawdown_pct: Decimal,
}

/// 연말 평가금액
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearEndValue {
    /// 연도
    pub year: i32,
    /// 해당 연도의 마지막 평가일
    pub date: NaiveDate,
    /// 평가금액
    pub equity: Amount,
}

/// 자산 곡선 데이터
///
/// 날짜 순으로 추가되는 포트폴리오 총 평가금액을 보관합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquityCurve {
    /// 시계열 데이터 포인트 (날짜순 정렬)
    points: Vec<EquityPoint>,

    /// 현재 고점 평가금액
    peak_equity: Amount,

    /// 최대 낙폭 (%)
    max_drawdown_pct: Decimal,

    /// 최대 낙폭 발생일
    max_drawdown_date: Option<NaiveDate>,
}

impl EquityCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// 고점 평가금액을 반환합니다.
    pub fn peak_equity(&self) -> Amount {
        self.peak_equity
    }

    /// 최대 Drawdown을 반환합니다 (%).
    pub fn max_drawdown(&self) -> Decimal {
        self.max_drawdown_pct
    }

    /// 최대 Drawdown 발생일을 반환합니다.
    pub fn max_drawdown_date(&self) -> Option<NaiveDate> {
        self.max_drawdown_date
    }

    /// 새로운 평가금액을 추가합니다.
    ///
    /// 날짜는 이전 포인트보다 뒤여야 합니다.
    pub fn add_point(&mut self, date: NaiveDate, equity: Amount) {
        debug_assert!(self.points.last().map_or(true, |p| p.date < date));

        // 고점 갱신
        if equity > self.peak_equity {
            self.peak_equity = equity;
        }

        let drawdown_pct = if self.peak_equity > Decimal::ZERO {
            (self.peak_equity - equity) / self.peak_equity * dec!(100)
        } else {
            Decimal::ZERO
        };

        // 최대 Drawdown 갱신
        if drawdown_pct > self.max_drawdown_pct {
            self.max_drawdown_pct = drawdown_pct;
            self.max_drawdown_date = Some(date);
        }

        self.points.push(EquityPoint {
            date,
            equity,
            drawdown_pct,
        });
    }

    /// 연도별 마지막 평가금액을 반환합니다 (연도 오름차순).
    pub fn year_end_values(&self) -> Vec<YearEndValue> {
        let mut by_year: BTreeMap<i32, &EquityPoint> = BTreeMap::new();
        for point in &self.points {
            by_year.insert(point.date.year(), point);
        }

        by_year
            .into_iter()
            .map(|(year, point)| YearEndValue {
                year,
                date: point.date,
                equity: point.equity,
            })
            .collect()
    }
}
