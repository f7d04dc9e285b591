//! 백테스트 결과 리포트.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use etf_core::{format_amount, Amount, PortfolioState, Percent};

use crate::portfolio::YearEndValue;

/// 백테스트 결과 리포트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// 시작일
    pub start_date: NaiveDate,

    /// 종료일
    pub end_date: NaiveDate,

    /// 초기 투자금
    pub initial_amount: Amount,

    /// 누적 납입 원금 (초기 투자금 + 적립금)
    pub contributed: Amount,

    /// 최종 평가금액
    pub total_amount: Amount,

    /// 총 수익률 (%, 납입 원금 대비)
    pub total_return_pct: Percent,

    /// 시뮬레이션한 일수 (시작일 제외)
    pub simulated_days: usize,

    /// 적립 횟수
    pub accumulation_count: usize,

    /// 리밸런싱 횟수
    pub rebalance_count: usize,

    /// 자산별 최종 평가금액
    pub final_amounts: BTreeMap<String, Amount>,

    /// 평가금액 고점
    pub peak_value: Amount,

    /// 최대 낙폭 (%)
    pub max_drawdown_pct: Percent,

    /// 최대 낙폭 발생일
    pub max_drawdown_date: Option<NaiveDate>,

    /// 연말 평가금액
    pub year_end_values: Vec<YearEndValue>,

    /// 전체 포트폴리오 상태 (자산별 일별 평가금액)
    #[serde(skip)]
    pub state: PortfolioState,
}

impl BacktestReport {
    /// 평가손익 (최종 평가금액 - 납입 원금)
    pub fn profit(&self) -> Amount {
        self.total_amount - self.contributed
    }

    /// 리포트 요약 문자열 생성
    pub fn summary(&self) -> String {
        let duration_days = (self.end_date - self.start_date).num_days();

        let mut out = format!(
            "백테스트 결과 요약\n\
             ═══════════════════════════════════════\n\
             기간: {} → {} ({} 일)\n\
             ───────────────────────────────────────\n\
             초기 투자금: {}\n\
             납입 원금: {}\n\
             최종 평가금액: {}\n\
             평가손익: {}\n\
             총 수익률: {:.2}%\n\
             ───────────────────────────────────────\n\
             고점 평가금액: {}\n\
             최대 낙폭: {:.2}%{}\n\
             적립 횟수: {}\n\
             리밸런싱 횟수: {}\n\
             ───────────────────────────────────────\n",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
            duration_days,
            format_amount(self.initial_amount),
            format_amount(self.contributed),
            format_amount(self.total_amount),
            format_amount(self.profit()),
            self.total_return_pct,
            format_amount(self.peak_value),
            self.max_drawdown_pct,
            self.max_drawdown_date
                .map(|d| format!(" ({})", d.format("%Y-%m-%d")))
                .unwrap_or_default(),
            self.accumulation_count,
            self.rebalance_count,
        );

        for (asset, amount) in &self.final_amounts {
            let share = if self.total_amount.is_zero() {
                Decimal::ZERO
            } else {
                *amount / self.total_amount * Decimal::ONE_HUNDRED
            };
            out.push_str(&format!(
                "{}: {} ({:.2}%)\n",
                asset,
                format_amount(*amount),
                share
            ));
        }

        out.push_str("═══════════════════════════════════════");
        out
    }
}
