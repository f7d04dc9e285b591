//! 일별 시뮬레이션 추적.
//!
//! 엔진은 매 시뮬레이션 일마다 [`DayTrace`]를 만들어 주입된 [`TraceSink`]에 넘깁니다.
//! 출력 형식은 싱크가 결정합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use etf_core::{format_amount, Amount, Percent};

/// 자산 하나의 일별 상태
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTrace {
    /// 자산 식별자
    pub asset: String,
    /// 당일 이벤트 반영 후 평가금액
    pub amount: Amount,
    /// 레버리지 적용 등락률 (%)
    pub leveraged_change_pct: Percent,
}

/// 당일 발생한 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DayEvent {
    /// 적립금 입금
    Accumulate { amount: Amount },
    /// 리밸런싱 (리밸런싱 직전 총액)
    Rebalance { total: Amount },
}

impl DayEvent {
    pub fn marker(&self) -> &'static str {
        match self {
            DayEvent::Accumulate { .. } => "Accumulate",
            DayEvent::Rebalance { .. } => "Rebalance",
        }
    }
}

/// 하루치 시뮬레이션 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTrace {
    pub date: NaiveDate,
    /// 자산별 상태 (식별자 정렬 순서)
    pub assets: Vec<AssetTrace>,
    /// 이벤트 (적립 → 리밸런싱 순)
    pub events: Vec<DayEvent>,
    /// 당일 포트폴리오 총액
    pub total: Amount,
}

impl DayTrace {
    pub fn has_event(&self) -> bool {
        !self.events.is_empty()
    }
}

/// 일별 기록 수신자
pub trait TraceSink {
    /// `false`이면 엔진은 기록을 만들지 않습니다.
    fn enabled(&self) -> bool {
        true
    }

    fn record(&mut self, trace: DayTrace);
}

/// 모든 기록을 수집합니다.
impl TraceSink for Vec<DayTrace> {
    fn record(&mut self, trace: DayTrace) {
        self.push(trace);
    }
}

/// 기록하지 않습니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _trace: DayTrace) {}
}

/// 하루에 `tracing` 이벤트 하나를 남깁니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn record(&mut self, trace: DayTrace) {
        let assets = trace
            .assets
            .iter()
            .map(|a| {
                format!(
                    "{}={} ({:+.2}%)",
                    a.asset,
                    format_amount(a.amount),
                    a.leveraged_change_pct
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let markers = trace
            .events
            .iter()
            .map(DayEvent::marker)
            .collect::<Vec<_>>()
            .join(" ");

        info!(
            date = %trace.date,
            total = %format_amount(trace.total),
            assets = %assets,
            "{}",
            if markers.is_empty() { "day" } else { markers.as_str() }
        );
    }
}
