//! 분석 및 백테스팅 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 레버리지/리밸런싱/적립식 투자를 지원하는 백테스팅 엔진
//! - 포트폴리오 분석 (자산 곡선, 최대 낙폭)
//!
//! # Re-exports
//!
//! - [`backtest`]: 백테스트 설정, 엔진, 리포트, 일별 기록
//! - [`portfolio`]: 포트폴리오 분석 (EquityCurve 등)

pub mod backtest;
pub mod portfolio;

// Backtest 모듈 re-exports
pub use backtest::{
    AccumulationConfig, AssetTrace, BacktestEngine, BacktestError, BacktestReport,
    BacktestResult, DayEvent, DayTrace, LogTrace, NoTrace, RunConfig, TraceSink,
};

// Portfolio 모듈 re-exports
pub use portfolio::equity_curve::{EquityCurve, YearEndValue};
