//! 백테스팅 모듈
//!
//! 과거 일별 등락률로 ETF 포트폴리오를 시뮬레이션합니다.
//!
//! # 주요 구성요소
//!
//! - [`RunConfig`]: 백테스트 설정 (기간, 투자금, 리밸런싱/적립 주기, 자산 구성)
//! - [`BacktestEngine`]: 백테스트 실행 엔진
//! - [`BacktestReport`]: 백테스트 결과 리포트
//! - [`TraceSink`]: 일별 시뮬레이션 기록 수신자

pub mod config;
pub mod engine;
pub mod report;
pub mod trace;

pub use config::{AccumulationConfig, RunConfig};
pub use engine::{BacktestEngine, BacktestError, BacktestResult};
pub use report::BacktestReport;
pub use trace::{AssetTrace, DayEvent, DayTrace, LogTrace, NoTrace, TraceSink};
