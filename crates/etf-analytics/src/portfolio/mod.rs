//! 포트폴리오 분석 모듈
//!
//! # 모듈 구성
//!
//! - [`equity_curve`]: 자산 곡선 데이터 생성 및 관리
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use etf_analytics::portfolio::EquityCurve;
//! use rust_decimal_macros::dec;
//!
//! let mut curve = EquityCurve::new();
//! curve.add_point(day1, dec!(10_000_000));
//! curve.add_point(day2, dec!(9_500_000));
//!
//! println!("최대 낙폭: {}%", curve.max_drawdown());
//! ```

pub mod equity_curve;

pub use equity_curve::*;
