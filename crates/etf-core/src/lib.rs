//! # ETF Core
//!
//! ETF 백테스터의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 백테스트 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일별 시세 레코드 및 가격 시계열
//! - 가격 데이터 제공자 trait 및 메모리 구현
//! - 자산 구성 (비중, 레버리지)
//! - 포트폴리오 상태 (자산별 평가금액, 납입 원금)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod logging;
pub mod types;

pub use self::config::*;
pub use domain::*;
pub use logging::*;
pub use types::*;
