//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 실행 파일(TOML/JSON) 로딩
//! - 백테스트 실행 및 리포트 저장
//! - 실행 파일/시세 데이터 검증

pub mod commands;

pub use commands::*;
