//! 과거 시세 데이터 로딩.
//!
//! 이 crate는 다음을 제공합니다:
//! - 일별 시세 CSV 파서 (한국어/ISO 날짜 형식)
//! - 자산별 CSV 파일을 동시에 읽어 `PriceBook`으로 묶는 로더

pub mod error;
pub mod manager;
pub mod provider;

pub use error::{DataError, Result};
pub use manager::*;

pub use provider::{CsvOptions, CsvPriceLoader, DateFormat};
