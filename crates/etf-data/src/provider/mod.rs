//! 시세 데이터 Provider 모듈.
//!
//! ## CSV
//! - `CsvPriceLoader`: 증권 사이트 "과거 데이터" 내보내기 CSV 로더
//! - 한국어 날짜(`2022년 02월 18일`) 및 ISO 날짜 지원
//! - 쉼표/`%` 제거 후 숫자 파싱

pub mod csv;

pub use self::csv::{
    parse_iso_date, parse_korean_date, parse_number, CsvOptions, CsvPriceLoader, DateFormat,
};
