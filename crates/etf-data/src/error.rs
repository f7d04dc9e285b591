//! 데이터 모듈 오류 타입.

use std::path::PathBuf;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 파일 입출력 오류
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV 형식 오류 (따옴표/레코드 구조)
    #[error("CSV error in {source_name}: {message}")]
    Csv {
        source_name: String,
        message: String,
    },

    /// 필드 파싱 오류 (숫자/날짜)
    #[error("Parse error in {source_name} line {line}, field '{field}': {value:?} ({reason})")]
    Parse {
        source_name: String,
        line: u64,
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl DataError {
    /// 파싱 오류인지 확인합니다.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, DataError::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
