//! CLI 명령어 구현 모듈.

pub mod backtest;
pub mod run_file;
pub mod validate;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// `YYYY-MM-DD` 날짜 파싱
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}

/// 금액 파싱 (쉼표 허용)
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s.replace(',', "");
    Decimal::from_str(cleaned.trim()).with_context(|| format!("Invalid amount: {}", s))
}
