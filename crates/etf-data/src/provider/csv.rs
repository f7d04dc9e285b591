//! 일별 시세 CSV 로더.
//!
//! 증권 사이트 "과거 데이터" 내보내기 형식의 CSV를 읽어 [`PriceSeries`]로 변환합니다.
//!
//! # 컬럼 순서
//!
//! ```csv
//! "2022년 02월 18일","14,000.50","14,100.00","14,150.25","13,880.00","1.25M","-0.54%"
//! ```
//!
//! 날짜, 종가, 시가, 고가, 저가, 거래량, 변동 %
//!
//! 날짜 형식은 설정으로 명시합니다 ([`DateFormat`]). 자동 감지는 하지 않습니다.

use chrono::NaiveDate;
use etf_core::{DailyRecord, PriceSeries};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::error::{DataError, Result};

const DATE_COLUMN: usize = 0;
const CLOSE_COLUMN: usize = 1;
const OPEN_COLUMN: usize = 2;
const HIGH_COLUMN: usize = 3;
const LOW_COLUMN: usize = 4;
const VOLUME_COLUMN: usize = 5;
const CHANGE_COLUMN: usize = 6;
const COLUMN_COUNT: usize = 7;

/// 날짜 컬럼 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `2022년 02월 18일`
    #[default]
    Korean,
    /// `2022-02-18`
    Iso,
}

/// CSV 로딩 옵션.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    /// 날짜 형식
    #[serde(default)]
    pub date_format: DateFormat,

    /// 첫 행이 헤더인지 여부
    #[serde(default)]
    pub has_headers: bool,

    /// 첫 거래일과 마지막 거래일 사이의 휴장일을 등락률 0 레코드로 채울지 여부
    #[serde(default)]
    pub fill_non_trading_days: bool,
}

/// 일별 시세 CSV 로더.
#[derive(Debug, Clone, Default)]
pub struct CsvPriceLoader {
    options: CsvOptions,
}

impl CsvPriceLoader {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// 파일을 읽어 시계열로 변환합니다.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<PriceSeries> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DataError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        self.parse_str(&path.display().to_string(), &content)
    }

    /// CSV 문자열을 시계열로 변환합니다.
    ///
    /// `source_name`은 오류 메시지에 표시됩니다.
    pub fn parse_str(&self, source_name: &str, content: &str) -> Result<PriceSeries> {
        let content = content.trim_start_matches('\u{feff}');

        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(self.options.has_headers)
            .flexible(true)
            .trim(::csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut series = PriceSeries::new();

        for row in reader.records() {
            let row = row.map_err(|e| DataError::Csv {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            // 빈 줄
            if row.iter().all(str::is_empty) {
                continue;
            }

            let record = self.parse_row(source_name, line, &row)?;
            let date = record.date;
            if series.insert(record).is_err() {
                return Err(DataError::Parse {
                    source_name: source_name.to_string(),
                    line,
                    field: "date",
                    value: date.to_string(),
                    reason: "duplicate date".to_string(),
                });
            }
        }

        if self.options.fill_non_trading_days {
            let filled = series.fill_gaps();
            debug!(source = source_name, filled, "휴장일 레코드 채움");
        }

        debug!(
            source = source_name,
            records = series.len(),
            first = ?series.first_date(),
            last = ?series.last_date(),
            "CSV 시세 로드 완료"
        );

        Ok(series)
    }

    fn parse_row(
        &self,
        source_name: &str,
        line: u64,
        row: &::csv::StringRecord,
    ) -> Result<DailyRecord> {
        let parse_err = |field: &'static str, value: &str, reason: String| DataError::Parse {
            source_name: source_name.to_string(),
            line,
            field,
            value: value.to_string(),
            reason,
        };

        if row.len() < COLUMN_COUNT {
            return Err(parse_err(
                "columns",
                &row.iter().collect::<Vec<_>>().join(","),
                format!("expected {} columns, got {}", COLUMN_COUNT, row.len()),
            ));
        }

        let raw_date = &row[DATE_COLUMN];
        let date = match self.options.date_format {
            DateFormat::Korean => parse_korean_date(raw_date),
            DateFormat::Iso => parse_iso_date(raw_date),
        }
        .ok_or_else(|| {
            parse_err(
                "date",
                raw_date,
                format!("not a {:?} date", self.options.date_format),
            )
        })?;

        let number = |field: &'static str, column: usize| {
            let raw = &row[column];
            parse_number(raw).map_err(|reason| parse_err(field, raw, reason))
        };

        Ok(DailyRecord {
            date,
            close: number("close", CLOSE_COLUMN)?,
            open: number("open", OPEN_COLUMN)?,
            high: number("high", HIGH_COLUMN)?,
            low: number("low", LOW_COLUMN)?,
            volume: row[VOLUME_COLUMN].to_string(),
            change_pct: number("change_pct", CHANGE_COLUMN)?,
        })
    }
}

/// `2022년 02월 18일` 형식의 날짜를 파싱합니다.
///
/// 따옴표, 공백, BOM은 무시합니다.
pub fn parse_korean_date(raw: &str) -> Option<NaiveDate> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '"' | '\u{feff}') && !c.is_whitespace())
        .collect();

    let (year, rest) = cleaned.split_once('년')?;
    let (month, rest) = rest.split_once('월')?;
    let (day, rest) = rest.split_once('일')?;
    if !rest.is_empty() {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// `2022-02-18` 형식의 날짜를 파싱합니다.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim_matches(|c: char| c == '"' || c == '\u{feff}' || c.is_whitespace());
    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d").ok()
}

/// 숫자 문자열을 파싱합니다 (쉼표, `%` 제거).
///
/// 빈 값이나 `-`는 오류입니다.
pub fn parse_number(raw: &str) -> std::result::Result<Decimal, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '%' | '"') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return Err("empty value".to_string());
    }

    Decimal::from_str(&cleaned).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\u{feff}\"2022년 02월 18일\",\"14,000.50\",\"14,100.00\",\"14,150.25\",\"13,880.00\",\"1.25M\",\"-0.54%\"\n\
                          \"2022년 02월 17일\",\"14,076.50\",\"14,300.00\",\"14,320.00\",\"14,050.00\",\"980.3K\",\"-2.88%\"\n";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_korean_date() {
        assert_eq!(parse_korean_date("2022년 02월 18일"), Some(date(2022, 2, 18)));
        assert_eq!(parse_korean_date("\u{feff}\"1999년 4월 7일\""), Some(date(1999, 4, 7)));
        assert_eq!(parse_korean_date("2022-02-18"), None);
        assert_eq!(parse_korean_date("2022년 02월 30일"), None);
        assert_eq!(parse_korean_date("2022년 02월 18일 종가"), None);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date(" 2022-02-18 "), Some(date(2022, 2, 18)));
        assert_eq!(parse_iso_date("2022년 02월 18일"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("14,000.50").unwrap(), dec!(14000.50));
        assert_eq!(parse_number("-0.54%").unwrap(), dec!(-0.54));
        assert_eq!(parse_number("1,234,567").unwrap(), dec!(1234567));
        assert!(parse_number("").is_err());
        assert!(parse_number("-").is_err());
        assert!(parse_number("1.2M").is_err());
    }

    #[test]
    fn test_parse_korean_export() {
        let loader = CsvPriceLoader::default();
        let series = loader.parse_str("nasdaq100.csv", SAMPLE).unwrap();

        assert_eq!(series.len(), 2);
        let record = series.get(date(2022, 2, 18)).unwrap();
        assert_eq!(record.close, dec!(14000.50));
        assert_eq!(record.open, dec!(14100));
        assert_eq!(record.high, dec!(14150.25));
        assert_eq!(record.low, dec!(13880));
        assert_eq!(record.volume, "1.25M");
        assert_eq!(record.change_pct, dec!(-0.54));
        assert_eq!(series.first_date(), Some(date(2022, 2, 17)));
    }

    #[test]
    fn test_header_row_skipped() {
        let content = "날짜,종가,시가,고가,저가,거래량,변동 %\n2022-02-18,100,99,101,98,1K,1.00%\n";
        let loader = CsvPriceLoader::new(CsvOptions {
            date_format: DateFormat::Iso,
            has_headers: true,
            ..Default::default()
        });
        let series = loader.parse_str("spy.csv", content).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(date(2022, 2, 18)).unwrap().change_pct, dec!(1));
    }

    #[test]
    fn test_header_without_option_is_parse_error() {
        let content = "날짜,종가,시가,고가,저가,거래량,변동 %\n";
        let err = CsvPriceLoader::default().parse_str("spy.csv", content).unwrap_err();
        match err {
            DataError::Parse { field, line, .. } => {
                assert_eq!(field, "date");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_change_reports_field() {
        let content = "\"2022년 02월 18일\",\"100\",\"99\",\"101\",\"98\",\"1K\",\"abc%\"\n";
        let err = CsvPriceLoader::default().parse_str("bad.csv", content).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("change_pct"));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let content = "\"2022년 02월 18일\",\"100\",\"99\"\n";
        let err = CsvPriceLoader::default().parse_str("short.csv", content).unwrap_err();
        assert!(matches!(err, DataError::Parse { field: "columns", .. }));
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let content = "2022-02-18,100,99,101,98,1K,1%\n2022-02-18,101,99,101,98,1K,1%\n";
        let loader = CsvPriceLoader::new(CsvOptions {
            date_format: DateFormat::Iso,
            ..Default::default()
        });
        let err = loader.parse_str("dup.csv", content).unwrap_err();
        assert!(matches!(err, DataError::Parse { field: "date", line: 2, .. }));
    }

    #[test]
    fn test_fill_non_trading_days() {
        // 금요일, 월요일
        let content = "2022-02-11,100,99,101,98,1K,1%\n2022-02-14,102,100,103,99,1K,2%\n";
        let loader = CsvPriceLoader::new(CsvOptions {
            date_format: DateFormat::Iso,
            fill_non_trading_days: true,
            ..Default::default()
        });
        let series = loader.parse_str("gaps.csv", content).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.get(date(2022, 2, 13)).unwrap().change_pct, Decimal::ZERO);
    }

    #[test]
    fn test_options_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            data: CsvOptions,
        }

        let json = r#"{"data": {"date_format": "iso", "has_headers": true}}"#;
        let wrapper: Wrapper = serde_json::from_str(json).unwrap();
        assert_eq!(wrapper.data.date_format, DateFormat::Iso);
        assert!(wrapper.data.has_headers);
        assert!(!wrapper.data.fill_non_trading_days);
    }
}
