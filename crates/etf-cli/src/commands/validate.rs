//! 실행 파일 검증 명령어.
//!
//! 설정 검증, 시세 로드, 기간 커버리지 확인까지만 하고 시뮬레이션은 하지 않습니다.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use etf_analytics::backtest::BacktestEngine;
use etf_data::load_price_book;

use super::run_file::BacktestFile;

/// 자산 하나의 시세 범위
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageLine {
    pub asset: String,
    pub first: Option<chrono::NaiveDate>,
    pub last: Option<chrono::NaiveDate>,
    pub records: usize,
}

/// 실행 파일을 검증하고 자산별 시세 범위를 반환합니다.
pub async fn validate_run_file(path: &Path) -> Result<Vec<CoverageLine>> {
    let run_file = BacktestFile::load(path)?;
    let engine = BacktestEngine::new(run_file.run_config())?;
    let files = run_file.resolve_files()?;

    let book = load_price_book(&files, run_file.data.csv_options())
        .await
        .context("Failed to load price data")?;

    let lines = book
        .asset_ids()
        .filter_map(|id| {
            book.series(id).map(|series| CoverageLine {
                asset: id.to_string(),
                first: series.first_date(),
                last: series.last_date(),
                records: series.len(),
            })
        })
        .collect();

    engine.check_coverage(&book)?;
    info!("Run file is valid: {}", path.display());

    Ok(lines)
}

/// 검증 결과 출력
pub fn print_coverage(lines: &[CoverageLine]) {
    println!("\n✅ 설정 및 시세 데이터 검증 완료");
    println!("───────────────────────────────────────");
    for line in lines {
        let fmt = |d: Option<chrono::NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "  {:<10} {} ~ {} ({} 건)",
            line.asset,
            fmt(line.first),
            fmt(line.last),
            line.records
        );
    }
}
