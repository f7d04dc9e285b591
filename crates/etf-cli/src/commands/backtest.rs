//! 백테스트 명령어.
//!
//! 실행 파일과 자산별 일별 시세 CSV로 포트폴리오를 백테스트합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 실행 파일 그대로 백테스트
//! etf-backtester backtest -c config/backtest/qqq_shy.toml
//!
//! # 기간과 초기 투자금 변경, 일별 기록 출력
//! etf-backtester backtest -c config/backtest/qqq_shy.toml \
//!     -f 2015-01-01 -t 2020-12-31 --capital 10,000,000 --trace
//!
//! # 결과를 JSON으로 저장
//! etf-backtester backtest -c config/backtest/qqq_shy.toml -o results/qqq_shy.json
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::info;

use etf_analytics::backtest::{BacktestEngine, BacktestReport, LogTrace, NoTrace, TraceSink};
use etf_data::load_price_book;

use super::run_file::BacktestFile;

/// 백테스트 CLI 설정
#[derive(Debug, Clone, Default)]
pub struct BacktestCliConfig {
    /// 실행 파일 경로
    pub config_path: PathBuf,
    /// 시작일 (옵션)
    pub start_date: Option<NaiveDate>,
    /// 종료일 (옵션)
    pub end_date: Option<NaiveDate>,
    /// 초기 투자금 (옵션)
    pub initial_amount: Option<Decimal>,
    /// 일별 기록 출력
    pub trace: bool,
    /// 결과 저장 경로 (옵션)
    pub output_path: Option<PathBuf>,
}

/// 백테스트 실행
pub async fn run_backtest(config: BacktestCliConfig) -> Result<BacktestReport> {
    info!("Running backtest with run file: {}", config.config_path.display());

    // 1. 실행 파일 로드
    let mut run_file = BacktestFile::load(&config.config_path)?;
    run_file.apply_overrides(config.start_date, config.end_date, config.initial_amount);

    // 2. 설정 검증
    let engine = BacktestEngine::new(run_file.run_config())?;
    let files = run_file.resolve_files()?;

    // 3. 시세 로드
    let book = load_price_book(&files, run_file.data.csv_options())
        .await
        .context("Failed to load price data")?;

    // 4. 시뮬레이션
    let mut log_trace = LogTrace;
    let mut no_trace = NoTrace;
    let sink: &mut dyn TraceSink = if config.trace {
        &mut log_trace
    } else {
        &mut no_trace
    };
    let report = engine.run_with_trace(&book, sink)?;

    // 5. 결과 출력
    println!("\n{}", report.summary());

    if let Some(path) = &config.output_path {
        save_report(&report, path)?;
        info!("Report saved to {}", path.display());
    }

    Ok(report)
}

/// 리포트를 파일로 저장합니다. `.json`이면 JSON, 그 외에는 텍스트 요약.
pub fn save_report(report: &BacktestReport, path: &Path) -> Result<()> {
    // 디렉토리 생성
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = if path.extension().map_or(false, |ext| ext == "json") {
        serde_json::to_string_pretty(report)?
    } else {
        report.summary()
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}
