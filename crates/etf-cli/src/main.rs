//! ETF 포트폴리오 백테스터 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 백테스트 실행
//! etf-backtester backtest -c config/backtest/qqq_shy.toml
//!
//! # 기간 변경 + 일별 기록
//! etf-backtester backtest -c config/backtest/qqq_shy.toml -f 2015-01-01 -t 2020-12-31 --trace
//!
//! # 실행 파일 및 시세 데이터 검증
//! etf-backtester validate -c config/backtest/qqq_shy.toml
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use etf_cli::commands::backtest::{run_backtest, BacktestCliConfig};
use etf_cli::commands::validate::{print_coverage, validate_run_file};
use etf_cli::commands::{parse_amount, parse_date};
use etf_core::{init_logging, AppConfig, LogFormat};

#[derive(Parser)]
#[command(name = "etf-backtester")]
#[command(about = "ETF 포트폴리오 백테스터 - 레버리지, 리밸런싱, 적립식 투자 시뮬레이션", long_about = None)]
#[command(version)]
struct Cli {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 백테스트 실행
    Backtest {
        /// 실행 파일 (TOML 또는 JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜 (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,

        /// 초기 투자금
        #[arg(long)]
        capital: Option<String>,

        /// 일별 평가금액 기록 출력
        #[arg(long, default_value = "false")]
        trace: bool,

        /// 결과 저장 경로 (.json이면 JSON, 그 외 텍스트)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 실행 파일 및 시세 데이터 검증 (시뮬레이션 없음)
    Validate {
        /// 실행 파일 (TOML 또는 JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 로깅 초기화 (설정 파일 → 명령행 순으로 적용)
    let app_config = AppConfig::load_default()?;
    let mut log_config = app_config.logging.to_log_config();
    if let Some(level) = &cli.log_level {
        log_config.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        log_config.format = format.parse::<LogFormat>().map_err(|e| anyhow!(e))?;
    }
    init_logging(log_config).map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Backtest {
            config,
            from,
            to,
            capital,
            trace,
            output,
        } => {
            let backtest_config = BacktestCliConfig {
                config_path: config.clone(),
                start_date: from.as_deref().map(parse_date).transpose()?,
                end_date: to.as_deref().map(parse_date).transpose()?,
                initial_amount: capital.as_deref().map(parse_amount).transpose()?,
                trace,
                output_path: output.clone(),
            };

            println!("\n📊 백테스트 실행 중...");
            println!("실행 파일: {}", config.display());

            match run_backtest(backtest_config).await {
                Ok(_) => {
                    info!("✅ Backtest completed successfully");
                    if let Some(out) = output {
                        println!("\n📁 결과 저장됨: {}", out.display());
                    }
                }
                Err(e) => {
                    error!("Backtest failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Validate { config } => match validate_run_file(&config).await {
            Ok(lines) => print_coverage(&lines),
            Err(e) => {
                error!("Validation failed: {:#}", e);
                return Err(e);
            }
        },
    }

    Ok(())
}
