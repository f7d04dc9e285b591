//! End-to-end tests: run file + Korean-format CSV exports → report.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::{Path, PathBuf};

use etf_analytics::backtest::BacktestError;
use etf_cli::commands::backtest::{run_backtest, BacktestCliConfig};
use etf_cli::commands::validate::validate_run_file;

const TQQQ_CSV: &str = "\u{feff}\"2022년 01월 05일\",\"15,300.00\",\"15,400.00\",\"15,500.00\",\"15,100.00\",\"1.10M\",\"-1.00%\"\n\
\"2022년 01월 04일\",\"15,450.00\",\"15,300.00\",\"15,480.00\",\"15,250.00\",\"980.30K\",\"1.00%\"\n\
\"2022년 01월 03일\",\"15,300.00\",\"15,200.00\",\"15,320.00\",\"15,150.00\",\"1.02M\",\"0.25%\"\n";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run_file(end_date: &str, files: &str) -> String {
    format!(
        r#"
start_date = "2022-01-03"
end_date = "{end_date}"
initial_amount = 1000
rebalance_period_days = 365

[[assets]]
id = "TQQQ"
weight = 100
leverage = 3

[data]
date_format = "korean"

[data.files]
{files}
"#
    )
}

#[tokio::test]
async fn korean_export_runs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "nasdaq100.csv", TQQQ_CSV);
    let config_path = write(
        dir.path(),
        "run.toml",
        &run_file("2022-01-05", r#"TQQQ = "nasdaq100.csv""#),
    );
    let output = dir.path().join("reports/result.json");

    let report = run_backtest(BacktestCliConfig {
        config_path,
        output_path: Some(output.clone()),
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(report.total_amount, dec!(999.10));
    assert_eq!(report.contributed, dec!(1000));
    assert_eq!(report.total_return_pct, dec!(-0.09));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
    let saved_total: Decimal = saved["total_amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(saved_total, dec!(999.10));
}

#[tokio::test]
async fn command_line_overrides_take_precedence() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "nasdaq100.csv", TQQQ_CSV);
    let config_path = write(
        dir.path(),
        "run.toml",
        &run_file("2022-01-05", r#"TQQQ = "nasdaq100.csv""#),
    );

    let report = run_backtest(BacktestCliConfig {
        config_path,
        end_date: Some(chrono::NaiveDate::from_ymd_opt(2022, 1, 4).unwrap()),
        initial_amount: Some(dec!(2000)),
        trace: true,
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(report.total_amount, dec!(2060));
    assert_eq!(report.simulated_days, 1);
}

#[tokio::test]
async fn range_beyond_data_is_missing_price_data() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "nasdaq100.csv", TQQQ_CSV);
    let config_path = write(
        dir.path(),
        "run.toml",
        &run_file("2022-01-06", r#"TQQQ = "nasdaq100.csv""#),
    );

    let err = validate_run_file(&config_path).await.unwrap_err();
    match err.downcast_ref::<BacktestError>() {
        Some(BacktestError::MissingPriceData { asset, date }) => {
            assert_eq!(asset, "TQQQ");
            assert_eq!(date.to_string(), "2022-01-06");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn validate_reports_coverage() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "nasdaq100.csv", TQQQ_CSV);
    let config_path = write(
        dir.path(),
        "run.toml",
        &run_file("2022-01-05", r#"TQQQ = "nasdaq100.csv""#),
    );

    let lines = validate_run_file(&config_path).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].asset, "TQQQ");
    assert_eq!(lines[0].records, 3);
}

#[tokio::test]
async fn asset_without_file_is_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write(dir.path(), "run.toml", &run_file("2022-01-05", ""));

    let err = run_backtest(BacktestCliConfig {
        config_path,
        ..Default::default()
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<BacktestError>(),
        Some(BacktestError::InvalidConfig(_))
    ));
}
