//! 백테스트 실행 파일 (TOML/JSON).
//!
//! ```toml
//! start_date = "2012-01-02"
//! end_date = "2022-02-18"
//! initial_amount = 100000000
//! rebalance_period_days = 365
//!
//! [accumulation]
//! enabled = true
//! amount = 2000000
//! period_days = 30
//!
//! [[assets]]
//! id = "QQQ"
//! weight = 50
//! leverage = 3
//!
//! [[assets]]
//! id = "SHY"
//! weight = 50
//!
//! [data]
//! date_format = "korean"
//!
//! [data.files]
//! QQQ = "data/nasdaq100.csv"
//! SHY = "data/shy.csv"
//! ```
//!
//! `ETF__` 접두사 환경변수로 값을 덮어쓸 수 있습니다 (예: `ETF__END_DATE=2020-12-31`).

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use etf_analytics::backtest::{AccumulationConfig, BacktestError, RunConfig};
use etf_core::{AssetSpec, ENV_PREFIX};
use etf_data::{CsvOptions, DateFormat};

/// 시세 데이터 설정
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSection {
    /// 날짜 형식
    #[serde(default)]
    pub date_format: DateFormat,

    /// 헤더 행 여부
    #[serde(default)]
    pub has_headers: bool,

    /// 휴장일 채우기
    #[serde(default)]
    pub fill_non_trading_days: bool,

    /// 자산 식별자 → CSV 경로
    #[serde(default)]
    pub files: BTreeMap<String, PathBuf>,
}

impl DataSection {
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            date_format: self.date_format,
            has_headers: self.has_headers,
            fill_non_trading_days: self.fill_non_trading_days,
        }
    }
}

/// 백테스트 실행 파일
#[derive(Debug, Clone, Deserialize)]
pub struct BacktestFile {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_amount: Decimal,
    pub rebalance_period_days: i64,

    #[serde(default)]
    pub accumulation: AccumulationConfig,

    #[serde(default)]
    pub assets: Vec<AssetSpec>,

    #[serde(default)]
    pub data: DataSection,

    /// 실행 파일이 있는 디렉토리 (상대 경로 기준)
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl BacktestFile {
    /// 실행 파일을 읽습니다. 확장자로 TOML/JSON을 구분합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading run file: {}", path.display());

        let settings = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read run file: {}", path.display()))?;

        let mut file: BacktestFile = settings
            .try_deserialize()
            .with_context(|| format!("Invalid run file: {}", path.display()))?;

        file.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(file)
    }

    /// 명령행 값으로 덮어씁니다.
    pub fn apply_overrides(
        &mut self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        capital: Option<Decimal>,
    ) {
        if let Some(from) = from {
            self.start_date = from;
        }
        if let Some(to) = to {
            self.end_date = to;
        }
        if let Some(capital) = capital {
            self.initial_amount = capital;
        }
    }

    /// 엔진 설정으로 변환합니다.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            start_date: self.start_date,
            end_date: self.end_date,
            initial_amount: self.initial_amount,
            rebalance_period_days: self.rebalance_period_days,
            accumulation: self.accumulation.clone(),
            assets: self.assets.clone(),
        }
    }

    /// 자산별 CSV 경로를 찾습니다.
    ///
    /// 설정 계층이 키를 소문자로 바꿀 수 있으므로 식별자는 대소문자 구분 없이 비교합니다.
    /// 상대 경로는 실행 파일 위치 기준입니다.
    pub fn resolve_files(&self) -> Result<BTreeMap<String, PathBuf>> {
        let mut resolved = BTreeMap::new();

        for asset in &self.assets {
            let path = self
                .data
                .files
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(&asset.id))
                .map(|(_, path)| path)
                .ok_or_else(|| {
                    anyhow!(BacktestError::InvalidConfig(format!(
                        "no price file configured for asset {}",
                        asset.id
                    )))
                })?;

            let path = if path.is_relative() {
                self.base_dir.join(path)
            } else {
                path.clone()
            };
            resolved.insert(asset.id.clone(), path);
        }

        for key in self.data.files.keys() {
            if !self.assets.iter().any(|a| a.id.eq_ignore_ascii_case(key)) {
                warn!(asset = %key, "Price file is not used by any asset");
            }
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const RUN_FILE: &str = r#"
start_date = "2012-01-02"
end_date = "2022-02-18"
initial_amount = 100000000
rebalance_period_days = 365

[accumulation]
enabled = true
amount = 2000000
period_days = 30

[[assets]]
id = "QQQ"
weight = 50
leverage = 3

[[assets]]
id = "SHY"
weight = 50

[data]
date_format = "iso"

[data.files]
QQQ = "data/nasdaq100.csv"
SHY = "/abs/shy.csv"
SPY = "data/unused.csv"
"#;

    fn write_run_file(dir: &Path) -> PathBuf {
        let path = dir.join("run.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(RUN_FILE.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_toml_run_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = BacktestFile::load(write_run_file(dir.path())).unwrap();

        assert_eq!(file.start_date, NaiveDate::from_ymd_opt(2012, 1, 2).unwrap());
        assert_eq!(file.initial_amount, dec!(100000000));
        assert!(file.accumulation.enabled);
        assert_eq!(file.accumulation.period_days, 30);
        assert_eq!(file.assets.len(), 2);
        assert_eq!(file.assets[0].leverage, dec!(3));
        assert_eq!(file.assets[1].leverage, Decimal::ONE);
        assert_eq!(file.data.date_format, DateFormat::Iso);
        assert!(file.run_config().validate().is_ok());
    }

    #[test]
    fn test_resolve_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = BacktestFile::load(write_run_file(dir.path())).unwrap();
        let files = file.resolve_files().unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files["QQQ"], dir.path().join("data/nasdaq100.csv"));
        assert_eq!(files["SHY"], PathBuf::from("/abs/shy.csv"));
    }

    #[test]
    fn test_asset_without_file_is_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = BacktestFile::load(write_run_file(dir.path())).unwrap();
        file.assets.push(AssetSpec::new("TLT", Decimal::ZERO));

        let err = file.resolve_files().unwrap_err();
        let backtest_err = err.downcast_ref::<BacktestError>().unwrap();
        assert!(matches!(backtest_err, BacktestError::InvalidConfig(msg) if msg.contains("TLT")));
    }

    #[test]
    fn test_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = BacktestFile::load(write_run_file(dir.path())).unwrap();
        let to = NaiveDate::from_ymd_opt(2015, 12, 31).unwrap();

        file.apply_overrides(None, Some(to), Some(dec!(5000)));
        let run = file.run_config();
        assert_eq!(run.start_date, NaiveDate::from_ymd_opt(2012, 1, 2).unwrap());
        assert_eq!(run.end_date, to);
        assert_eq!(run.initial_amount, dec!(5000));
    }

    #[test]
    fn test_missing_run_file() {
        assert!(BacktestFile::load("/nonexistent/run.toml").is_err());
    }
}
