//! 시세 데이터 매니저.
//!
//! 자산별 CSV 파일을 동시에 읽어 하나의 [`PriceBook`]으로 묶습니다.
//! 시뮬레이션은 적재가 끝난 뒤에만 시작하므로 엔진은 I/O를 하지 않습니다.

use etf_core::{PriceBook, PriceSeries};
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::provider::{CsvOptions, CsvPriceLoader};

/// 자산 식별자 → CSV 파일 경로 목록을 읽는 로더.
#[derive(Debug, Clone, Default)]
pub struct PriceBookLoader {
    loader: CsvPriceLoader,
}

impl PriceBookLoader {
    pub fn new(options: CsvOptions) -> Self {
        Self {
            loader: CsvPriceLoader::new(options),
        }
    }

    /// 모든 파일을 동시에 읽습니다.
    ///
    /// 하나라도 실패하면 첫 번째 오류를 반환합니다.
    #[instrument(skip(self, files), fields(assets = files.len()))]
    pub async fn load(&self, files: &BTreeMap<String, PathBuf>) -> Result<PriceBook> {
        info!("Loading price data for {} assets", files.len());

        let loaded = try_join_all(
            files
                .iter()
                .map(|(asset_id, path)| self.load_one(asset_id, path)),
        )
        .await?;

        let book = loaded
            .into_iter()
            .fold(PriceBook::new(), |book, (asset_id, series)| {
                book.with_series(asset_id, series)
            });

        info!("Price data loaded");
        Ok(book)
    }

    async fn load_one(&self, asset_id: &str, path: &Path) -> Result<(String, PriceSeries)> {
        debug!(asset = asset_id, path = %path.display(), "Reading price file");
        let series = self.loader.load_file(path).await?;
        Ok((asset_id.to_string(), series))
    }
}

/// 기본 로더로 [`PriceBook`]을 적재합니다.
pub async fn load_price_book(
    files: &BTreeMap<String, PathBuf>,
    options: CsvOptions,
) -> Result<PriceBook> {
    PriceBookLoader::new(options).load(files).await
}
