//! 가격 데이터 제공자 trait 및 메모리 구현.
//!
//! 시뮬레이션 엔진은 이 trait을 통해 날짜별 시세를 조회합니다.
//! 시세는 시뮬레이션 시작 전에 모두 적재되어 있어야 하며,
//! 엔진은 정확한 날짜로만 조회하고 보간하지 않습니다.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::market_data::{DailyRecord, PriceSeries};

/// 자산별 일별 시세 조회 인터페이스.
pub trait PriceSeriesProvider {
    /// 해당 자산의 시계열이 있는지 확인합니다.
    fn has_asset(&self, asset_id: &str) -> bool;

    /// 특정 자산, 특정 날짜의 레코드를 조회합니다.
    fn record(&self, asset_id: &str, date: NaiveDate) -> Option<&DailyRecord>;
}

/// 자산 식별자별 가격 시계열 모음.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    series: BTreeMap<String, PriceSeries>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 자산의 시계열을 등록합니다. 기존 시계열은 교체됩니다.
    pub fn insert(&mut self, asset_id: impl Into<String>, series: PriceSeries) {
        self.series.insert(asset_id.into(), series);
    }

    /// 빌더 형태로 시계열을 등록합니다.
    pub fn with_series(mut self, asset_id: impl Into<String>, series: PriceSeries) -> Self {
        self.insert(asset_id, series);
        self
    }

    /// 자산의 시계열을 반환합니다.
    pub fn series(&self, asset_id: &str) -> Option<&PriceSeries> {
        self.series.get(asset_id)
    }

    /// 등록된 자산 식별자 (정렬 순서).
    pub fn asset_ids(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl PriceSeriesProvider for PriceBook {
    fn has_asset(&self, asset_id: &str) -> bool {
        self.series.contains_key(asset_id)
    }

    fn record(&self, asset_id: &str, date: NaiveDate) -> Option<&DailyRecord> {
        self.series.get(asset_id).and_then(|s| s.get(date))
    }
}
