//! 일별 시세 데이터 타입.
//!
//! 이 모듈은 백테스트 입력이 되는 시세 관련 타입을 정의합니다:
//! - `DailyRecord` - 하루치 종가/시가/고가/저가/거래량/등락률
//! - `PriceSeries` - 한 자산의 날짜순 일별 레코드 모음

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

use crate::types::Percent;

/// 하루치 시세 레코드.
///
/// 엔진은 `change_pct`만 사용합니다. 나머지 필드는 보고/검증용입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// 거래일
    pub date: NaiveDate,
    /// 종가
    pub close: Decimal,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 거래량 (원본 문자열 그대로, 예: "1.25M")
    pub volume: String,
    /// 전 거래일 대비 등락률 (%)
    pub change_pct: Percent,
}

impl DailyRecord {
    /// 새 레코드를 생성합니다.
    pub fn new(
        date: NaiveDate,
        close: Decimal,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        volume: impl Into<String>,
        change_pct: Percent,
    ) -> Self {
        Self {
            date,
            close,
            open,
            high,
            low,
            volume: volume.into(),
            change_pct,
        }
    }

    /// 등락률만 의미 있는 레코드를 생성합니다.
    ///
    /// 가격 필드는 모두 0, 거래량은 `"-"`입니다. 테스트나 합성 데이터용입니다.
    pub fn from_change(date: NaiveDate, change_pct: Percent) -> Self {
        Self::new(
            date,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            "-",
            change_pct,
        )
    }

    /// 가격 변동이 없는 휴장일 레코드를 생성합니다.
    ///
    /// 시가/고가/저가/종가는 직전 종가로, 등락률은 0으로 채웁니다.
    pub fn flat(date: NaiveDate, prev_close: Decimal) -> Self {
        Self::new(
            date,
            prev_close,
            prev_close,
            prev_close,
            prev_close,
            "-",
            Decimal::ZERO,
        )
    }
}

/// 한 자산의 날짜순 일별 시세.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    records: BTreeMap<NaiveDate, DailyRecord>,
}

impl PriceSeries {
    /// 빈 시계열을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드를 추가합니다.
    ///
    /// 같은 날짜의 레코드가 이미 있으면 교체하지 않고 기존 레코드를 반환합니다.
    pub fn insert(&mut self, record: DailyRecord) -> Result<(), DailyRecord> {
        match self.records.entry(record.date) {
            btree_map::Entry::Occupied(existing) => Err(existing.get().clone()),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// 특정 날짜의 레코드를 조회합니다.
    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records.get(&date)
    }

    /// 첫 거래일.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.keys().next().copied()
    }

    /// 마지막 거래일.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 날짜순으로 레코드를 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.values()
    }

    /// 첫 거래일과 마지막 거래일 사이의 빈 날짜를 등락률 0 레코드로 채웁니다.
    ///
    /// 채운 레코드 수를 반환합니다.
    pub fn fill_gaps(&mut self) -> usize {
        let (Some(first), Some(last)) = (self.first_date(), self.last_date()) else {
            return 0;
        };

        let mut filled = Vec::new();
        let mut prev_close = Decimal::ZERO;
        for date in first.iter_days().take_while(|d| *d <= last) {
            match self.records.get(&date) {
                Some(record) => prev_close = record.close,
                None => filled.push(DailyRecord::flat(date, prev_close)),
            }
        }

        let count = filled.len();
        for record in filled {
            self.records.insert(record.date, record);
        }
        count
    }
}

impl FromIterator<DailyRecord> for PriceSeries {
    /// 같은 날짜가 여러 번 나오면 마지막 레코드가 남습니다.
    fn from_iter<I: IntoIterator<Item = DailyRecord>>(iter: I) -> Self {
        let records = iter.into_iter().map(|r| (r.date, r)).collect();
        Self { records }
    }
}
