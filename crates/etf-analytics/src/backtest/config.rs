//! 백테스트 실행 설정.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use etf_core::{Amount, AssetSpec, DecimalExt, WEIGHT_EPSILON};

use super::engine::{BacktestError, BacktestResult};

/// 적립식 투자 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccumulationConfig {
    /// 적립 여부
    #[serde(default)]
    pub enabled: bool,

    /// 회당 적립금
    #[serde(default)]
    pub amount: Amount,

    /// 적립 주기 (일)
    #[serde(default)]
    pub period_days: i64,
}

impl AccumulationConfig {
    /// 활성화된 적립 설정을 생성합니다.
    pub fn every(period_days: i64, amount: Amount) -> Self {
        Self {
            enabled: true,
            amount,
            period_days,
        }
    }
}

/// 백테스트 설정
///
/// 실행 중에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// 시작일 (초기 투자일)
    pub start_date: NaiveDate,

    /// 종료일 (마지막 평가일)
    pub end_date: NaiveDate,

    /// 초기 투자금
    pub initial_amount: Amount,

    /// 리밸런싱 주기 (일)
    pub rebalance_period_days: i64,

    /// 적립식 투자 설정
    #[serde(default)]
    pub accumulation: AccumulationConfig,

    /// 편입 자산
    #[serde(default)]
    pub assets: Vec<AssetSpec>,
}

impl RunConfig {
    /// 새로운 백테스트 설정을 생성합니다. 자산과 적립은 비어 있습니다.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        initial_amount: Amount,
        rebalance_period_days: i64,
    ) -> Self {
        Self {
            start_date,
            end_date,
            initial_amount,
            rebalance_period_days,
            accumulation: AccumulationConfig::default(),
            assets: Vec::new(),
        }
    }

    /// 자산 추가
    pub fn with_asset(mut self, asset: AssetSpec) -> Self {
        self.assets.push(asset);
        self
    }

    /// 적립식 투자 설정
    pub fn with_accumulation(mut self, period_days: i64, amount: Amount) -> Self {
        self.accumulation = AccumulationConfig::every(period_days, amount);
        self
    }

    /// 시뮬레이션 기간 (일)
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// 설정을 검증합니다.
    pub fn validate(&self) -> BacktestResult<()> {
        if self.start_date > self.end_date {
            return Err(invalid(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }

        if self.initial_amount <= Decimal::ZERO {
            return Err(invalid(format!(
                "initial_amount must be positive: {}",
                self.initial_amount
            )));
        }

        if self.rebalance_period_days <= 0 {
            return Err(invalid(format!(
                "rebalance_period_days must be positive: {}",
                self.rebalance_period_days
            )));
        }

        if self.accumulation.enabled {
            if self.accumulation.period_days <= 0 {
                return Err(invalid(format!(
                    "accumulation.period_days must be positive: {}",
                    self.accumulation.period_days
                )));
            }
            if self.accumulation.amount < Decimal::ZERO {
                return Err(invalid(format!(
                    "accumulation.amount must not be negative: {}",
                    self.accumulation.amount
                )));
            }
        }

        self.validate_assets()
    }

    fn validate_assets(&self) -> BacktestResult<()> {
        if self.assets.is_empty() {
            return Err(invalid("at least one asset is required"));
        }

        let mut seen = BTreeSet::new();
        for asset in &self.assets {
            if asset.id.trim().is_empty() {
                return Err(invalid("asset id must not be empty"));
            }
            if !seen.insert(asset.id.as_str()) {
                return Err(invalid(format!("duplicate asset id: {}", asset.id)));
            }
            if asset.weight < Decimal::ZERO || asset.weight > Decimal::ONE_HUNDRED {
                return Err(invalid(format!(
                    "weight of {} must be within 0..=100: {}",
                    asset.id, asset.weight
                )));
            }
            if asset.leverage <= Decimal::ZERO {
                return Err(invalid(format!(
                    "leverage of {} must be positive: {}",
                    asset.id, asset.leverage
                )));
            }
        }

        let weight_sum: Decimal = self.assets.iter().map(|a| a.weight).sum();
        if !weight_sum.approx_eq(Decimal::ONE_HUNDRED, WEIGHT_EPSILON) {
            return Err(invalid(format!("weights must sum to 100: {}", weight_sum)));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> BacktestError {
    BacktestError::InvalidConfig(message.into())
}
