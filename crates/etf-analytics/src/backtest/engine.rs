//! 백테스팅 엔진
//!
//! 여러 ETF로 구성된 포트폴리오를 일 단위로 시뮬레이션합니다.
//!
//! # 주요 기능
//!
//! - **레버리지 적용**: 자산별 일일 등락률에 레버리지 배수를 곱해 반영
//! - **리밸런싱**: 주기마다 목표 비중으로 재배분
//! - **적립식 투자**: 주기마다 적립금을 목표 비중대로 입금
//! - **결과 리포트**: 최종 평가금액, 수익률, 최대 낙폭
//!
//! # 하루 처리 순서
//!
//! 1. 모든 자산에 당일 등락률 반영 (전일 평가금액 기준)
//! 2. 적립일이면 적립금 입금
//! 3. 리밸런싱일이면 적립 후 총액을 목표 비중으로 재배분
//!
//! 종료일은 등락률만 반영하고 끝납니다. 다음 적립일/리밸런싱일은 이벤트가 발생한
//! 날짜 기준으로 계산합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use etf_analytics::backtest::{BacktestEngine, RunConfig};
//! use etf_core::AssetSpec;
//! use rust_decimal_macros::dec;
//!
//! let config = RunConfig::new(start, end, dec!(100_000_000), 365)
//!     .with_accumulation(30, dec!(2_000_000))
//!     .with_asset(AssetSpec::new("QQQ", dec!(50)).with_leverage(dec!(3)))
//!     .with_asset(AssetSpec::new("SHY", dec!(50)));
//!
//! let engine = BacktestEngine::new(config)?;
//! let report = engine.run(&price_book)?;
//!
//! println!("총 수익률: {:.2}%", report.total_return_pct);
//! ```

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use etf_core::{
    backtest_span, Amount, AssetSpec, DecimalExt, PortfolioState, PriceSeriesProvider,
};

use super::config::RunConfig;
use super::report::BacktestReport;
use super::trace::{AssetTrace, DayEvent, DayTrace, NoTrace, TraceSink};
use crate::portfolio::EquityCurve;

/// 백테스트 오류
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BacktestError {
    /// 설정 오류
    #[error("백테스트 설정 오류: {0}")]
    InvalidConfig(String),

    /// 시세 누락
    #[error("시세 데이터 누락: 자산={asset}, 날짜={date}")]
    MissingPriceData { asset: String, date: NaiveDate },
}

/// 백테스트 결과 타입
pub type BacktestResult<T> = Result<T, BacktestError>;

/// 백테스팅 엔진
///
/// 생성 시 설정을 검증하며, 실행마다 새 포트폴리오 상태를 만듭니다.
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    /// 설정
    config: RunConfig,

    /// 자산 (식별자 정렬 순서)
    assets: BTreeMap<String, AssetSpec>,
}

impl BacktestEngine {
    /// 설정을 검증하고 엔진을 생성합니다.
    pub fn new(config: RunConfig) -> BacktestResult<Self> {
        config.validate()?;

        let assets = config
            .assets
            .iter()
            .map(|a| (a.id.clone(), a.clone()))
            .collect();

        Ok(Self { config, assets })
    }

    /// 기간 내 모든 날짜, 모든 자산의 시세가 있는지 확인합니다.
    ///
    /// 날짜 오름차순, 자산 식별자 순으로 처음 발견된 누락을 반환합니다.
    /// 시계열 자체가 없는 자산은 시작일에서 누락으로 잡힙니다.
    pub fn check_coverage<P>(&self, provider: &P) -> BacktestResult<()>
    where
        P: PriceSeriesProvider + ?Sized,
    {
        let absent: Vec<&str> = self
            .assets
            .keys()
            .map(String::as_str)
            .filter(|id| !provider.has_asset(id))
            .collect();
        if !absent.is_empty() {
            warn!(assets = ?absent, "시세 시계열이 없는 자산");
        }

        for date in self.config.start_date.iter_days() {
            if date > self.config.end_date {
                break;
            }
            for id in self.assets.keys() {
                if absent.contains(&id.as_str()) || provider.record(id, date).is_none() {
                    return Err(BacktestError::MissingPriceData {
                        asset: id.clone(),
                        date,
                    });
                }
            }
        }
        Ok(())
    }

    /// 백테스트를 실행합니다.
    pub fn run<P>(&self, provider: &P) -> BacktestResult<BacktestReport>
    where
        P: PriceSeriesProvider + ?Sized,
    {
        self.run_with_trace(provider, &mut NoTrace)
    }

    /// 일별 기록을 `sink`로 보내며 백테스트를 실행합니다.
    pub fn run_with_trace<P>(
        &self,
        provider: &P,
        sink: &mut dyn TraceSink,
    ) -> BacktestResult<BacktestReport>
    where
        P: PriceSeriesProvider + ?Sized,
    {
        let config = &self.config;
        let span = backtest_span!(config.start_date, config.end_date, self.assets.len());
        let _guard = span.enter();

        self.check_coverage(provider)?;

        let start = config.start_date;
        let accumulation = &config.accumulation;

        // 초기 투자
        let mut state = PortfolioState::new();
        for (id, asset) in &self.assets {
            state.set_amount(id, start, config.initial_amount.portion(asset.weight));
        }
        state.contribute(config.initial_amount);

        let mut curve = EquityCurve::new();
        curve.add_point(start, state.total(start));

        let mut next_rebalance = advance(start, config.rebalance_period_days);
        let mut next_accumulation = if accumulation.enabled {
            advance(start, accumulation.period_days)
        } else {
            None
        };

        let mut accumulation_count = 0;
        let mut rebalance_count = 0;
        let mut simulated_days = 0;
        let mut prev = start;

        info!(
            initial = %config.initial_amount,
            rebalance_period_days = config.rebalance_period_days,
            accumulation = accumulation.enabled,
            "백테스트 시작"
        );

        while prev < config.end_date {
            let Some(date) = prev.succ_opt() else {
                break;
            };

            // 1. 등락률 반영
            let mut changes = Vec::with_capacity(self.assets.len());
            for (id, asset) in &self.assets {
                let record = provider.record(id, date).ok_or_else(|| {
                    BacktestError::MissingPriceData {
                        asset: id.clone(),
                        date,
                    }
                })?;
                let prev_amount = state.amount(id, prev).unwrap_or(Decimal::ZERO);
                let amount = prev_amount.apply_change(record.change_pct, asset.leverage);
                state.set_amount(id, date, amount);
                changes.push(record.change_pct * asset.leverage);
            }

            let mut events = Vec::new();

            // 2. 적립
            if next_accumulation == Some(date) {
                self.deposit(&mut state, date, accumulation.amount);
                events.push(DayEvent::Accumulate {
                    amount: accumulation.amount,
                });
                accumulation_count += 1;
                next_accumulation = advance(date, accumulation.period_days);
            }

            // 3. 리밸런싱 (적립 후 총액 기준)
            if next_rebalance == Some(date) {
                let total = self.rebalance(&mut state, date);
                events.push(DayEvent::Rebalance { total });
                rebalance_count += 1;
                next_rebalance = advance(date, config.rebalance_period_days);
            }

            let total = state.total(date);
            curve.add_point(date, total);
            simulated_days += 1;

            if !events.is_empty() {
                debug!(%date, total = %total, events = events.len(), "이벤트 처리");
            }

            if sink.enabled() {
                let assets = self
                    .assets
                    .keys()
                    .zip(changes)
                    .map(|(id, leveraged_change_pct)| AssetTrace {
                        asset: id.clone(),
                        amount: state.amount(id, date).unwrap_or(Decimal::ZERO),
                        leveraged_change_pct,
                    })
                    .collect();
                sink.record(DayTrace {
                    date,
                    assets,
                    events,
                    total,
                });
            }

            prev = date;
        }

        let end = config.end_date;
        let total_amount = state.total(end);
        let contributed = state.contributed();
        let total_return_pct =
            total_amount / contributed * Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED;

        info!(
            contributed = %contributed,
            total = %total_amount,
            return_pct = %total_return_pct.round_dp(2),
            "백테스트 완료"
        );

        Ok(BacktestReport {
            start_date: start,
            end_date: end,
            initial_amount: config.initial_amount,
            contributed,
            total_amount,
            total_return_pct,
            simulated_days,
            accumulation_count,
            rebalance_count,
            final_amounts: state.snapshot(end).into_iter().collect(),
            peak_value: curve.peak_equity(),
            max_drawdown_pct: curve.max_drawdown(),
            max_drawdown_date: curve.max_drawdown_date(),
            year_end_values: curve.year_end_values(),
            state,
        })
    }

    /// 적립금을 목표 비중대로 입금합니다.
    fn deposit(&self, state: &mut PortfolioState, date: NaiveDate, amount: Amount) {
        for (id, asset) in &self.assets {
            let current = state.amount(id, date).unwrap_or(Decimal::ZERO);
            state.set_amount(id, date, current + amount.portion(asset.weight));
        }
        state.contribute(amount);
    }

    /// 총액을 목표 비중으로 재배분하고 재배분 전 총액을 반환합니다.
    fn rebalance(&self, state: &mut PortfolioState, date: NaiveDate) -> Amount {
        let total = state.total(date);
        for (id, asset) in &self.assets {
            state.set_amount(id, date, total.portion(asset.weight));
        }
        total
    }
}

/// `date`로부터 `days`일 뒤. 날짜 범위를 넘으면 `None`.
fn advance(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    u64::try_from(days)
        .ok()
        .and_then(|days| date.checked_add_days(Days::new(days)))
}
