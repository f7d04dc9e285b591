//! 백테스트를 위한 도메인 모델.

mod asset;
mod market_data;
mod portfolio;
mod price_provider;

pub use asset::*;
pub use market_data::*;
pub use portfolio::*;
pub use price_provider::*;
