pub mod caching;
pub mod exchangerate_api;
pub mod frankfurter;
pub mod util;

pub use caching::{CachingRateProvider, Snapshot};
pub use exchangerate_api::ExchangeRateApiProvider;
pub use frankfurter::FrankfurterProvider;
