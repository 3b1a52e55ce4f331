mod error;
pub mod providers;
mod source;

pub use error::FetchError;
pub use providers::CoinGeckoPriceSource;
pub use source::SpotPriceSource;
