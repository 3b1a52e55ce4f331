use serde_json::Value;

use super::FetchError;
use crate::models::AssetIdentifier;

/// A spot price API queried once per request.
#[async_trait::async_trait]
pub trait SpotPriceSource: Send + Sync {
    /// Fetch the raw, unvalidated payload the API holds for `asset`.
    ///
    /// Exactly one upstream attempt is made.
    async fn fetch_raw(&self, asset: &AssetIdentifier) -> Result<Value, FetchError>;

    fn name(&self) -> &str;
}
