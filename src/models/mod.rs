mod asset_identifier;
mod consolidated;

pub use asset_identifier::{AssetIdentifier, IdentifierError};
pub use consolidated::{ConsolidatedAsset, LiquidityStatus};
