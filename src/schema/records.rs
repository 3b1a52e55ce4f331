use serde_json::Value;

use super::{FailureReason, FieldFailure, FieldKind, FieldSpec, Schema, ValidationError};
use crate::models::LiquidityStatus;

/// Shape of the per-asset object returned by the price API.
pub const PRICE_SCHEMA: Schema = Schema {
    name: "UpstreamPrice",
    fields: &[FieldSpec::new("usd", FieldKind::Float)],
};

/// Shape of the synthetic volume payload.
pub const VOLUME_SCHEMA: Schema = Schema {
    name: "SyntheticVolume",
    fields: &[
        FieldSpec::new("volume_24h", FieldKind::Integer),
        FieldSpec::new("liquidity_status", FieldKind::Label(LiquidityStatus::LABELS)),
    ],
};

/// Validated upstream price.
///
/// Only the structure is checked: a negative price still validates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpstreamPriceRecord {
    pub usd: f64,
}

impl UpstreamPriceRecord {
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let fields = PRICE_SCHEMA.validate(payload)?;
        Ok(Self {
            usd: fields.float("usd")?,
        })
    }
}

/// Validated synthetic volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticVolumeRecord {
    pub volume_24h: i64,
    pub liquidity_status: LiquidityStatus,
}

impl SyntheticVolumeRecord {
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let fields = VOLUME_SCHEMA.validate(payload)?;
        let volume_24h = fields.integer("volume_24h")?;
        let label = fields.label("liquidity_status")?;

        // The schema only admits LiquidityStatus::LABELS, so this always parses.
        let liquidity_status = LiquidityStatus::from_label(label).ok_or_else(|| {
            ValidationError::new(
                VOLUME_SCHEMA.name,
                vec![FieldFailure {
                    field: "liquidity_status",
                    reason: FailureReason::NotAllowed {
                        allowed: LiquidityStatus::LABELS,
                    },
                }],
            )
        })?;

        Ok(Self {
            volume_24h,
            liquidity_status,
        })
    }
}
