use std::fmt;

use serde::{Deserialize, Serialize};

/// Liquidity label derived from trading volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidityStatus {
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Média")]
    Medium,
}

impl LiquidityStatus {
    /// Every label, in wire form.
    pub const LABELS: &'static [&'static str] = &["Alta", "Média"];

    /// Wire label ("Alta" / "Média").
    pub fn label(self) -> &'static str {
        match self {
            LiquidityStatus::High => "Alta",
            LiquidityStatus::Medium => "Média",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Alta" => Some(LiquidityStatus::High),
            "Média" => Some(LiquidityStatus::Medium),
            _ => None,
        }
    }
}

impl fmt::Display for LiquidityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized record combining the upstream price with synthetic volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedAsset {
    /// Requested identifier, uppercased.
    #[serde(rename = "ativo_id")]
    pub asset_id: String,
    #[serde(rename = "valor_dolar_normalizado")]
    pub normalized_usd_value: f64,
    #[serde(rename = "volume_negociacao")]
    pub trading_volume: i64,
    #[serde(rename = "indice_liquidez")]
    pub liquidity_index: LiquidityStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consolidated_asset_wire_names() {
        let asset = ConsolidatedAsset {
            asset_id: "BITCOIN".to_string(),
            normalized_usd_value: 65000.5,
            trading_volume: 12_000_000,
            liquidity_index: LiquidityStatus::High,
        };

        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ativo_id": "BITCOIN",
                "valor_dolar_normalizado": 65000.5,
                "volume_negociacao": 12_000_000,
                "indice_liquidez": "Alta"
            })
        );
    }

    #[test]
    fn test_liquidity_labels() {
        assert_eq!(LiquidityStatus::High.to_string(), "Alta");
        assert_eq!(LiquidityStatus::Medium.to_string(), "Média");
        assert_eq!(
            serde_json::to_string(&LiquidityStatus::Medium).unwrap(),
            r#""Média""#
        );
        for label in LiquidityStatus::LABELS {
            assert_eq!(LiquidityStatus::from_label(label).unwrap().label(), *label);
        }
        assert_eq!(LiquidityStatus::from_label("High"), None);
    }
}
