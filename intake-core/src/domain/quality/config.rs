// intake-core/src/domain/quality/config.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct QualityConfig {
    #[serde(default = "enabled")]
    pub null_scan: bool,

    #[serde(default = "enabled")]
    pub duplicate_scan: bool,

    #[validate(nested)]
    #[serde(default = "default_temporal")]
    pub temporal: Vec<TemporalCheck>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            null_scan: true,
            duplicate_scan: true,
            temporal: default_temporal(),
        }
    }
}

/// Four timestamp columns that must be chronologically ordered:
/// purchase, approval, carrier handoff, customer delivery.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct TemporalCheck {
    #[validate(length(min = 1, message = "Temporal check needs a table"))]
    pub table: String,

    #[validate(length(equal = 4, message = "Temporal check needs exactly four ordered columns"))]
    pub columns: Vec<String>,
}

impl TemporalCheck {
    pub fn orders() -> Self {
        Self {
            table: "orders".to_string(),
            columns: vec![
                "order_purchase_timestamp".to_string(),
                "order_approved_at".to_string(),
                "order_delivered_carrier_date".to_string(),
                "order_delivered_customer_date".to_string(),
            ],
        }
    }
}

fn enabled() -> bool {
    true
}

fn default_temporal() -> Vec<TemporalCheck> {
    vec![TemporalCheck::orders()]
}
