//! Core configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | PROOF_BUCKET | receipts | Blob bucket for payment proof images |
//! | CHAT_CHANNEL_CAPACITY | 256 | Per-order insert feed buffer size |
//! | JASTIP_FEE | 25000 | Flat service fee (smallest currency unit) |
//! | PLATFORM_FEE | 5000 | Flat platform fee (smallest currency unit) |

use shared::FeeSchedule;

#[derive(Debug, Clone)]
pub struct Config {
    /// Blob bucket that receives payment proof images
    pub proof_bucket: String,
    /// Capacity of each per-order message broadcast channel
    pub chat_channel_capacity: usize,
    /// Fees applied at order creation
    pub fees: FeeSchedule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proof_bucket: "receipts".to_string(),
            chat_channel_capacity: 256,
            fees: FeeSchedule::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            proof_bucket: std::env::var("PROOF_BUCKET").unwrap_or(defaults.proof_bucket),
            chat_channel_capacity: std::env::var("CHAT_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.chat_channel_capacity),
            fees: FeeSchedule {
                jastip_fee: std::env::var("JASTIP_FEE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.fees.jastip_fee),
                platform_fee: std::env::var("PLATFORM_FEE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.fees.platform_fee),
            },
        }
    }
}
