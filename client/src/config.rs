use std::time::Duration;

use serde::{Deserialize, Serialize};

use dataloom_common::canvas::DecodeMode;

// Gas ceiling formula defaults, tuned against the deployed store.
// Non-normative: callers override them through GasConfig.
pub const DEFAULT_GAS_BASE: u64 = 1_200_000;
pub const DEFAULT_GAS_PER_PIXEL: u64 = 22_000;
pub const DEFAULT_GAS_MAX: u64 = 12_000_000;

// network id the store is deployed on by default (Arbitrum Sepolia)
pub const DEFAULT_NETWORK_ID: u64 = 421_614;

pub const DEFAULT_PAGE_SIZE: usize = 10;

// Receipt polling defaults when waiting for inclusion
pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_RECEIPT_MAX_ATTEMPTS: usize = 60;

/// Bound on revert reason strings surfaced to callers
pub const REVERT_REASON_MAX_LEN: usize = 180;

// Candidate exported names per logical store operation. Naming conventions
// were inconsistent between toolchains: Stylus builds export snake_case,
// older Solidity deployments camelCase. Reads probe snake_case first; the
// store entrypoint was first seen deployed under its camelCase name.
pub const CANVAS_COUNT_FUNCTIONS: [&str; 2] = ["get_canvas_count", "getCanvasCount"];
pub const GET_CANVAS_FUNCTIONS: [&str; 2] = ["get_canvas", "getCanvas"];
pub const CANVASES_BY_CREATOR_FUNCTIONS: [&str; 2] =
    ["get_canvases_by_creator", "getCanvasesByCreator"];
pub const STORE_PIXELS_FUNCTIONS: [&str; 2] = ["storePixels", "store_pixels"];

// Functions Helpers
fn default_gas_base() -> u64 {
    DEFAULT_GAS_BASE
}

fn default_gas_per_pixel() -> u64 {
    DEFAULT_GAS_PER_PIXEL
}

fn default_gas_max() -> u64 {
    DEFAULT_GAS_MAX
}

fn default_network_id() -> u64 {
    DEFAULT_NETWORK_ID
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_RECEIPT_POLL_INTERVAL_MS
}

fn default_max_attempts() -> usize {
    DEFAULT_RECEIPT_MAX_ATTEMPTS
}

/// Submission resource ceiling as a function of pixel count:
/// `min(max, base + per_pixel * count)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasConfig {
    #[serde(default = "default_gas_base")]
    pub base: u64,
    #[serde(default = "default_gas_per_pixel")]
    pub per_pixel: u64,
    #[serde(default = "default_gas_max")]
    pub max: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_GAS_BASE,
            per_pixel: DEFAULT_GAS_PER_PIXEL,
            max: DEFAULT_GAS_MAX,
        }
    }
}

/// Polling policy while waiting for a transaction receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl ReceiptConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_RECEIPT_POLL_INTERVAL_MS,
            max_attempts: DEFAULT_RECEIPT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub gas: GasConfig,
    /// Network id the store is deployed on; submissions from any other
    /// network are rejected before simulation
    #[serde(default = "default_network_id")]
    pub network_id: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub decode_mode: DecodeMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gas: GasConfig::default(),
            network_id: DEFAULT_NETWORK_ID,
            page_size: DEFAULT_PAGE_SIZE,
            decode_mode: DecodeMode::default(),
        }
    }
}
