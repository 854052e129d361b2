// Wire types for the canvas store API
// Parameter and result structures exchanged with the store over RPC.
// Byte payloads travel hex-encoded; contract function names are not part of
// these types since the deployed store may expose either naming convention.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::crypto::{Address, TxHash};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCanvasParams {
    pub canvas_id: u64,
}

/// Raw canvas record as returned by the store, pixel payload still encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RPCCanvas {
    #[serde(with = "hex")]
    pub pixel_data: Vec<u8>,
    pub metadata: String,
    pub creator: Address,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCanvasesByCreatorParams<'a> {
    pub creator: Cow<'a, Address>,
}

/// A fully prepared state-changing store call, ready to be signed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCall {
    /// Resolved contract function name to invoke
    pub function: String,
    #[serde(with = "hex")]
    pub pixel_data: Vec<u8>,
    pub metadata: String,
    pub from: Address,
    /// Gas ceiling computed from the pixel count
    pub gas_limit: u64,
}

/// Parameters of a non-committing dry run of the store call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateStoreParams<'a> {
    #[serde(with = "hex")]
    pub pixel_data: Vec<u8>,
    pub metadata: Cow<'a, str>,
    pub from: Cow<'a, Address>,
    pub gas_limit: u64,
}

impl<'a> SimulateStoreParams<'a> {
    pub fn from_call(call: &'a StoreCall) -> Self {
        Self {
            pixel_data: call.pixel_data.clone(),
            metadata: Cow::Borrowed(&call.metadata),
            from: Cow::Borrowed(&call.from),
            gas_limit: call.gas_limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetReceiptParams<'a> {
    pub hash: Cow<'a, TxHash>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Inclusion acknowledgment for a submitted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub hash: TxHash,
    pub status: ReceiptStatus,
    /// Revert reason reported by the store, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Id assigned to the stored canvas, when the node reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_data_is_hex_on_the_wire() {
        let params = SimulateStoreParams {
            pixel_data: vec![0x00, 0x01, 0x00, 0x02, 0xaa, 0xbb, 0xcc],
            metadata: Cow::Borrowed("demo"),
            from: Cow::Owned(Address::zero()),
            gas_limit: 1_200_000,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["pixel_data"], "00010002aabbcc");
    }

    #[test]
    fn test_receipt_optional_fields() {
        let json = r#"{"hash":"0x0101010101010101010101010101010101010101010101010101010101010101","status":"success"}"#;
        let receipt: TransactionReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Success);
        assert!(receipt.reason.is_none());
        assert!(receipt.canvas_id.is_none());
    }
}
