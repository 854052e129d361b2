// StoreApi over a scripted JSON-RPC transport: receipt polling behavior
// (nulls, flaky polls, the attempt limit) and error classification of raw
// transport failures.

use std::{
    collections::VecDeque,
    sync::Mutex,
    time::Duration,
};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use dataloom_client::{
    config::ReceiptConfig,
    error::ClientError,
    store_api::{ContractStore, StoreApi},
};
use dataloom_common::{
    api::store::{ReceiptStatus, StoreCall},
    crypto::{Address, TxHash},
    rpc::{RpcError, RpcTransport, METHOD_NOT_FOUND_CODE},
};

/// Transport answering from a fixed script, one entry per call
struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, RpcError>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Result<Value, RpcError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RpcError::new(-32603, "script exhausted")))
    }
}

fn fast_receipts(max_attempts: usize) -> ReceiptConfig {
    ReceiptConfig {
        poll_interval_ms: 1,
        max_attempts,
    }
}

fn tx_hash() -> TxHash {
    TxHash::new([0xab; 32])
}

fn receipt_json() -> Value {
    json!({
        "hash": tx_hash().to_string(),
        "status": "success",
        "canvas_id": 7,
    })
}

#[tokio::test]
async fn test_receipt_survives_transient_poll_failure() -> Result<()> {
    // null (not yet included), then a flaky poll, then the receipt
    let api = StoreApi::with(
        ScriptedTransport::new(vec![
            Ok(Value::Null),
            Err(RpcError::new(-32005, "request timed out")),
            Ok(receipt_json()),
        ]),
        fast_receipts(5),
    );

    let receipt = api.await_receipt(&tx_hash()).await?;
    assert_eq!(receipt.status, ReceiptStatus::Success);
    assert_eq!(receipt.canvas_id, Some(7));
    assert_eq!(api.transport().calls().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_receipt_timeout_after_max_attempts() {
    let api = StoreApi::with(
        ScriptedTransport::new(vec![Ok(Value::Null), Ok(Value::Null), Ok(Value::Null)]),
        fast_receipts(3),
    );

    let result = api.await_receipt(&tx_hash()).await;
    assert!(matches!(result, Err(ClientError::ConfirmationTimeout)));
    assert_eq!(api.transport().calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_no_sleep_after_the_final_poll() {
    let api = StoreApi::with(
        ScriptedTransport::new(vec![Ok(Value::Null), Ok(Value::Null), Ok(Value::Null)]),
        ReceiptConfig {
            poll_interval_ms: 2_000,
            max_attempts: 3,
        },
    );

    let started = tokio::time::Instant::now();
    let result = api.await_receipt(&tx_hash()).await;
    assert!(matches!(result, Err(ClientError::ConfirmationTimeout)));
    // 3 polls are separated by exactly 2 intervals
    assert_eq!(started.elapsed(), Duration::from_millis(4_000));
}

#[tokio::test]
async fn test_wrong_name_classified_from_transport() {
    let api = StoreApi::with(
        ScriptedTransport::new(vec![Err(RpcError::new(
            METHOD_NOT_FOUND_CODE,
            "Method not found",
        ))]),
        fast_receipts(1),
    );

    let result = api.canvas_count("get_canvas_count").await;
    assert!(matches!(
        result,
        Err(ClientError::SelectorNotFound(ref name)) if name == "get_canvas_count"
    ));
}

#[tokio::test]
async fn test_canvas_round_trip_through_transport() -> Result<()> {
    let api = StoreApi::with(
        ScriptedTransport::new(vec![Ok(json!({
            "pixel_data": "00010002aabbcc",
            "metadata": "demo",
            "creator": Address::zero().to_string(),
            "timestamp": 1_700_000_000u64,
        }))]),
        fast_receipts(1),
    );

    let canvas = api.canvas("get_canvas", 1).await?;
    assert_eq!(canvas.pixel_data, [0x00, 0x01, 0x00, 0x02, 0xaa, 0xbb, 0xcc]);
    assert_eq!(canvas.metadata, "demo");

    let calls = api.transport().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "get_canvas");
    assert_eq!(calls[0].1, json!({ "canvas_id": 1 }));
    Ok(())
}

#[tokio::test]
async fn test_null_canvas_is_not_found() {
    let api = StoreApi::with(
        ScriptedTransport::new(vec![Ok(Value::Null)]),
        fast_receipts(1),
    );

    let result = api.canvas("get_canvas", 5).await;
    assert!(matches!(result, Err(ClientError::CanvasNotFound(5))));
}

#[tokio::test]
async fn test_simulation_revert_classified_with_reason() {
    let api = StoreApi::with(
        ScriptedTransport::new(vec![Err(RpcError::new(
            -32000,
            "execution reverted: canvas too large",
        ))]),
        fast_receipts(1),
    );

    let call = StoreCall {
        function: "storePixels".to_string(),
        pixel_data: vec![0x00, 0x01, 0x00, 0x02, 0xaa, 0xbb, 0xcc],
        metadata: "oversized".to_string(),
        from: Address::zero(),
        gas_limit: 1_200_000,
    };
    let result = api.simulate_store("storePixels", &call).await;
    assert!(matches!(
        result,
        Err(ClientError::Reverted(ref reason)) if reason == "canvas too large"
    ));
}
