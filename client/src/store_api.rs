use std::borrow::Cow;

use async_trait::async_trait;
use log::{debug, trace, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::time::sleep;

use dataloom_common::{
    api::store::{
        GetCanvasParams, GetCanvasesByCreatorParams, GetReceiptParams, RPCCanvas,
        SimulateStoreParams, StoreCall, TransactionReceipt,
    },
    crypto::{Address, TxHash},
    rpc::{call_with, RpcTransport},
};

use crate::{
    config::ReceiptConfig,
    error::{classify_rpc_error, ClientError},
};

/// Node method used to fetch a transaction receipt; unlike the contract
/// functions this name is stable and never probed
pub const GET_TRANSACTION_RECEIPT: &str = "get_transaction_receipt";

/// The smart contract store, reached exclusively through these operations
///
/// Every contract call takes the function name to invoke: the deployed store
/// may expose either naming convention, so name discovery belongs to the
/// resolver, not to implementations.
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Total number of canvases ever stored
    async fn canvas_count(&self, function: &str) -> Result<u64, ClientError>;

    /// One canvas record by id, pixel payload still encoded
    async fn canvas(&self, function: &str, id: u64) -> Result<RPCCanvas, ClientError>;

    /// Ids of every canvas stored by a creator
    async fn canvases_by_creator(
        &self,
        function: &str,
        creator: &Address,
    ) -> Result<Vec<u64>, ClientError>;

    /// Non-committing dry run of a store call
    async fn simulate_store(&self, function: &str, call: &StoreCall) -> Result<(), ClientError>;

    /// Wait for the inclusion outcome of a submitted transaction
    async fn await_receipt(&self, hash: &TxHash) -> Result<TransactionReceipt, ClientError>;
}

/// The identity/signing provider: current account, current network and
/// user-consented signing. The only committing path in the whole core.
#[async_trait]
pub trait Identity: Send + Sync {
    fn account(&self) -> Option<Address>;

    fn network_id(&self) -> Option<u64>;

    fn is_connected(&self) -> bool {
        self.account().is_some()
    }

    /// Request signature and broadcast of a prepared store call
    ///
    /// A decline by the user must surface as [`ClientError::Declined`].
    async fn sign_and_broadcast(&self, call: &StoreCall) -> Result<TxHash, ClientError>;
}

/// JSON-RPC backed [`ContractStore`]
pub struct StoreApi<T: RpcTransport> {
    transport: T,
    receipt: ReceiptConfig,
}

impl<T: RpcTransport> StoreApi<T> {
    pub fn new(transport: T) -> Self {
        Self::with(transport, ReceiptConfig::default())
    }

    pub fn with(transport: T, receipt: ReceiptConfig) -> Self {
        Self { transport, receipt }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call<P, R>(&self, function: &str, params: &P) -> Result<R, ClientError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        call_with(&self.transport, function, params)
            .await
            .map_err(|e| classify_rpc_error(function, e))
    }
}

#[async_trait]
impl<T: RpcTransport> ContractStore for StoreApi<T> {
    async fn canvas_count(&self, function: &str) -> Result<u64, ClientError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("canvas_count via '{}'", function);
        }
        let count = self
            .transport
            .call(function, Value::Null)
            .await
            .map_err(|e| classify_rpc_error(function, e))?;
        serde_json::from_value(count).map_err(|e| ClientError::Rpc(e.to_string()))
    }

    async fn canvas(&self, function: &str, id: u64) -> Result<RPCCanvas, ClientError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("canvas {} via '{}'", id, function);
        }
        // the node answers null for ids the store never assigned
        let canvas: Option<RPCCanvas> = self
            .call(function, &GetCanvasParams { canvas_id: id })
            .await?;
        canvas.ok_or(ClientError::CanvasNotFound(id))
    }

    async fn canvases_by_creator(
        &self,
        function: &str,
        creator: &Address,
    ) -> Result<Vec<u64>, ClientError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("canvases_by_creator {} via '{}'", creator, function);
        }
        self.call(
            function,
            &GetCanvasesByCreatorParams {
                creator: Cow::Borrowed(creator),
            },
        )
        .await
    }

    async fn simulate_store(&self, function: &str, call: &StoreCall) -> Result<(), ClientError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("simulate_store via '{}'", function);
        }
        let _: Value = self
            .call(function, &SimulateStoreParams::from_call(call))
            .await?;
        Ok(())
    }

    async fn await_receipt(&self, hash: &TxHash) -> Result<TransactionReceipt, ClientError> {
        debug!("awaiting receipt for {}", hash);
        for attempt in 1..=self.receipt.max_attempts {
            let polled: Result<Option<TransactionReceipt>, ClientError> = self
                .call(
                    GET_TRANSACTION_RECEIPT,
                    &GetReceiptParams {
                        hash: Cow::Borrowed(hash),
                    },
                )
                .await;
            match polled {
                Ok(Some(receipt)) => {
                    debug!("receipt for {} observed after {} attempts", hash, attempt);
                    return Ok(receipt);
                }
                Ok(None) => {}
                // the transaction is already broadcast; a flaky poll counts
                // against the attempt limit but must not fail the wait
                Err(e) => warn!("receipt poll {} for {} failed: {}", attempt, hash, e),
            }
            if attempt < self.receipt.max_attempts {
                sleep(self.receipt.poll_interval()).await;
            }
        }
        Err(ClientError::ConfirmationTimeout)
    }
}
