// Transaction submitter
// Drives one store request through its lifecycle:
// Idle -> Preparing -> Simulating -> AwaitingSignature -> Submitted ->
// Confirming -> Confirmed | Failed.
// Simulation always runs before signing so the function name is discovered
// without a committing call and revert reasons surface before the user is
// asked to sign. A submitted transaction is never resubmitted: a failed
// confirmation is reported, not retried.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::broadcast;

use dataloom_common::{
    api::store::{ReceiptStatus, StoreCall, TransactionReceipt},
    canvas::{encode_pixels, Pixel},
    crypto::TxHash,
};

use crate::{
    config::{ClientConfig, GasConfig},
    error::{truncate_reason, ClientError},
    resolver::StoreAbi,
    store_api::{ContractStore, Identity},
};

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Lifecycle of one store request, broadcast to subscribers as it advances
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorePhase {
    /// Resting state before any request; never broadcast, subscribers
    /// should assume it until the first transition arrives
    Idle,
    Preparing,
    Simulating,
    AwaitingSignature,
    Submitted { tx_hash: TxHash },
    Confirming { tx_hash: TxHash },
    Confirmed { tx_hash: TxHash, canvas_id: Option<u64> },
    Failed { cancelled: bool, message: String },
}

/// Terminal success of a store request
#[derive(Debug, Clone)]
pub struct StoreOutcome {
    pub tx_hash: TxHash,
    pub canvas_id: Option<u64>,
    pub receipt: TransactionReceipt,
}

pub struct TransactionSubmitter {
    store: Arc<dyn ContractStore>,
    identity: Arc<dyn Identity>,
    abi: Arc<StoreAbi>,
    config: ClientConfig,
    events: broadcast::Sender<StorePhase>,
}

impl TransactionSubmitter {
    pub fn new(
        store: Arc<dyn ContractStore>,
        identity: Arc<dyn Identity>,
        abi: Arc<StoreAbi>,
        config: ClientConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            identity,
            abi,
            config,
            events,
        }
    }

    /// Subscribe to phase transitions; dropping the receiver cancels the
    /// subscription, late results are simply not observed
    pub fn subscribe(&self) -> broadcast::Receiver<StorePhase> {
        self.events.subscribe()
    }

    fn transition(&self, phase: StorePhase) {
        debug!("store request phase: {:?}", phase);
        // no subscriber is fine
        let _ = self.events.send(phase);
    }

    /// Resource ceiling for a submission: non-decreasing in pixel count,
    /// capped at the configured maximum
    pub fn gas_limit(gas: &GasConfig, pixel_count: usize) -> u64 {
        gas.max
            .min(gas.base.saturating_add(gas.per_pixel.saturating_mul(pixel_count as u64)))
    }

    /// Store a canvas on-chain and wait for its confirmation
    pub async fn store_pixels(
        &self,
        pixels: &[Pixel],
        metadata: &str,
    ) -> Result<StoreOutcome, ClientError> {
        match self.submit(pixels, metadata).await {
            Ok(outcome) => {
                self.transition(StorePhase::Confirmed {
                    tx_hash: outcome.tx_hash,
                    canvas_id: outcome.canvas_id,
                });
                Ok(outcome)
            }
            Err(e) => {
                if e.is_cancellation() {
                    info!("store request cancelled by user");
                } else {
                    warn!("store request failed: {}", e);
                }
                self.transition(StorePhase::Failed {
                    cancelled: e.is_cancellation(),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn submit(&self, pixels: &[Pixel], metadata: &str) -> Result<StoreOutcome, ClientError> {
        self.transition(StorePhase::Preparing);

        let account = self.identity.account().ok_or(ClientError::NotConnected)?;
        let network = self.identity.network_id().ok_or(ClientError::NotConnected)?;
        if network != self.config.network_id {
            return Err(ClientError::WrongNetwork {
                expected: self.config.network_id,
                actual: network,
            });
        }
        if pixels.is_empty() {
            return Err(ClientError::EmptyCanvas);
        }

        let pixel_data = encode_pixels(pixels);
        let gas_limit = Self::gas_limit(&self.config.gas, pixels.len());
        debug!(
            "storing {} pixels ({} bytes encoded, gas ceiling {})",
            pixels.len(),
            pixel_data.len(),
            gas_limit
        );

        let call = StoreCall {
            function: String::new(),
            pixel_data,
            metadata: metadata.to_string(),
            from: account,
            gas_limit,
        };

        // Dry run first: discovers the exported store function without a
        // committing call and surfaces revert reasons before signing
        self.transition(StorePhase::Simulating);
        let function = {
            let store = &self.store;
            let call = &call;
            self.abi
                .store
                .invoke(|function| async move {
                    store.simulate_store(function, call).await?;
                    Ok(function)
                })
                .await?
        };

        let call = StoreCall {
            function: function.to_string(),
            ..call
        };

        self.transition(StorePhase::AwaitingSignature);
        let tx_hash = self.identity.sign_and_broadcast(&call).await?;
        info!("transaction submitted: {}", tx_hash);
        self.transition(StorePhase::Submitted { tx_hash });

        self.transition(StorePhase::Confirming { tx_hash });
        let receipt = self.store.await_receipt(&tx_hash).await?;
        match receipt.status {
            ReceiptStatus::Success => Ok(StoreOutcome {
                tx_hash,
                canvas_id: receipt.canvas_id,
                receipt,
            }),
            ReceiptStatus::Reverted => {
                let reason = receipt
                    .reason
                    .as_deref()
                    .unwrap_or("transaction reverted by contract");
                Err(ClientError::Reverted(truncate_reason(reason)))
            }
        }
    }
}
