use std::sync::Arc;

use log::trace;

use dataloom_common::crypto::Address;

use crate::{
    config::ClientConfig,
    error::ClientError,
    gallery::{CanvasReader, Gallery},
    resolver::StoreAbi,
    store_api::{ContractStore, Identity},
    submitter::TransactionSubmitter,
};

/// Client facade over the store and identity collaborators
///
/// Holds the per-session resolved function names; all submitters, readers
/// and galleries created from one client share them, so each logical
/// operation is probed at most once.
pub struct DataLoomClient {
    store: Arc<dyn ContractStore>,
    identity: Arc<dyn Identity>,
    abi: Arc<StoreAbi>,
    config: ClientConfig,
}

impl DataLoomClient {
    pub fn new(
        store: Arc<dyn ContractStore>,
        identity: Arc<dyn Identity>,
        config: ClientConfig,
    ) -> Self {
        Self {
            store,
            identity,
            abi: Arc::new(StoreAbi::new()),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.identity.is_connected()
    }

    pub fn account(&self) -> Option<Address> {
        self.identity.account()
    }

    /// Submitter for state-changing store requests
    pub fn submitter(&self) -> TransactionSubmitter {
        TransactionSubmitter::new(
            Arc::clone(&self.store),
            Arc::clone(&self.identity),
            Arc::clone(&self.abi),
            self.config.clone(),
        )
    }

    /// On-demand canvas reader
    pub fn reader(&self) -> CanvasReader {
        CanvasReader::new(
            Arc::clone(&self.store),
            Arc::clone(&self.abi),
            self.config.decode_mode,
        )
    }

    /// Open a gallery over the current canvas count
    pub async fn gallery(&self) -> Result<Gallery, ClientError> {
        trace!("opening gallery");
        Gallery::open(self.reader(), self.config.page_size).await
    }

    /// Current canvas count, probing the exported name on first use
    pub async fn canvas_count(&self) -> Result<u64, ClientError> {
        self.reader().count().await
    }
}
