// Canvas reader and gallery paginator
// Reads single canvases on demand and assembles a reverse-chronological
// gallery from the store's monotonically increasing canvas counter. A
// gallery works against a count snapshot taken once when opened: canvases
// created afterwards never shift already-computed page boundaries, a full
// refresh is required to observe them.

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, trace, warn};

use dataloom_common::{
    canvas::{decode_pixels, Canvas, DecodeMode},
    crypto::Address,
};

use crate::{error::ClientError, resolver::StoreAbi, store_api::ContractStore};

/// On-demand canvas reads through the resolved function names
pub struct CanvasReader {
    store: Arc<dyn ContractStore>,
    abi: Arc<StoreAbi>,
    decode_mode: DecodeMode,
}

impl CanvasReader {
    pub fn new(store: Arc<dyn ContractStore>, abi: Arc<StoreAbi>, decode_mode: DecodeMode) -> Self {
        Self {
            store,
            abi,
            decode_mode,
        }
    }

    /// Total number of canvases ever stored
    pub async fn count(&self) -> Result<u64, ClientError> {
        self.abi
            .count
            .invoke(|function| self.store.canvas_count(function))
            .await
    }

    /// Fetch one canvas by id and decode its pixel payload
    ///
    /// Errors are reported, not retried.
    pub async fn fetch_one(&self, id: u64) -> Result<Canvas, ClientError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("fetch_one: {}", id);
        }
        let raw = self
            .abi
            .get_canvas
            .invoke(|function| self.store.canvas(function, id))
            .await?;
        let pixels = decode_pixels(&raw.pixel_data, self.decode_mode)?;
        Ok(Canvas {
            id,
            pixels,
            metadata: raw.metadata,
            creator: raw.creator,
            timestamp: raw.timestamp,
        })
    }

    /// Ids of every canvas stored by `creator`
    pub async fn canvases_by_creator(&self, creator: &Address) -> Result<Vec<u64>, ClientError> {
        self.abi
            .by_creator
            .invoke(|function| self.store.canvases_by_creator(function, creator))
            .await
    }
}

/// One loaded window of the gallery, newest canvas first
#[derive(Debug, Clone)]
pub struct GalleryPage {
    pub canvases: Vec<Canvas>,
    /// Whether older canvases remain below this window
    pub has_more: bool,
}

/// Reverse-chronological paginated view over the stored canvases
pub struct Gallery {
    reader: CanvasReader,
    page_size: usize,
    /// Count snapshot all page windows are computed against
    total: u64,
}

impl Gallery {
    /// Open a gallery, snapshotting the store's current canvas count
    pub async fn open(reader: CanvasReader, page_size: usize) -> Result<Self, ClientError> {
        let total = reader.count().await?;
        debug!("gallery opened over {} canvases", total);
        Ok(Self {
            reader,
            page_size,
            total,
        })
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn reader(&self) -> &CanvasReader {
        &self.reader
    }

    // Id window (low, high] for a page, against the count snapshot.
    // Ids are 1-based, so the page contains ids high, high-1, ..., low+1.
    fn window(&self, page: usize) -> (u64, u64) {
        let skip = (page as u64).saturating_mul(self.page_size as u64);
        let high = self.total.saturating_sub(skip);
        let low = high.saturating_sub(self.page_size as u64);
        (low, high)
    }

    /// Load one page, newest canvas first
    ///
    /// All ids in the window are fetched concurrently and reassembled in
    /// descending-id order regardless of completion order. Individual fetch
    /// failures are dropped from the page, not retried.
    pub async fn load_page(&self, page: usize) -> GalleryPage {
        let (low, high) = self.window(page);
        if high == 0 {
            return GalleryPage {
                canvases: Vec::new(),
                has_more: false,
            };
        }

        let fetches: Vec<_> = (low + 1..=high)
            .rev()
            .map(|id| self.reader.fetch_one(id))
            .collect();
        let results = join_all(fetches).await;

        // join_all preserves input order, so survivors stay descending
        let canvases = results
            .into_iter()
            .filter_map(|result| match result {
                Ok(canvas) => Some(canvas),
                Err(e) => {
                    warn!("dropping canvas from gallery page: {}", e);
                    None
                }
            })
            .collect();

        GalleryPage {
            canvases,
            has_more: low > 0,
        }
    }

    /// Take a fresh count snapshot and reload the first page
    pub async fn refresh(&mut self) -> Result<GalleryPage, ClientError> {
        self.total = self.reader.count().await?;
        debug!("gallery refreshed, {} canvases", self.total);
        Ok(self.load_page(0).await)
    }
}
