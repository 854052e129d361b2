// Function name resolution
// The deployed store may export a logical operation under either of two
// names depending on the toolchain that built it. Each logical operation
// gets a resolver: an ordered candidate pair plus a memoized resolved name.
// Discovery runs at most once per session; for state-changing operations the
// probe must be a non-committing dry run, never a committing call.

use std::future::Future;

use log::debug;
use tokio::sync::Mutex;

use crate::{
    config::{
        CANVASES_BY_CREATOR_FUNCTIONS, CANVAS_COUNT_FUNCTIONS, GET_CANVAS_FUNCTIONS,
        STORE_PIXELS_FUNCTIONS,
    },
    error::ClientError,
};

pub struct FunctionResolver {
    candidates: [&'static str; 2],
    // Single-writer slot: the lock is held across probing so concurrent
    // callers never probe the same operation twice
    resolved: Mutex<Option<&'static str>>,
}

impl FunctionResolver {
    pub const fn new(candidates: [&'static str; 2]) -> Self {
        Self {
            candidates,
            resolved: Mutex::const_new(None),
        }
    }

    /// Name resolved so far, if any
    pub async fn resolved(&self) -> Option<&'static str> {
        *self.resolved.lock().await
    }

    /// Invoke `probe` with the resolved function name, probing candidates in
    /// order on first use.
    ///
    /// Only a selector-not-found failure advances to the next candidate; any
    /// other error is surfaced immediately so a revert or network failure is
    /// never misread as a wrong name. Once a name is resolved, it is reused
    /// for the rest of the session and its errors propagate as-is.
    pub async fn invoke<T, F, Fut>(&self, probe: F) -> Result<T, ClientError>
    where
        F: Fn(&'static str) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut slot = self.resolved.lock().await;
        if let Some(name) = *slot {
            drop(slot);
            return probe(name).await;
        }

        let [first, second] = self.candidates;
        match probe(first).await {
            Ok(value) => {
                debug!("resolved store function '{}'", first);
                *slot = Some(first);
                Ok(value)
            }
            Err(e) if e.is_selector_not_found() => {
                debug!("'{}' not exposed by the store, trying '{}'", first, second);
                let value = probe(second).await?;
                debug!("resolved store function '{}'", second);
                *slot = Some(second);
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }
}

/// Resolvers for every logical operation of the store
pub struct StoreAbi {
    pub count: FunctionResolver,
    pub get_canvas: FunctionResolver,
    pub by_creator: FunctionResolver,
    pub store: FunctionResolver,
}

impl StoreAbi {
    pub const fn new() -> Self {
        Self {
            count: FunctionResolver::new(CANVAS_COUNT_FUNCTIONS),
            get_canvas: FunctionResolver::new(GET_CANVAS_FUNCTIONS),
            by_creator: FunctionResolver::new(CANVASES_BY_CREATOR_FUNCTIONS),
            store: FunctionResolver::new(STORE_PIXELS_FUNCTIONS),
        }
    }
}

impl Default for StoreAbi {
    fn default() -> Self {
        Self::new()
    }
}
