use async_trait::async_trait;
use log::trace;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::error::RpcError;

/// Transport seam between API facades and the RPC collaborator
///
/// Implementations carry their own connection handling and timeouts; the
/// core defines none of its own (they are collaborator configuration).
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Issue one non-committing call and return the raw result value
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError>;
}

/// Typed call helper over a transport
pub async fn call_with<P, R>(
    transport: &dyn RpcTransport,
    method: &str,
    params: &P,
) -> Result<R, RpcError>
where
    P: Serialize + Sync,
    R: DeserializeOwned,
{
    if log::log_enabled!(log::Level::Trace) {
        trace!("call_with: {}", method);
    }
    let params =
        serde_json::to_value(params).map_err(|e| RpcError::new(-32602, e.to_string()))?;
    let value = transport.call(method, params).await?;
    serde_json::from_value(value).map_err(|e| {
        RpcError::new(
            -32700,
            format!("malformed response for '{}': {}", method, e),
        )
    })
}
