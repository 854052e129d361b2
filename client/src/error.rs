use thiserror::Error;

use dataloom_common::{
    canvas::CodecError,
    rpc::{RpcError, EXECUTION_REVERTED_CODE, USER_REJECTED_CODE},
};

use crate::config::REVERT_REASON_MAX_LEN;

/// Normalized error taxonomy surfaced to callers
///
/// Every transport-level failure is classified into one of these categories
/// before it reaches a caller; raw RPC error objects never escape the core.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The store does not expose the attempted function name
    #[error("store does not expose function '{}'", _0)]
    SelectorNotFound(String),
    /// The user declined to sign, an informational cancellation
    #[error("transaction cancelled")]
    Declined,
    #[error("insufficient funds for gas fees")]
    InsufficientFunds,
    #[error("wrong network: store is deployed on chain {}, connected to {}", expected, actual)]
    WrongNetwork { expected: u64, actual: u64 },
    #[error("nonce too low, a previous transaction may still be pending")]
    StaleNonce,
    /// Contract revert, reason surfaced verbatim (bounded length)
    #[error("contract reverted: {}", _0)]
    Reverted(String),
    #[error("canvas {} not found", _0)]
    CanvasNotFound(u64),
    #[error("no identity connected")]
    NotConnected,
    #[error("nothing to store, canvas has no pixels")]
    EmptyCanvas,
    #[error("transaction receipt not observed in time")]
    ConfirmationTimeout,
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Transient transport failure; retrying is left to the caller
    #[error("rpc error: {}", _0)]
    Rpc(String),
}

impl ClientError {
    pub fn is_selector_not_found(&self) -> bool {
        matches!(self, Self::SelectorNotFound(_))
    }

    /// Cancellations are terminal but not failures, callers should avoid
    /// alarming language for them
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Declined)
    }
}

/// Truncate a revert reason to the configured bound, on a char boundary
pub fn truncate_reason(reason: &str) -> String {
    if reason.chars().count() <= REVERT_REASON_MAX_LEN {
        return reason.to_string();
    }
    let mut truncated: String = reason.chars().take(REVERT_REASON_MAX_LEN - 1).collect();
    truncated.push('…');
    truncated
}

/// Normalize a raw RPC error for the call of `function` into the taxonomy
pub fn classify_rpc_error(function: &str, error: RpcError) -> ClientError {
    if error.is_selector_not_found() {
        return ClientError::SelectorNotFound(function.to_string());
    }

    let message = error.message.to_lowercase();
    if error.code == USER_REJECTED_CODE || message.contains("user rejected") {
        return ClientError::Declined;
    }
    if message.contains("insufficient funds") {
        return ClientError::InsufficientFunds;
    }
    if message.contains("nonce too low") {
        return ClientError::StaleNonce;
    }
    if error.code == EXECUTION_REVERTED_CODE
        || message.contains("execution reverted")
        || message.contains("revert")
    {
        // prefer the dedicated reason field over the wrapped message
        let reason = error
            .data
            .as_ref()
            .and_then(|data| data.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| {
                let stripped = error
                    .message
                    .trim_start_matches("execution reverted:")
                    .trim();
                if stripped.is_empty() {
                    "transaction reverted by contract".to_string()
                } else {
                    stripped.to_string()
                }
            });
        return ClientError::Reverted(truncate_reason(&reason));
    }

    ClientError::Rpc(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataloom_common::rpc::METHOD_NOT_FOUND_CODE;

    #[test]
    fn test_classify_selector_not_found() {
        let classified = classify_rpc_error(
            "getCanvasCount",
            RpcError::new(METHOD_NOT_FOUND_CODE, "Method not found"),
        );
        assert!(matches!(
            classified,
            ClientError::SelectorNotFound(ref name) if name == "getCanvasCount"
        ));
    }

    #[test]
    fn test_classify_user_rejected() {
        let by_code = classify_rpc_error("storePixels", RpcError::new(USER_REJECTED_CODE, "denied"));
        assert!(by_code.is_cancellation());

        let by_message =
            classify_rpc_error("storePixels", RpcError::new(-32000, "User rejected the request"));
        assert!(by_message.is_cancellation());
    }

    #[test]
    fn test_classify_actionable_categories() {
        assert!(matches!(
            classify_rpc_error("storePixels", RpcError::new(-32000, "insufficient funds for gas")),
            ClientError::InsufficientFunds
        ));
        assert!(matches!(
            classify_rpc_error("storePixels", RpcError::new(-32000, "nonce too low")),
            ClientError::StaleNonce
        ));
    }

    #[test]
    fn test_classify_revert_prefers_data_reason() {
        let error = RpcError::with_data(
            EXECUTION_REVERTED_CODE,
            "execution reverted",
            serde_json::json!("canvas too large"),
        );
        assert!(matches!(
            classify_rpc_error("storePixels", error),
            ClientError::Reverted(ref reason) if reason == "canvas too large"
        ));
    }

    #[test]
    fn test_classify_revert_strips_prefix() {
        let error = RpcError::new(-32000, "execution reverted: out of bounds");
        assert!(matches!(
            classify_rpc_error("storePixels", error),
            ClientError::Reverted(ref reason) if reason == "out of bounds"
        ));
    }

    #[test]
    fn test_classify_generic_rpc() {
        let classified = classify_rpc_error("get_canvas", RpcError::new(-32603, "internal error"));
        assert!(matches!(classified, ClientError::Rpc(_)));
    }

    #[test]
    fn test_truncate_reason_bound() {
        let long = "x".repeat(REVERT_REASON_MAX_LEN * 2);
        let truncated = truncate_reason(&long);
        assert_eq!(truncated.chars().count(), REVERT_REASON_MAX_LEN);
        assert!(truncated.ends_with('…'));

        let short = "fits";
        assert_eq!(truncate_reason(short), short);
    }
}
