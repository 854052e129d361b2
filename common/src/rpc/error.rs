use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC "method not found" code, the selector-not-found class of error
pub const METHOD_NOT_FOUND_CODE: i32 = -32601;
/// EIP-1474 execution revert code
pub const EXECUTION_REVERTED_CODE: i32 = 3;
/// EIP-1193 code for a signature request declined by the user
pub const USER_REJECTED_CODE: i32 = 4001;

/// Error object returned by an RPC collaborator
///
/// This is the raw transport-level error; it is never surfaced to callers
/// directly, every consumer normalizes it into its own taxonomy first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new<S: Into<String>>(code: i32, message: S) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data<S: Into<String>>(code: i32, message: S, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Does this error mean the target contract does not expose the function
    /// under the attempted name?
    ///
    /// Some RPC providers wrap the condition in free-form text instead of the
    /// standard code, so the message is matched as well.
    pub fn is_selector_not_found(&self) -> bool {
        if self.code == METHOD_NOT_FOUND_CODE {
            return true;
        }
        let message = self.message.to_lowercase();
        message.contains("method not found")
            || message.contains("function selector")
            || message.contains("unknown function")
    }
}

impl Display for RpcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "rpc error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_not_found_detection() {
        assert!(RpcError::new(METHOD_NOT_FOUND_CODE, "whatever").is_selector_not_found());
        assert!(RpcError::new(-32603, "Method not found").is_selector_not_found());
        assert!(RpcError::new(-32603, "no known function selector").is_selector_not_found());
        assert!(!RpcError::new(EXECUTION_REVERTED_CODE, "execution reverted").is_selector_not_found());
        assert!(!RpcError::new(-32603, "internal error").is_selector_not_found());
    }
}
