mod client;
mod error;

pub use client::{call_with, RpcTransport};
pub use error::{RpcError, EXECUTION_REVERTED_CODE, METHOD_NOT_FOUND_CODE, USER_REJECTED_CODE};

pub const JSON_RPC_VERSION: &str = "2.0";
