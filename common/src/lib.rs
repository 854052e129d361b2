pub mod api;
pub mod canvas;
pub mod crypto;
pub mod rpc;
