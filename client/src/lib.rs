pub mod client;
pub mod config;
pub mod error;
pub mod gallery;
pub mod resolver;
pub mod store_api;
pub mod submitter;

pub use client::DataLoomClient;
pub use error::ClientError;
