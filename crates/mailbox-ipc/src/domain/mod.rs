//! Domain layer: endpoint configuration and receive filtering. No I/O.

pub mod config;
pub mod filter;

pub use config::{EndpointConfig, EndpointConfigBuilder, DEFAULT_MAILBOX_ID, DEFAULT_MAILBOX_TAG};
pub use filter::{OneOrMany, ReceiveFilter, RecvParams, RecvParamsBuilder, Rejection};
