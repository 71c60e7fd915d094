//! Node RPC layer: transport seam, JSON-RPC over HTTP, typed calls.

pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod node;
pub mod retry;
pub mod transport;
pub mod wire;

pub use error::{RpcError, RpcResult};
#[cfg(feature = "http")]
pub use http::{HttpTransport, HttpTransportBuilder};
pub use node::NodeRpc;
pub use retry::{RetryConfig, RetryPolicy};
pub use transport::{RpcErrorObject, RpcRequest, RpcResponse, RpcTransport};
