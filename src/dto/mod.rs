pub mod auth;
pub mod common;
pub mod decimal_serde;
pub mod market;
pub mod navigation;
pub mod order;
pub mod rpc;

pub use auth::*;
pub use common::*;
pub use market::*;
pub use navigation::*;
pub use order::*;
pub use rpc::{ApiError, JsonRpcRequest, JsonRpcResponse};
