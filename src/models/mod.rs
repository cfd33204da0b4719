// Request/Response models
pub mod account;
pub mod billing;
pub mod common;
