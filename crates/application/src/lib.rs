//! Application layer - Use cases and orchestration
//!
//! Contains the discovery and routing use cases and the port definitions
//! the infrastructure layer implements.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
