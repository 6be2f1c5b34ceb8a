//! GivingZone HTTP presentation layer
//!
//! JSON API for map consumers: location events, area searches, the
//! published discovery snapshot and directions.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use routes::create_router;
pub use state::AppState;
