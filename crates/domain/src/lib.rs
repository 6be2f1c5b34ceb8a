//! Domain layer for GivingZone
//!
//! Contains the geographic value objects, distance math, organization records
//! and the location lifecycle state machine. This layer performs no I/O and
//! defines the ubiquitous language shared by every other crate.

pub mod entities;
pub mod errors;
pub mod geo_math;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
