//! tp-core: stable foundation for thermoplant.
//!
//! Contains:
//! - units (uom SI types, constructors, engineering conversions, constants)
//! - numeric (finite and range guards, relative residual)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{TpError, TpResult};
pub use numeric::*;
pub use units::*;
