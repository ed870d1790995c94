//! Core types for Pitchside.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod availability;
pub mod id;
pub mod price;

pub use availability::Availability;
pub use id::*;
pub use price::{Price, PriceError};
