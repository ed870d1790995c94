//! Admin area route handlers.
//!
//! Authentication for the admin area is deliberately out of scope; deploy it
//! behind a trusted network boundary.

pub mod categories;
pub mod products;
