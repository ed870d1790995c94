//! Customer and city domain types.

use pitchside_core::{CityId, CustomerId};

/// A shipping city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    /// Unique city ID.
    pub id: CityId,
    /// City name.
    pub name: String,
    /// Postal code.
    pub postal_code: String,
}

/// A checkout customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Login-style name identifying the customer, unique.
    pub customer_name: String,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Home street address.
    pub street: String,
    /// Home city.
    pub city: City,
}
