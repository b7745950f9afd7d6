//! Trip Model
//!
//! A traveler's announced journey. Trip browsing, search, and pagination
//! are external to this core; the type exists because orders reference
//! `trip_id` and the creation flow hands one over.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Trip entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub traveler_id: String,
    pub origin_city: String,
    pub destination_province: String,
    pub departure_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Create trip payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTrip {
    pub traveler_id: String,
    #[validate(length(min = 1, message = "origin city is required"))]
    pub origin_city: String,
    #[validate(length(min = 1, message = "destination is required"))]
    pub destination_province: String,
    pub departure_date: NaiveDate,
}
