// src/asistenku/models/service.rs
use crate::models::common::{Rupiah, ServiceId};
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalog offering.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Validate)]
pub struct Service {
    pub id: ServiceId,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: String,
    pub price: Rupiah,
    #[serde(rename = "isAvailable")]
    pub is_available: bool,
    pub quantity: u32,
}

impl Service {
    /// Available and with stock left.
    pub fn can_order(&self) -> bool {
        self.is_available && self.quantity > 0
    }
}
