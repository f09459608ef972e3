use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Trial coupon registration form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrialRegistration {
    pub coupon: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl TrialRegistration {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Simulated card checkout form. Only checksummed, never charged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardPayment {
    pub card_number: String,
    pub holder_name: String,
    pub expiry: String,
    pub cvv: String,
}

