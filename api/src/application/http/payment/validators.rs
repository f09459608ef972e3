use nutriscan_core::domain::entitlement::{CardPayment, TrialRegistration};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct GrantTrialValidator {
    #[validate(length(min = 1, max = 32, message = "coupon is required"))]
    pub coupon: String,
    #[validate(length(min = 1, max = 100, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last_name is required"))]
    pub last_name: String,
    #[validate(length(min = 3, max = 254, message = "email is required"))]
    pub email: String,
    #[schema(example = "(24) 99924-1876")]
    #[validate(length(min = 10, max = 32, message = "phone is required"))]
    pub phone: String,
}

impl From<GrantTrialValidator> for TrialRegistration {
    fn from(value: GrantTrialValidator) -> Self {
        TrialRegistration {
            coupon: value.coupon,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct GrantLifetimeValidator {
    #[schema(example = "4111 1111 1111 1111")]
    #[validate(length(min = 13, max = 23, message = "card_number must have 13 to 16 digits"))]
    pub card_number: String,
    #[validate(length(min = 3, max = 100, message = "holder_name is too short"))]
    pub holder_name: String,
    #[schema(example = "12/29")]
    #[validate(length(min = 4, max = 7, message = "expiry must be MM/YY"))]
    pub expiry: String,
    #[validate(length(min = 3, max = 4, message = "cvv must have 3 or 4 digits"))]
    pub cvv: String,
}

impl From<GrantLifetimeValidator> for CardPayment {
    fn from(value: GrantLifetimeValidator) -> Self {
        CardPayment {
            card_number: value.card_number,
            holder_name: value.holder_name,
            expiry: value.expiry,
            cvv: value.cvv,
        }
    }
}
