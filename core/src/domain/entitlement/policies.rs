use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{
    common::entities::app_errors::CoreError,
    entitlement::{
        entities::RegisteredUser,
        value_objects::{CardPayment, TrialRegistration},
    },
};

/// Registration code accepted for the free trial.
pub const TRIAL_COUPON: &str = "08G";

/// Shortest accepted masked phone: area code plus eight digits.
pub const MIN_MASKED_PHONE_LEN: usize = 14;

const MAX_PHONE_DIGITS: usize = 11;
const MAX_CARD_DIGITS: usize = 16;
const MIN_CARD_DIGITS: usize = 13;
const MAX_CVV_DIGITS: usize = 4;

static NON_DIGIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\D").expect("non-digit regex is valid"));

pub fn digits_only(value: &str) -> String {
    NON_DIGIT_REGEX.replace_all(value, "").into_owned()
}

/// Applies the area-code phone mask to the first eleven digits of `raw`.
/// The dash always follows the fourth local digit.
pub fn mask_phone(raw: &str) -> String {
    let digits: String = digits_only(raw).chars().take(MAX_PHONE_DIGITS).collect();

    let mut masked = digits.clone();
    if digits.len() > 2 {
        masked = format!("({}) {}", &digits[..2], &digits[2..]);
    }
    if masked.len() > 9 {
        masked = format!("{}-{}", &masked[..9], &masked[9..]);
    }
    masked
}

/// Luhn checksum over a string of ASCII digits.
pub fn luhn_check(digits: &str) -> bool {
    let mut checksum = 0;
    let mut double = false;

    for c in digits.chars().rev() {
        let Some(mut value) = c.to_digit(10) else {
            return false;
        };
        if double {
            value *= 2;
            if value > 9 {
                value -= 9;
            }
        }
        checksum += value;
        double = !double;
    }

    checksum % 10 == 0
}

pub fn validate_trial(registration: &TrialRegistration) -> Result<(), CoreError> {
    if registration.first_name.trim().is_empty() || registration.last_name.trim().is_empty() {
        return Err(CoreError::Validation(
            "first and last name are required".to_string(),
        ));
    }

    if mask_phone(&registration.phone).len() < MIN_MASKED_PHONE_LEN {
        return Err(CoreError::Validation("invalid phone number".to_string()));
    }

    if !registration.email.contains('@') || !registration.email.contains('.') {
        return Err(CoreError::Validation("invalid email".to_string()));
    }

    if !registration.coupon.trim().eq_ignore_ascii_case(TRIAL_COUPON) {
        return Err(CoreError::Validation(
            "invalid or expired coupon".to_string(),
        ));
    }

    Ok(())
}

/// True when the email (any case) or the phone digits were already used for a trial.
pub fn is_duplicate_registration(
    registered: &[RegisteredUser],
    email: &str,
    phone: &str,
) -> bool {
    let email = email.trim().to_lowercase();
    let phone = digits_only(phone);

    registered.iter().any(|user| {
        let user_email = user.email.trim().to_lowercase();
        (!user_email.is_empty() && user_email == email)
            || (!user.phone.is_empty() && user.phone == phone)
    })
}

pub fn validate_card(payment: &CardPayment) -> Result<(), CoreError> {
    let card = digits_only(&payment.card_number);

    if !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&card.len()) {
        return Err(CoreError::Validation(format!(
            "card number must have {MIN_CARD_DIGITS} to {MAX_CARD_DIGITS} digits"
        )));
    }

    if !luhn_check(&card) {
        return Err(CoreError::Validation("invalid card number".to_string()));
    }

    if payment.holder_name.trim().chars().count() < 3 {
        return Err(CoreError::Validation("invalid card holder name".to_string()));
    }

    let cvv: String = digits_only(&payment.cvv)
        .chars()
        .take(MAX_CVV_DIGITS)
        .collect();
    if cvv.len() < 3 {
        return Err(CoreError::Validation("invalid CVV".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> TrialRegistration {
        TrialRegistration {
            coupon: "08g".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: "24999241876".to_string(),
        }
    }

    fn card(number: &str) -> CardPayment {
        CardPayment {
            card_number: number.to_string(),
            holder_name: "Ana Souza".to_string(),
            expiry: "12/29".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_luhn_accepts_known_test_numbers() {
        assert!(luhn_check("4111111111111111"));
        assert!(luhn_check("5555555555554444"));
        assert!(luhn_check("378282246310005"));
    }

    #[test]
    fn test_luhn_rejects_altered_number() {
        assert!(!luhn_check("4111111111111112"));
        assert!(!luhn_check("41111a1111111111"));
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("24999241876"), "(24) 9992-41876");
        assert_eq!(mask_phone("(24) 9999-1234"), "(24) 9999-1234");
        assert_eq!(mask_phone("2499"), "(24) 99");
        assert_eq!(mask_phone("249992418769999"), "(24) 9992-41876");
    }

    #[test]
    fn test_validate_trial_accepts_valid_form() {
        assert!(validate_trial(&registration()).is_ok());
    }

    #[test]
    fn test_validate_trial_rejects_bad_fields() {
        let mut form = registration();
        form.last_name = "  ".to_string();
        assert!(matches!(validate_trial(&form), Err(CoreError::Validation(_))));

        let mut form = registration();
        form.phone = "249992".to_string();
        assert!(matches!(validate_trial(&form), Err(CoreError::Validation(_))));

        let mut form = registration();
        form.email = "ana.example.com".to_string();
        assert!(matches!(validate_trial(&form), Err(CoreError::Validation(_))));

        let mut form = registration();
        form.coupon = "FREE".to_string();
        assert!(matches!(validate_trial(&form), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_duplicate_email_is_case_insensitive() {
        let registered = vec![RegisteredUser {
            email: "a@b.com".to_string(),
            phone: "11911112222".to_string(),
            name: "A B".to_string(),
            date: "2025-01-01T00:00:00Z".to_string(),
        }];

        assert!(is_duplicate_registration(&registered, "A@B.COM", "21988887777"));
        assert!(is_duplicate_registration(&registered, "a@b.com", ""));
        assert!(is_duplicate_registration(&registered, "x@y.com", "(11) 91111-2222"));
        assert!(!is_duplicate_registration(&registered, "x@y.com", "21988887777"));
    }

    #[test]
    fn test_entries_missing_a_field_never_match_it() {
        let registered = vec![
            RegisteredUser {
                email: "a@b.com".to_string(),
                ..Default::default()
            },
            RegisteredUser {
                phone: "11911112222".to_string(),
                ..Default::default()
            },
        ];

        assert!(!is_duplicate_registration(&registered, "x@y.com", ""));
        assert!(is_duplicate_registration(&registered, "x@y.com", "11911112222"));
    }

    #[test]
    fn test_validate_card() {
        assert!(validate_card(&card("4111 1111 1111 1111")).is_ok());
        assert!(validate_card(&card("4111 1111 1111 1112")).is_err());
        assert!(validate_card(&card("4111 1111 111")).is_err());
        assert!(validate_card(&card("378282246310005")).is_ok());

        let mut payment = card("4111111111111111");
        payment.holder_name = "Al".to_string();
        assert!(validate_card(&payment).is_err());

        let mut payment = card("4111111111111111");
        payment.cvv = "12".to_string();
        assert!(validate_card(&payment).is_err());
    }

    #[test]
    fn test_validate_card_rejects_extra_digits_instead_of_truncating() {
        // Luhn-valid 19 digits, and 16 valid digits followed by junk.
        for number in ["4111111111111111110", "4111 1111 1111 1111 000"] {
            let error = validate_card(&card(number)).unwrap_err();
            assert_eq!(
                error,
                CoreError::Validation("card number must have 13 to 16 digits".to_string())
            );
        }
    }
}
