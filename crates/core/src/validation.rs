//! Input validation utilities.
//!
//! This module contains functions for validating user inputs before they are written to
//! the record store.

use crate::constants::MAX_GESTATIONAL_WEEKS;
use crate::error::{StoreError, StoreResult};

/// Validates a gestational age in completed weeks.
///
/// # Errors
///
/// Returns a `StoreError::InvalidInput` if `weeks` exceeds [`MAX_GESTATIONAL_WEEKS`].
pub fn validate_gestational_weeks(weeks: u8) -> StoreResult<()> {
    if weeks > MAX_GESTATIONAL_WEEKS {
        return Err(StoreError::InvalidInput(format!(
            "gestational age must be at most {MAX_GESTATIONAL_WEEKS} weeks, got {weeks}"
        )));
    }
    Ok(())
}

/// Validates a medical council registration of the form `<digits>-<state>`, e.g. `12345-SP`.
///
/// - The number part is 4 to 7 ASCII digits
/// - The state part is exactly two ASCII uppercase letters
///
/// # Errors
///
/// Returns a `StoreError::InvalidInput` if the registration is malformed.
pub fn validate_council_registration(registration: &str) -> StoreResult<()> {
    let invalid = || {
        StoreError::InvalidInput(format!(
            "registration '{registration}' must look like 12345-SP"
        ))
    };

    let (number, state) = registration.trim().split_once('-').ok_or_else(invalid)?;
    let number_ok = (4..=7).contains(&number.len()) && number.bytes().all(|b| b.is_ascii_digit());
    let state_ok = state.len() == 2 && state.bytes().all(|b| b.is_ascii_uppercase());

    if !number_ok || !state_ok {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gestational_weeks_bound() {
        assert!(validate_gestational_weeks(0).is_ok());
        assert!(validate_gestational_weeks(MAX_GESTATIONAL_WEEKS).is_ok());
        assert!(validate_gestational_weeks(MAX_GESTATIONAL_WEEKS + 1).is_err());
    }

    #[test]
    fn test_council_registration_format() {
        assert!(validate_council_registration("12345-SP").is_ok());
        assert!(validate_council_registration(" 1234567-RJ ").is_ok());
        assert!(validate_council_registration("12345").is_err());
        assert!(validate_council_registration("12345-sp").is_err());
        assert!(validate_council_registration("12a45-SP").is_err());
        assert!(validate_council_registration("12345-SPX").is_err());
    }
}
