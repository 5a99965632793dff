//! Validation helpers for DTOs.

use validator::ValidationError;

/// Maximum accepted length for a display name, in characters.
const MAX_NAME_LENGTH: usize = 80;

/// Validates that a display name is non-blank and of reasonable length.
///
/// # Examples
///
/// ```ignore
/// validate_display_name("Ada Lovelace") // Ok
/// validate_display_name("   ")          // Err - blank
/// ```
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message =
            Some(format!("name must be at most {MAX_NAME_LENGTH} characters").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_display_name_valid() {
        assert!(validate_display_name("Ada Lovelace").is_ok());
        assert!(validate_display_name("Cher").is_ok());
    }

    #[test]
    fn test_validate_display_name_blank() {
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name("\t\n").is_err());
    }

    #[test]
    fn test_validate_display_name_too_long() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_display_name(&long).is_err());
        let max = "x".repeat(MAX_NAME_LENGTH);
        assert!(validate_display_name(&max).is_ok());
    }
}
