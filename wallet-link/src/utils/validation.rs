/// Validation utilities for user input
use crate::core::address::ADDRESS_PATTERN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Validate that a field has a value
pub fn validate_required(value: &str) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::err("Wallet address is required");
    }

    ValidationResult::ok()
}

/// Validate wallet address format
///
/// Empty input passes: emptiness is the `required` validator's concern.
/// Anything else must be `0x` followed by exactly 40 hex digits.
pub fn validate_address_format(value: &str) -> ValidationResult {
    if !value.is_empty() && !ADDRESS_PATTERN.is_match(value) {
        return ValidationResult::err("Address must be 0x followed by 40 hex characters");
    }

    ValidationResult::ok()
}

/// Whether `value` is a complete, well-formed wallet address
pub fn is_wallet_address(value: &str) -> bool {
    ADDRESS_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_validation() {
        assert!(validate_required("0x").is_valid);
        assert!(!validate_required("").is_valid);
    }

    #[test]
    fn test_address_format_validation() {
        assert!(validate_address_format("").is_valid); // deferred to required
        assert!(validate_address_format(&format!("0x{}", "a".repeat(40))).is_valid);
        assert!(validate_address_format(&format!("0x{}", "F".repeat(40))).is_valid);
        assert!(!validate_address_format("0x").is_valid);
        assert!(!validate_address_format(&"a".repeat(42)).is_valid);
        assert!(!validate_address_format(&format!("0x{}", "a".repeat(39))).is_valid);
        assert!(!validate_address_format(&format!("0x{}", "a".repeat(41))).is_valid);
        assert!(!validate_address_format(&format!("0x{}z", "a".repeat(39))).is_valid);
        assert!(!validate_address_format(&format!("0x{}\n", "a".repeat(40))).is_valid);
    }

    #[test]
    fn test_address_format_matches_pattern_for_generated_inputs() {
        // Sweep every single-character substitution of a valid address.
        let base: Vec<char> = format!("0x{}", "0".repeat(40)).chars().collect();
        for pos in 0..base.len() {
            for c in ['0', '9', 'a', 'f', 'A', 'F', 'g', 'x', 'X', ' ', '-'] {
                let mut candidate = base.clone();
                candidate[pos] = c;
                let s: String = candidate.into_iter().collect();
                let expected = s.len() == 42
                    && s.starts_with("0x")
                    && s[2..].chars().all(|ch| ch.is_ascii_hexdigit());
                assert_eq!(validate_address_format(&s).is_valid, expected, "{:?}", s);
                assert_eq!(is_wallet_address(&s), expected, "{:?}", s);
            }
        }
    }
}
