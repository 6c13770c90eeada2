//! Manual address entry form

use crate::core::address::WalletAddress;
use crate::utils::validation::{validate_address_format, validate_required, ValidationResult};

type Validator = fn(&str) -> ValidationResult;

/// Validators run in this order on every change
const VALIDATORS: [(&str, Validator); 2] = [
    ("required", validate_required),
    ("format", validate_address_format),
];

/// Single-field form holding the address typed (or detected) by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressForm {
    value: String,
    errors: Vec<(&'static str, String)>,
}

impl AddressForm {
    /// Empty form with validators already applied
    pub fn new() -> Self {
        let mut form = Self::default();
        form.validate();
        form
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.validate();
    }

    /// Clear the field back to a single empty value
    pub fn reset(&mut self) {
        self.set_value(String::new());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failing validator names with their messages
    pub fn errors(&self) -> &[(&'static str, String)] {
        &self.errors
    }

    /// Error messages only
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|(_, message)| message.clone()).collect()
    }

    /// The entered address when the form is valid
    pub fn address(&self) -> Option<WalletAddress> {
        if !self.is_valid() {
            return None;
        }
        WalletAddress::parse(&self.value).ok()
    }

    fn validate(&mut self) {
        self.errors = VALIDATORS
            .iter()
            .filter_map(|(name, validator)| validator(&self.value).error.map(|error| (*name, error)))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "0x1111111111111111111111111111111111111111";

    #[test]
    fn test_new_form_is_invalid_because_required() {
        let form = AddressForm::new();
        assert!(!form.is_valid());
        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.errors()[0].0, "required");
        assert!(form.address().is_none());
    }

    #[test]
    fn test_format_error_after_required_passes() {
        let mut form = AddressForm::new();
        form.set_value("0x123");
        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.errors()[0].0, "format");

        form.set_value(VALID);
        assert!(form.is_valid());
        assert_eq!(form.address().unwrap().as_str(), VALID);
    }

    #[test]
    fn test_reset_clears_value() {
        let mut form = AddressForm::new();
        form.set_value(VALID);
        form.reset();
        assert_eq!(form.value(), "");
        assert_eq!(form.error_messages(), vec!["Wallet address is required".to_string()]);
    }
}
