// src/auth/validators.rs

use super::models::SignupRequest;
use crate::common::{ValidationResult, Validator};

pub struct CredentialsValidator;

impl Validator<SignupRequest> for CredentialsValidator {
    fn validate(&self, data: &SignupRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let email = data.email.trim();
        if email.is_empty() {
            result.add_error("email", "Email is required");
        } else if email.len() > 255 {
            result.add_error("email", "Email must be less than 255 characters");
        } else {
            // Shape check only; deliverability is the mail system's problem.
            let parts: Vec<&str> = email.split('@').collect();
            if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
                result.add_error("email", "Email address is not valid");
            }
        }

        if data.password.len() < 8 {
            result.add_error("password", "Password must be at least 8 characters");
        } else if data.password.len() > 128 {
            result.add_error("password", "Password must be less than 128 characters");
        }

        result
    }
}
