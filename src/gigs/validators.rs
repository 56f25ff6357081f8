// src/gigs/validators.rs

use super::models::{CreateGigRequest, UpdateGigRequest};
use crate::common::{ValidationResult, Validator};
use chrono::{NaiveDate, Utc};

// ============================================================================
// Gig Validators
// ============================================================================

pub struct GigValidator {
    /// Policy gate: the platform historically accepted past deadlines,
    /// so rejection is opt-in.
    pub reject_past_deadlines: bool,
}

impl GigValidator {
    fn check_title(&self, result: &mut ValidationResult, title: &str) {
        if title.trim().is_empty() {
            result.add_error("title", "Gig title is required");
        } else if title.len() > 255 {
            result.add_error("title", "Gig title must be less than 255 characters");
        }
    }

    fn check_description(&self, result: &mut ValidationResult, description: &str) {
        if description.trim().is_empty() {
            result.add_error("description", "Gig description is required");
        } else if description.len() > 10000 {
            result.add_error(
                "description",
                "Description must be less than 10000 characters",
            );
        }
    }

    fn check_price(&self, result: &mut ValidationResult, price: f64) {
        if !price.is_finite() {
            result.add_error("price", "Price must be a number");
        } else if price < 0.0 {
            result.add_error("price", "Price cannot be negative");
        }
    }

    fn check_deadline(&self, result: &mut ValidationResult, deadline: &str) {
        match NaiveDate::parse_from_str(deadline, "%Y-%m-%d") {
            Ok(date) => {
                if self.reject_past_deadlines && date < Utc::now().date_naive() {
                    result.add_error("deadline", "Deadline cannot be in the past");
                }
            }
            Err(_) => {
                result.add_error("deadline", "Deadline must be in YYYY-MM-DD format");
            }
        }
    }
}

impl Validator<CreateGigRequest> for GigValidator {
    fn validate(&self, data: &CreateGigRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        self.check_title(&mut result, &data.title);
        self.check_description(&mut result, &data.description);
        self.check_price(&mut result, data.price);
        self.check_deadline(&mut result, &data.deadline);

        result
    }
}

impl Validator<UpdateGigRequest> for GigValidator {
    fn validate(&self, data: &UpdateGigRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(title) = &data.title {
            self.check_title(&mut result, title);
        }
        if let Some(description) = &data.description {
            self.check_description(&mut result, description);
        }
        if let Some(price) = data.price {
            self.check_price(&mut result, price);
        }
        if let Some(deadline) = &data.deadline {
            self.check_deadline(&mut result, deadline);
        }

        result
    }
}

// ============================================================================
// Submission document types
// ============================================================================

/// Map a declared content type to the stored file extension.
///
/// Validation is by declared type only; bytes are not inspected.
/// Accepted: PDF, Word (legacy and OOXML), plain text.
pub fn document_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "application/pdf" => Some(".pdf"),
        "application/msword" => Some(".doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            Some(".docx")
        }
        "text/plain" => Some(".txt"),
        _ => None,
    }
}
