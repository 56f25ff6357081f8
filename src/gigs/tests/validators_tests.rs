// src/gigs/tests/validators_tests.rs

use crate::common::Validator;
use crate::gigs::models::{CreateGigRequest, UpdateGigRequest};
use crate::gigs::validators::{document_extension, GigValidator};

fn validator() -> GigValidator {
    GigValidator {
        reject_past_deadlines: false,
    }
}

fn valid_request() -> CreateGigRequest {
    CreateGigRequest {
        title: "Edit a 500-word essay".to_string(),
        description: "Tighten the argument and fix grammar.".to_string(),
        price: 25.0,
        deadline: "2025-01-01".to_string(),
    }
}

#[test]
fn test_valid_gig_passes() {
    let result = validator().validate(&valid_request());
    assert!(result.is_valid());
}

#[test]
fn test_empty_title_fails() {
    let mut request = valid_request();
    request.title = "   ".to_string();
    let result = validator().validate(&request);
    assert!(!result.is_valid());
    assert!(result.errors().iter().any(|e| e.field == "title"));
}

#[test]
fn test_empty_description_fails() {
    let mut request = valid_request();
    request.description = String::new();
    let result = validator().validate(&request);
    assert!(!result.is_valid());
    assert!(result.errors().iter().any(|e| e.field == "description"));
}

#[test]
fn test_negative_price_fails() {
    let mut request = valid_request();
    request.price = -5.0;
    let result = validator().validate(&request);
    assert!(!result.is_valid());
    assert!(result.errors().iter().any(|e| e.field == "price"));
}

#[test]
fn test_zero_price_is_allowed() {
    let mut request = valid_request();
    request.price = 0.0;
    assert!(validator().validate(&request).is_valid());
}

#[test]
fn test_non_finite_price_fails() {
    let mut request = valid_request();
    request.price = f64::NAN;
    assert!(!validator().validate(&request).is_valid());
}

#[test]
fn test_malformed_deadline_fails() {
    for deadline in ["01-01-2025", "2025/01/01", "someday", ""] {
        let mut request = valid_request();
        request.deadline = deadline.to_string();
        let result = validator().validate(&request);
        assert!(!result.is_valid(), "should reject deadline {:?}", deadline);
        assert!(result.errors().iter().any(|e| e.field == "deadline"));
    }
}

#[test]
fn test_past_deadline_accepted_by_default() {
    let mut request = valid_request();
    request.deadline = "2001-01-01".to_string();
    assert!(validator().validate(&request).is_valid());
}

#[test]
fn test_past_deadline_rejected_when_policy_enabled() {
    let strict = GigValidator {
        reject_past_deadlines: true,
    };
    let mut request = valid_request();
    request.deadline = "2001-01-01".to_string();
    let result = strict.validate(&request);
    assert!(!result.is_valid());
    assert!(result.errors().iter().any(|e| e.field == "deadline"));
}

#[test]
fn test_update_validates_only_present_fields() {
    let request = UpdateGigRequest {
        title: None,
        description: None,
        price: Some(40.0),
        deadline: None,
    };
    assert!(validator().validate(&request).is_valid());

    let request = UpdateGigRequest {
        title: Some(String::new()),
        description: None,
        price: None,
        deadline: None,
    };
    let result = validator().validate(&request);
    assert!(!result.is_valid());
    assert!(result.errors().iter().any(|e| e.field == "title"));
}

#[test]
fn test_document_extension_allow_list() {
    assert_eq!(document_extension("application/pdf"), Some(".pdf"));
    assert_eq!(document_extension("application/msword"), Some(".doc"));
    assert_eq!(
        document_extension(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ),
        Some(".docx")
    );
    assert_eq!(document_extension("text/plain"), Some(".txt"));

    assert_eq!(document_extension("image/png"), None);
    assert_eq!(document_extension("application/zip"), None);
    assert_eq!(document_extension(""), None);
}
