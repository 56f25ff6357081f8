// Helper functions for safe logging

/// Masks email addresses for log output.
///
/// # Example
/// ```
/// let masked = safe_email_log("writer@example.com");
/// // Returns: "w***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 {
            format!("{}***@{}", &parts[0][..1.min(parts[0].len())], parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}
