//! Request Body Validation
//!
//! Manual field checks over decoded payloads. Each function returns the
//! full list of failing-field messages in field order; a field reports
//! only its first failing rule.

/// Body shape for multi-field failures: {"errors": [{"error": msg}, ...]}
pub(crate) fn errors_body(messages: &[String]) -> serde_json::Value {
    serde_json::json!({
        "errors": messages
            .iter()
            .map(|m| serde_json::json!({ "error": m }))
            .collect::<Vec<_>>()
    })
}

fn required(field: &str) -> String {
    format!("{} is required", field)
}

fn min_length(field: &str, min: usize) -> String {
    format!("{} value must greater than {}", field, min)
}

fn email_format(field: &str) -> String {
    format!("{} must be a email format", field)
}

fn is_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    let (local, domain) = match value.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

pub fn validate_register(
    username: &str,
    fullname: &str,
    email: &str,
    password: &str,
) -> Vec<String> {
    let mut errors = Vec::new();

    if username.is_empty() {
        errors.push(required("Username"));
    }

    if fullname.is_empty() {
        errors.push(required("Fullname"));
    }

    if email.is_empty() {
        errors.push(required("Email"));
    } else if !is_email(email) {
        errors.push(email_format("Email"));
    }

    if password.is_empty() {
        errors.push(required("Password"));
    } else if password.chars().count() < 8 {
        errors.push(min_length("Password", 8));
    }

    errors
}

pub fn validate_login(username: &str, password: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if username.is_empty() {
        errors.push(required("Username"));
    }

    if password.is_empty() {
        errors.push(required("Password"));
    } else if password.chars().count() < 8 {
        errors.push(min_length("Password", 8));
    }

    errors
}

pub fn validate_product(name: &str, price: f64) -> Vec<String> {
    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push(required("Name"));
    } else if name.chars().count() < 10 {
        errors.push(min_length("Name", 10));
    }

    // Zero counts as missing, matching required-on-numbers semantics
    if price == 0.0 {
        errors.push(required("Price"));
    }

    errors
}

pub fn validate_post(description: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if description.is_empty() {
        errors.push(required("Description"));
    }

    errors
}

pub fn validate_comment(post_id: &str, content: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if post_id.is_empty() {
        errors.push(required("PostId"));
    }

    if content.is_empty() {
        errors.push(required("Content"));
    }

    errors
}

// ===== Tests =====
