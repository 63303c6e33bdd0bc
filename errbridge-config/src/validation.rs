//! Custom validation functions for reporting settings.

use regex::Regex;
use validator::ValidationError;

fn pattern(expr: &str) -> Result<Regex, ValidationError> {
    Regex::new(expr).map_err(|_| ValidationError::new("invalid_regex"))
}

/// Validate an access token.
///
/// An empty token is accepted: it means "not configured" and disables the
/// feature. A non-empty token ends up inside a `<script>` tag, so only a
/// conservative character set is allowed.
pub fn validate_access_token(token: &str) -> Result<(), ValidationError> {
    if token.is_empty() || pattern("^[A-Za-z0-9_-]{1,128}$")?.is_match(token) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_access_token"))
    }
}

/// Validate an environment name.
pub fn validate_environment(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() > 64 || trimmed != name {
        return Err(ValidationError::new("invalid_environment"));
    }
    if name.chars().any(|c| c.is_control() || c == '<' || c == '>') {
        return Err(ValidationError::new("invalid_environment"));
    }
    Ok(())
}

/// Validate the name of the global the client configuration is assigned to.
pub fn validate_js_identifier(name: &str) -> Result<(), ValidationError> {
    if pattern("^[A-Za-z_$][A-Za-z0-9_$]{0,63}$")?.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_js_identifier"))
    }
}
