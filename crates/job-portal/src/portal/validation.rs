use super::error::PortalError;

/// Trimmed, non-empty value or a validation error naming the field.
pub(crate) fn required(field: &str, value: &str) -> Result<String, PortalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PortalError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Lower-cased address with a non-empty local part and a dotted domain.
pub(crate) fn email(field: &str, value: &str) -> Result<String, PortalError> {
    let address = required(field, value)?.to_ascii_lowercase();
    let valid = match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !address.contains(char::is_whitespace)
                && domain.contains('.')
                && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    };
    if !valid {
        return Err(PortalError::validation(format!("{field} must be a valid email")));
    }
    Ok(address)
}

/// Passwords are kept verbatim; only emptiness is rejected.
pub(crate) fn password(value: &str) -> Result<&str, PortalError> {
    if value.is_empty() {
        return Err(PortalError::validation("password is required"));
    }
    Ok(value)
}
