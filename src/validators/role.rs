use super::ValidationError;

pub const MAX_ROLE_LABEL_LEN: usize = 32;

/// Validates a member's free-text role label, e.g. "Lead developer".
pub fn validate_role_label(role: &str) -> Result<(), ValidationError> {
    let trimmed = role.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RoleEmpty);
    }

    if trimmed.chars().count() > MAX_ROLE_LABEL_LEN {
        return Err(ValidationError::RoleTooLong);
    }

    Ok(())
}
