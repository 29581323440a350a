pub mod role;

pub use role::{validate_role_label, MAX_ROLE_LABEL_LEN};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    RoleEmpty,
    RoleTooLong,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoleEmpty => write!(f, "Role cannot be empty"),
            Self::RoleTooLong => write!(
                f,
                "Role is too long (max {MAX_ROLE_LABEL_LEN} characters)"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
