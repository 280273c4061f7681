//! User roles
//!
//! The caller's authorization class. Which role may perform which order
//! operation is decided by the server's access policy, not here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Front-desk staff, may create and manage orders.
    Attendant,
    /// Lab administrator.
    LabAdmin,
    /// Super administrator.
    SuperAdmin,
    /// External customer, read-only access.
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Attendant => "ATTENDANT",
            UserRole::LabAdmin => "LAB_ADMIN",
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::Customer => "CUSTOMER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a role string from a token or request is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ATTENDANT" => Ok(UserRole::Attendant),
            "LAB_ADMIN" => Ok(UserRole::LabAdmin),
            "SUPER_ADMIN" => Ok(UserRole::SuperAdmin),
            "CUSTOMER" => Ok(UserRole::Customer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for role in [
            UserRole::Attendant,
            UserRole::LabAdmin,
            UserRole::SuperAdmin,
            UserRole::Customer,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn rejects_unknown_roles() {
        assert!("INTERN".parse::<UserRole>().is_err());
        assert!("attendant".parse::<UserRole>().is_err());
    }
}
