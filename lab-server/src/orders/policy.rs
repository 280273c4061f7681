//! Order Access Policy
//!
//! Decides which role may perform which operation. Orthogonal to
//! ownership: a disallowed role is rejected even on its own order, and an
//! allowed role touching a foreign order is stopped by the repository's
//! owner scoping, not here.

use shared::UserRole;

use crate::utils::AppError;

/// The operations the policy gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Create,
    Read,
    Update,
    Delete,
    Advance,
    AddService,
    AddComment,
    Stats,
}

/// Check the caller's role string against the policy table.
///
/// A role string that does not parse is its own failure (role not found),
/// distinct from a recognized role that lacks the permission. Both are 403.
pub fn authorize(role: &str, action: OrderAction) -> Result<UserRole, AppError> {
    let role: UserRole = role
        .parse()
        .map_err(|_| AppError::forbidden("user role not found"))?;

    if allows(role, action) {
        Ok(role)
    } else {
        Err(AppError::forbidden(
            "only authorized staff can perform this operation",
        ))
    }
}

fn allows(role: UserRole, action: OrderAction) -> bool {
    match action {
        // Reads are open to any authenticated role
        OrderAction::Read | OrderAction::Stats => true,
        // Mutations are staff-only
        OrderAction::Create
        | OrderAction::Update
        | OrderAction::Delete
        | OrderAction::Advance
        | OrderAction::AddService
        | OrderAction::AddComment => matches!(
            role,
            UserRole::Attendant | UserRole::LabAdmin | UserRole::SuperAdmin
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUTATIONS: [OrderAction; 6] = [
        OrderAction::Create,
        OrderAction::Update,
        OrderAction::Delete,
        OrderAction::Advance,
        OrderAction::AddService,
        OrderAction::AddComment,
    ];

    #[test]
    fn staff_roles_may_mutate() {
        for role in ["ATTENDANT", "LAB_ADMIN", "SUPER_ADMIN"] {
            for action in MUTATIONS {
                assert!(authorize(role, action).is_ok(), "{role} {action:?}");
            }
        }
    }

    #[test]
    fn customer_is_read_only() {
        assert!(authorize("CUSTOMER", OrderAction::Read).is_ok());
        assert!(authorize("CUSTOMER", OrderAction::Stats).is_ok());
        for action in MUTATIONS {
            assert!(matches!(
                authorize("CUSTOMER", action),
                Err(AppError::Forbidden(_))
            ));
        }
    }

    #[test]
    fn unknown_role_is_forbidden_even_for_reads() {
        let err = authorize("INTERN", OrderAction::Read).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg.contains("not found")));
        assert!(authorize("", OrderAction::Create).is_err());
    }
}
