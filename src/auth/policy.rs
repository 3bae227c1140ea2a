//!
//! # Authorization Policy
//!
//! Task mutation and deletion are allowed to the owner and to any role in
//! the admin override set. The policy is a pair of plain functions over an
//! explicit permitted-role slice; route handlers call it after the 404
//! existence check, so a missing task reports as 404 before any 403.

use crate::auth::extractors::AuthenticatedUser;
use crate::models::{Role, Task};

/// Roles that may act on any task regardless of ownership.
const ADMIN_OVERRIDE: &[Role] = &[Role::Admin];

/// Declarative role-set membership check.
pub fn permits(role: Role, allowed: &[Role]) -> bool {
    allowed.contains(&role)
}

/// True iff the requester owns the task or holds an override role.
pub fn can_act_on_task(task: &Task, requester: &AuthenticatedUser) -> bool {
    task.user_id == requester.id || permits(requester.role, ADMIN_OVERRIDE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTask, Task};
    use uuid::Uuid;

    fn task_owned_by(owner: Uuid) -> Task {
        Task::new(NewTask {
            user_id: owner,
            title: "t".to_string(),
            description: "d".to_string(),
        })
    }

    #[test]
    fn test_owner_may_act() {
        let owner = Uuid::new_v4();
        let task = task_owned_by(owner);
        let requester = AuthenticatedUser {
            id: owner,
            role: Role::User,
        };
        assert!(can_act_on_task(&task, &requester));
    }

    #[test]
    fn test_stranger_may_not_act() {
        let task = task_owned_by(Uuid::new_v4());
        let requester = AuthenticatedUser {
            id: Uuid::new_v4(),
            role: Role::User,
        };
        assert!(!can_act_on_task(&task, &requester));
    }

    #[test]
    fn test_admin_overrides_ownership() {
        let task = task_owned_by(Uuid::new_v4());
        let requester = AuthenticatedUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(can_act_on_task(&task, &requester));
    }

    #[test]
    fn test_permits_is_exact_membership() {
        assert!(permits(Role::Admin, &[Role::Admin]));
        assert!(!permits(Role::User, &[Role::Admin]));
        assert!(permits(Role::User, &[Role::User, Role::Admin]));
        assert!(!permits(Role::User, &[]));
    }
}
