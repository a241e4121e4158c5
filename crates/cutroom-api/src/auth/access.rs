//! Object-level authorization checks.
//!
//! Checks are an explicit ordered list of predicate functions over
//! `(identity, resource)`, evaluated short-circuit: the first denying
//! predicate wins. List-style reads do not go through here at all; they
//! are pre-filtered by owner id in SQL so other members' resources never
//! surface.

use crate::auth::models::AuthedMember;
use cutroom_core::models::Project;
use cutroom_core::AppError;

/// One object-level authorization predicate.
pub type AccessCheck<R> = fn(&AuthedMember, &R) -> bool;

/// Evaluate an ordered list of checks, short-circuiting on the first deny.
pub fn authorize<R>(
    checks: &[AccessCheck<R>],
    member: &AuthedMember,
    resource: &R,
) -> Result<(), AppError> {
    for check in checks {
        if !check(member, resource) {
            return Err(AppError::Forbidden("not permitted".to_string()));
        }
    }
    Ok(())
}

fn project_owner(member: &AuthedMember, project: &Project) -> bool {
    project.owner_id == member.id
}

/// Checks applied to every project-bound operation.
pub const PROJECT_CHECKS: &[AccessCheck<Project>] = &[project_owner];

/// Gate access to a project. A denial is reported as "not found" so a
/// wrong owner cannot distinguish someone else's project from a
/// nonexistent one.
pub fn require_project_access(member: &AuthedMember, project: &Project) -> Result<(), AppError> {
    authorize(PROJECT_CHECKS, member, project)
        .map_err(|_| AppError::NotFound(format!("Project not found: {}", project.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn member(id: i64) -> AuthedMember {
        AuthedMember {
            id,
            email: format!("m{}@example.com", id),
            name: "Member".to_string(),
        }
    }

    fn project(id: i64, owner_id: i64) -> Project {
        let now = Utc::now();
        Project {
            id,
            owner_id,
            title: "Cut".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_is_allowed() {
        assert!(require_project_access(&member(1), &project(10, 1)).is_ok());
    }

    #[test]
    fn test_non_owner_is_reported_as_not_found() {
        let result = require_project_access(&member(2), &project(10, 1));
        match result {
            Err(AppError::NotFound(msg)) => assert!(msg.contains("10")),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_authorize_short_circuits_on_first_deny() {
        fn deny(_: &AuthedMember, _: &Project) -> bool {
            false
        }
        fn allow(_: &AuthedMember, _: &Project) -> bool {
            true
        }

        let checks: &[AccessCheck<Project>] = &[deny, allow];
        assert!(authorize(checks, &member(1), &project(10, 1)).is_err());

        let checks: &[AccessCheck<Project>] = &[allow, allow];
        assert!(authorize(checks, &member(1), &project(10, 1)).is_ok());
    }
}
