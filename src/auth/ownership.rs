//! Ownership/role authorization: allow iff the actor is an admin or owns the
//! resource. A denial is an explicit Forbidden, distinguishable from 404.

use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::models::Role;

pub fn authorize_owner(actor: &AuthUser, resource_owner: Uuid) -> Result<(), ApiError> {
    if actor.role == Role::Admin || actor.id == resource_owner {
        return Ok(());
    }
    Err(ApiError::forbidden(format!(
        "User {} is not authorized to modify this resource",
        actor.id
    )))
}

/// The owner column guard for conditional mutations: admins mutate
/// unconditionally, everyone else only rows they still own.
pub fn owner_guard(actor: &AuthUser) -> Option<Uuid> {
    if actor.role == Role::Admin {
        None
    } else {
        Some(actor.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            name: "test".to_string(),
            email: "test@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn owner_is_allowed() {
        let user = actor(Role::Publisher);
        assert!(authorize_owner(&user, user.id).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let user = actor(Role::Publisher);
        let err = authorize_owner(&user, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn admin_overrides_ownership() {
        let admin = actor(Role::Admin);
        assert!(authorize_owner(&admin, Uuid::new_v4()).is_ok());
        assert_eq!(owner_guard(&admin), None);
    }

    #[test]
    fn non_admin_guard_is_own_id() {
        let user = actor(Role::User);
        assert_eq!(owner_guard(&user), Some(user.id));
    }
}
