use uuid::Uuid;
use crate::types::{UserRole, Permission};
use crate::errors::ServiceError;

/// Represents the authentication context for the current request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The ID of the authenticated user
    pub user_id: Uuid,

    /// The role of the authenticated user
    pub role: UserRole,
}

impl AuthContext {
    /// Create a new authentication context
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Check if user has a specific permission
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }

    /// Authorize a specific permission, returning an error if not allowed
    pub fn authorize(&self, permission: Permission) -> Result<(), ServiceError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "User does not have permission: {}",
                permission.as_str()
            )))
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// For operations restricted to the resource owner
    pub fn authorize_self_or_admin(&self, resource_owner_id: &Uuid) -> Result<(), ServiceError> {
        if &self.user_id == resource_owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(
                "You do not have permission to access this resource".to_string()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_and_admin_pass_ownership_check() {
        let owner = Uuid::new_v4();
        let staff = AuthContext::new(owner, UserRole::Staff);
        assert!(staff.authorize_self_or_admin(&owner).is_ok());

        let admin = AuthContext::new(Uuid::new_v4(), UserRole::Admin);
        assert!(admin.authorize_self_or_admin(&owner).is_ok());
    }

    #[test]
    fn test_stranger_fails_ownership_check() {
        let manager = AuthContext::new(Uuid::new_v4(), UserRole::Manager);
        let result = manager.authorize_self_or_admin(&Uuid::new_v4());
        assert!(matches!(result, Err(ServiceError::PermissionDenied(_))));
    }

    #[test]
    fn test_authorize_reports_missing_permission() {
        let staff = AuthContext::new(Uuid::new_v4(), UserRole::Staff);
        assert!(staff.authorize(Permission::ViewReports).is_ok());
        match staff.authorize(Permission::ViewAllPrograms) {
            Err(ServiceError::PermissionDenied(msg)) => assert!(msg.contains("view_all_programs")),
            other => panic!("expected permission denied, got {:?}", other),
        }
    }
}
