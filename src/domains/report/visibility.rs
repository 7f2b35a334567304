use crate::auth::AuthContext;
use crate::domains::permission::Permission;
use crate::domains::program::{Program, ProgramScope};
use crate::errors::ServiceResult;
use uuid::Uuid;

/// Decide which programs the caller may see before anything is fetched
pub fn resolve_scope(auth: &AuthContext, program_id: Option<Uuid>) -> ServiceResult<ProgramScope> {
    auth.authorize(Permission::ViewReports)?;

    Ok(match program_id {
        Some(id) => ProgramScope::Single(id),
        None if auth.has_permission(Permission::ViewAllPrograms) => ProgramScope::All,
        None => ProgramScope::ConductedBy(auth.user_id),
    })
}

/// A single requested program is only visible to admins and the user conducting it
pub fn ensure_program_access(auth: &AuthContext, program: &Program) -> ServiceResult<()> {
    auth.authorize_self_or_admin(&program.conducted_by)
}
