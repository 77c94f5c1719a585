use crate::auth::{AppError, Role, UserSession};
use crate::models::Client;

/// Role gate: the caller must meet or exceed `minimum`
pub fn authorize(session: &UserSession, minimum: Role) -> Result<(), AppError> {
    if session.role.satisfies(minimum) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Access denied. This area requires the {} role.",
            minimum
        )))
    }
}

/// Instructors and admins see every client; a student only the one linked to them
pub fn can_view_client(session: &UserSession, client: &Client) -> bool {
    session.role.satisfies(Role::Instructor) || client.is_linked_to(&session.identifier)
}

pub fn ensure_can_view_client(session: &UserSession, client: &Client) -> Result<(), AppError> {
    if can_view_client(session, client) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Access denied. You can only view your own training record.",
        ))
    }
}
