use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};

/// Identity placed in request extensions by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<i64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(ErrorUnauthorized("Missing token"))),
        }
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Admin only"))
        }
    }

    /// Module gate for writes; Admin always passes.
    pub fn require_any(&self, roles: &[Role]) -> actix_web::Result<()> {
        if self.role == Role::Admin || roles.contains(&self.role) {
            Ok(())
        } else {
            tracing::info!(user = %self.username, role = ?self.role, "Forbidden by role gate");
            Err(actix_web::error::ErrorForbidden(format!(
                "Requires one of: Admin, {}",
                roles
                    .iter()
                    .map(|r| format!("{r:?}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 1,
            username: "u".into(),
            role,
            employee_id: None,
        }
    }

    #[test]
    fn admin_passes_every_gate() {
        assert!(user(Role::Admin).require_any(&[Role::Hr]).is_ok());
        assert!(user(Role::Admin).require_admin().is_ok());
    }

    #[test]
    fn other_roles_need_a_listed_role() {
        assert!(user(Role::Hr).require_any(&[Role::Hr]).is_ok());
        assert!(user(Role::Finance).require_any(&[Role::Hr]).is_err());
        assert!(user(Role::Viewer).require_any(&[Role::Sales, Role::Procurement]).is_err());
        assert!(user(Role::Hr).require_admin().is_err());
    }
}
