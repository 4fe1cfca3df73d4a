use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, enums::Role, error::AppError, state::AppState};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

pub fn ensure_any_role(user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if !allowed.contains(&user.role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_staff(user: &AuthUser) -> Result<(), AppError> {
    ensure_any_role(user, Role::STAFF)
}

pub fn ensure_management(user: &AuthUser) -> Result<(), AppError> {
    ensure_any_role(user, Role::MANAGEMENT)
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_any_role(user, &[Role::Admin])
}

/// Staff, or the actor of the given role acting on its own record.
pub fn ensure_staff_or_self(user: &AuthUser, self_role: Role, id: Uuid) -> Result<(), AppError> {
    if user.is_staff() || (user.role == self_role && user.user_id == id) {
        return Ok(());
    }
    Err(AppError::Forbidden)
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;
    Ok(decoded.claims)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        let claims = decode_token(token, &state.config.jwt_secret)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

        Ok(AuthUser {
            user_id,
            username: claims.username,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            username: "tester".into(),
            role,
        }
    }

    #[test]
    fn role_allow_lists() {
        assert!(ensure_staff(&user(Role::Empleado)).is_ok());
        assert!(matches!(
            ensure_staff(&user(Role::Cliente)),
            Err(AppError::Forbidden)
        ));
        assert!(ensure_management(&user(Role::Gerente)).is_ok());
        assert!(ensure_management(&user(Role::Empleado)).is_err());
        assert!(ensure_admin(&user(Role::Admin)).is_ok());
        assert!(ensure_admin(&user(Role::Gerente)).is_err());
    }

    #[test]
    fn clients_may_only_touch_themselves() {
        let me = user(Role::Cliente);
        assert!(ensure_staff_or_self(&me, Role::Cliente, me.user_id).is_ok());
        assert!(ensure_staff_or_self(&me, Role::Cliente, Uuid::new_v4()).is_err());
        // An employee id that happens to match is not a client record.
        let emp = user(Role::Empleado);
        assert!(ensure_staff_or_self(&emp, Role::Cliente, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn garbage_tokens_are_unauthorized() {
        let err = decode_token("not.a.jwt", "secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
