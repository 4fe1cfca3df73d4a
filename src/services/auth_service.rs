use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit,
    config::AppConfig,
    dto::{
        auth::{Claims, LoginRequest, LoginResponse, LoginUser},
        clientes::CreateClienteRequest,
    },
    enums::Role,
    error::{AppError, AppResult},
    models::Cliente,
    repositories::{cliente_repo, empleado_repo},
    response::{ApiResponse, Meta},
    services::cliente_service,
    state::AppState,
};

/// Checked when a username is unknown so every failed login costs one argon2 run.
/// Parameters match `Argon2::default()`.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

/// A stored hash that cannot be parsed counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        tracing::warn!("stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

pub fn issue_token(
    config: &AppConfig,
    id: Uuid,
    username: &str,
    role: Role,
) -> AppResult<(String, i64)> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(config.jwt_expiration_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: id.to_string(),
        username: username.to_string(),
        role,
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok((token, config.jwt_expiration_hours * 3600))
}

fn credentials(payload: LoginRequest) -> AppResult<(String, String)> {
    let LoginRequest { username, password } = payload;
    match (
        username.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
        password.filter(|p| !p.is_empty()),
    ) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(AppError::BadRequest(
            "username and password are required".into(),
        )),
    }
}

pub async fn register_cliente(
    state: &AppState,
    payload: CreateClienteRequest,
) -> AppResult<ApiResponse<Cliente>> {
    let cliente = cliente_service::insert_cliente(state, None, payload).await?;
    Ok(ApiResponse::success(
        "Client registered",
        cliente,
        Some(Meta::empty()),
    ))
}

pub async fn login_cliente(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (username, password) = credentials(payload)?;
    let cliente = cliente_repo::find_by_username(&state.orm, &username).await?;
    let stored_hash = cliente
        .as_ref()
        .map_or(DUMMY_HASH, |c| c.password_hash.as_str());
    let password_ok = verify_password(&password, stored_hash);

    let cliente = match cliente {
        Some(c) if password_ok => c,
        _ => {
            tracing::info!(username = %username, "client login rejected");
            return Err(AppError::invalid_credentials());
        }
    };

    let (token, expires_in) = issue_token(&state.config, cliente.id, &cliente.username, cliente.rol)?;

    audit::record(
        &state.pool,
        None,
        "cliente_login",
        "clientes",
        serde_json::json!({ "cliente_id": cliente.id }),
    )
    .await;

    let resp = LoginResponse {
        token,
        token_type: "Bearer".into(),
        expires_in,
        user: LoginUser {
            id: cliente.id,
            nombre: cliente.nombre,
            username: cliente.username,
            rol: cliente.rol,
        },
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn login_empleado(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (username, password) = credentials(payload)?;
    let empleado = empleado_repo::find_by_username(&state.orm, &username).await?;
    let stored_hash = empleado
        .as_ref()
        .map_or(DUMMY_HASH, |e| e.password_hash.as_str());
    let password_ok = verify_password(&password, stored_hash);

    let empleado = match empleado {
        Some(e) if e.activo && password_ok => e,
        _ => {
            tracing::info!(username = %username, "employee login rejected");
            return Err(AppError::invalid_credentials());
        }
    };

    let (token, expires_in) =
        issue_token(&state.config, empleado.id, &empleado.username, empleado.rol)?;

    audit::record(
        &state.pool,
        None,
        "empleado_login",
        "empleados",
        serde_json::json!({ "empleado_id": empleado.id }),
    )
    .await;

    let resp = LoginResponse {
        token,
        token_type: "Bearer".into(),
        expires_in,
        user: LoginUser {
            id: empleado.id,
            nombre: empleado.nombre,
            username: empleado.username,
            rol: empleado.rol,
        },
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::decode_token;

    fn config() -> AppConfig {
        AppConfig {
            database_url: "postgres://unused".into(),
            database_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "test-secret".into(),
            jwt_expiration_hours: 2,
        }
    }

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("x").unwrap();
        let second = hash_password("x").unwrap();
        assert_ne!(first, "x");
        assert_ne!(first, second);
        assert!(verify_password("x", &first));
        assert!(!verify_password("y", &first));
        assert!(!verify_password("x", "not-a-phc-string"));
    }

    #[test]
    fn dummy_hash_parses_and_never_matches() {
        let parsed = PasswordHash::new(DUMMY_HASH).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(!verify_password("", DUMMY_HASH));
        assert!(!verify_password("admin123", DUMMY_HASH));
    }

    #[test]
    fn issued_tokens_carry_identity() {
        let id = Uuid::new_v4();
        let (token, expires_in) = issue_token(&config(), id, "ana1", Role::Cliente).unwrap();
        assert_eq!(expires_in, 7200);

        let claims = decode_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.username, "ana1");
        assert_eq!(claims.role, Role::Cliente);
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn missing_credentials_are_a_bad_request() {
        let err = credentials(LoginRequest {
            username: Some("ana1".into()),
            password: None,
        })
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
