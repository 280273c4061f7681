//! Authentication Handlers
//!
//! Registration, login, and current-user lookup.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use shared::client::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use shared::{ApiResponse, UserRole};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::UserCreate;
use crate::db::repository::UserRepository;
use crate::utils::validation::MIN_PASSWORD_LEN;
use crate::utils::AppError;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Register a new user account
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::validation("a valid email is required"));
    }
    if req.name.trim().is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must have at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let repo = UserRepository::new(state.db.clone());

    if repo.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::validation("email already registered"));
    }

    let user = repo
        .create(UserCreate {
            email: req.email,
            password: req.password,
            name: req.name,
            role: req.role.unwrap_or(UserRole::Attendant),
        })
        .await?;

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(user.id_string(), &user.name, user.role.as_str())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user.id_string(), email = %user.email, "User registered");

    let response = AuthResponse {
        token,
        user: user.to_user_info(),
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(response))))
}

/// Login handler
///
/// Authenticates credentials and returns a JWT token. The error message is
/// the same for an unknown email and a wrong password.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.find_by_email(&req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::InvalidCredentials);
            }

            if !u.is_active {
                return Err(AppError::forbidden("account has been disabled"));
            }

            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::InvalidCredentials);
        }
    };

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(user.id_string(), &user.name, user.role.as_str())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = %user.id_string(),
        role = %user.role,
        "User logged in successfully"
    );

    let response = AuthResponse {
        token,
        user: user.to_user_info(),
    };
    Ok(Json(ApiResponse::ok(response)))
}

/// Get current user info
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<UserInfo>>, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let record = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(ApiResponse::ok(record.to_user_info())))
}
