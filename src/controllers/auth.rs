use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::middleware::{AuthUser, Claims};
use crate::models::User;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_current_user).put(update_current_user))
}

fn issue_token(user: &User, jwt: &JwtConfig) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        exp: (Utc::now() + Duration::hours(jwt.expires_in_hours)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))
}

/* ---------- register / login ---------- */

#[derive(Debug, Deserialize, Validate)]
struct RegisterRequest {
    #[validate(email)]
    email: String,
    #[validate(length(min = 8))]
    password: String,
    #[validate(length(min = 1))]
    full_name: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

// POST /api/auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let password_hash =
        bcrypt::hash(&req.password, bcrypt::DEFAULT_COST).map_err(|e| ApiError::Internal(e.into()))?;

    let now = Utc::now().naive_utc();
    let user = User {
        id: Uuid::new_v4(),
        email: req.email,
        password_hash,
        full_name: req.full_name,
        phone: req.phone,
        city: req.city,
        avatar_url: req.avatar_url,
        role: "user".to_string(),
        favorite_categories: vec![],
        favorite_events: vec![],
        created_at: now,
        updated_at: now,
    };

    // Unique-email constraint surfaces here as EmailTaken.
    state.users.insert(user.clone()).await?;

    let token = issue_token(&user, &state.config.jwt)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "token": token,
            "user": user.profile_json(),
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let ok = bcrypt::verify(&req.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.into()))?;
    if !ok {
        return Err(ApiError::Unauthorized);
    }

    let token = issue_token(&user, &state.config.jwt)?;
    Ok(Json(json!({
        "success": true,
        "token": token,
        "user": user.profile_json(),
    })))
}

/* ---------- profile ---------- */

// GET /api/auth/me
async fn get_current_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .get(auth.id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user.profile_json()))
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    full_name: Option<String>,
    phone: Option<String>,
    city: Option<String>,
    avatar_url: Option<String>,
    favorite_categories: Option<Vec<String>>,
    favorite_events: Option<Vec<String>>,
}

// PUT /api/auth/me
async fn update_current_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut user = state
        .users
        .get(auth.id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if let Some(full_name) = req.full_name {
        user.full_name = full_name;
    }
    if let Some(phone) = req.phone {
        user.phone = Some(phone);
    }
    if let Some(city) = req.city {
        user.city = Some(city);
    }
    if let Some(avatar_url) = req.avatar_url {
        user.avatar_url = Some(avatar_url);
    }
    if let Some(favorite_categories) = req.favorite_categories {
        user.favorite_categories = favorite_categories;
    }
    if let Some(favorite_events) = req.favorite_events {
        user.favorite_events = favorite_events;
    }
    user.updated_at = Utc::now().naive_utc();

    if !state.users.update(&user).await? {
        return Err(ApiError::NotFound("user"));
    }

    Ok(Json(user.profile_json()))
}
