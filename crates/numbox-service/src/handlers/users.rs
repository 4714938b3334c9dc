//! User account handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use numbox_core::{format_usd, User};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// User response.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: String,
    /// Email address.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Avatar URL.
    pub profile_image_url: Option<String>,
    /// Credit balance in cents.
    pub balance_cents: i64,
    /// Balance formatted as dollars.
    pub balance_formatted: String,
    /// When the record was created (ISO 8601).
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_image_url: user.profile_image_url.clone(),
            balance_cents: user.balance_cents,
            balance_formatted: format_usd(user.balance_cents),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Get the calling user, creating the record on first contact.
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = match state.store.get_user(&auth.user_id)? {
        Some(user) => user,
        None => {
            let user = User::new(auth.user_id);
            state.store.put_user(&user)?;
            tracing::info!(user_id = %auth.user_id, "Created user on first contact");
            user
        }
    };

    Ok(Json(UserResponse::from(&user)))
}
