use database::services::auth::Identity;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignUpResponse {
    pub id: Uuid,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LoginParams {
    /// Local path to continue to after signing in
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub redirect_to: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ConfirmParams {
    pub token_hash: String,
    #[serde(rename = "type")]
    pub otp_type: String,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

impl From<Identity> for UserResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.user_id,
            email: identity.email,
            display_name: identity.display_name,
            role: identity.role.as_str().to_string(),
        }
    }
}
