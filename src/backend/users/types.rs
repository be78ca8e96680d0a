use serde::{Deserialize, Serialize};

use crate::backend::auth::users::{UserProfile, UserSummary};

/// `PATCH /user/me`. Absent fields stay as they are; blank optional fields
/// are cleared.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub job_title: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UpdateAvatarRequest {
    /// Data URI or remote URL, uploaded through the media host
    pub avatar: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize, Debug)]
pub struct ProfileResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserProfile,
}

#[derive(Serialize, Debug)]
pub struct UserListResponse {
    pub status: &'static str,
    pub results: usize,
    pub users: Vec<UserSummary>,
}
