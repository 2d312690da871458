use serde::{Deserialize, Serialize};

use careers_auth::{AdminUserPatch, NewAdminUser, UserSummary};
use careers_jobs::Applicant;

// -------------------------
// Request DTOs
// -------------------------

/// Missing fields deserialize as blank and are rejected with 400 downstream.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAdminUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl From<CreateAdminUserRequest> for NewAdminUser {
    fn from(value: CreateAdminUserRequest) -> Self {
        NewAdminUser {
            email: value.email,
            password: value.password,
            name: value.name,
            role: value.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdminUserRequest {
    pub password: Option<String>,
    pub role: Option<String>,
}

impl From<UpdateAdminUserRequest> for AdminUserPatch {
    fn from(value: UpdateAdminUserRequest) -> Self {
        AdminUserPatch {
            password: value.password,
            role: value.role,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    #[serde(default)]
    pub include_hidden: bool,
}

/// `general=1` (or `true`) selects resume drops; otherwise `job_id` narrows
/// to one posting. Neither lists everything.
#[derive(Debug, Default, Deserialize)]
pub struct ApplicantsQuery {
    #[serde(alias = "jobId")]
    pub job_id: Option<String>,
    pub general: Option<String>,
}

impl ApplicantsQuery {
    pub fn wants_general(&self) -> bool {
        matches!(self.general.as_deref().map(str::trim), Some("1" | "true"))
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub expires_at: Option<i64>,
}

/// An application with the title of the posting it targets, if any.
#[derive(Debug, Serialize)]
pub struct ApplicantView {
    #[serde(flatten)]
    pub applicant: Applicant,
    pub job_title: Option<String>,
}
