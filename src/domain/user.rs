use serde::{Deserialize, Serialize};

use super::company::{Company, MinPicture};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseUser {
    pub id: i64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub name_first: String,
    #[serde(default)]
    pub name_last: String,
    pub email: String,
    #[serde(default)]
    pub account_status: String,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerRole {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerProfile {
    pub id: i64,
    #[serde(default)]
    pub created_at: i64,
    pub user_id: i64,
    #[serde(default)]
    pub accepted_terms_and_conditions: bool,
    #[serde(default)]
    pub profile_summary: String,
    #[serde(default)]
    pub profile_picture: Option<MinPicture>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub role: Option<EmployerRole>,
}

/// Full principal record as the user API group returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub base: BaseUser,
    #[serde(default)]
    pub employer_profile: Option<EmployerProfile>,
}
