use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::query::Pagination;
use surgical_academy_data::models::{User, UserRole};

/// Self-registration form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub specialization: Option<String>,
    pub institution: Option<String>,
}

/// Public view of a freshly registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreatedUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub specialization: Option<String>,
    pub institution: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for CreatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            specialization: user.specialization.clone(),
            institution: user.institution.clone(),
            created_at: user.created_at,
        }
    }
}

/// Signup response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SignupResult {
    pub message: String,
    pub user: CreatedUser,
}

/// A page of accounts for administrators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UserList {
    pub users: Vec<User>,
    pub pagination: Pagination,
}
