use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// Platform role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Student,
    Teacher,
    Admin,
}

impl UserRole {
    /// Stored label
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::Teacher => "TEACHER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STUDENT" => Ok(UserRole::Student),
            "TEACHER" => Ok(UserRole::Teacher),
            "ADMIN" => Ok(UserRole::Admin),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

impl ToSql for UserRole {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for UserRole {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Storage model for a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    pub id: String,
    pub email: String,
    /// Argon2 PHC string; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub full_name: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub specialization: Option<String>,
    pub institution: Option<String>,
    pub bio: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub specialization: Option<String>,
    pub institution: Option<String>,
    pub bio: Option<String>,
}

/// Author fields embedded in course, article and FHIR listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthorSummary {
    pub id: String,
    pub name: Option<String>,
    pub full_name: String,
    pub specialization: Option<String>,
}

/// Per-user counters shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserStats {
    pub enrollments: u64,
    pub courses_authored: u64,
    pub articles_authored: u64,
}
