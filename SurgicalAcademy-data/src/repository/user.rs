use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::errors::{map_unique_violation, RepositoryError};
use crate::database::DatabasePool;
use crate::models::{NewUser, PageRequest, User, UserStats};

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Insert a user; a taken email yields [`RepositoryError::Conflict`]
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Look up a user by (normalized) email
    async fn find_by_email(&self, email: String) -> Result<Option<User>, RepositoryError>;

    /// Look up a user by id
    async fn find_by_id(&self, id: String) -> Result<Option<User>, RepositoryError>;

    /// Stamp `last_login_at` with the current time
    async fn record_login(&self, id: String) -> Result<(), RepositoryError>;

    /// Users ordered newest first, plus the total count
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), RepositoryError>;

    /// Dashboard counters for a user
    async fn stats(&self, id: String) -> Result<UserStats, RepositoryError>;
}

/// SQLite-backed user repository
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: DatabasePool,
}

impl UserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

const USER_SELECT: &str = "SELECT id, email, password_hash, full_name, name, role, specialization,
        institution, bio, last_login_at, created_at, updated_at
    FROM users";

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        full_name: row.get(3)?,
        name: row.get(4)?,
        role: row.get(5)?,
        specialization: row.get(6)?,
        institution: row.get(7)?,
        bio: row.get(8)?,
        last_login_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn find_one(conn: &Connection, column: &str, value: &str) -> Result<Option<User>, RepositoryError> {
    let sql = format!("{} WHERE {} = ?1", USER_SELECT, column);
    Ok(conn.query_row(&sql, [value], map_user_row).optional()?)
}

pub(crate) fn insert_user(conn: &Connection, id: &str, user: &NewUser) -> Result<(), RepositoryError> {
    let now = Utc::now();

    conn.execute(
        "INSERT INTO users (id, email, password_hash, full_name, name, role, specialization,
            institution, bio, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        params![
            id,
            user.email,
            user.password_hash,
            user.full_name,
            user.name,
            user.role,
            user.specialization,
            user.institution,
            user.bio,
            now,
        ],
    )
    .map_err(|e| map_unique_violation(e, "User with this email"))?;

    Ok(())
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.pool
            .run(move |conn| {
                let id = Uuid::new_v4().to_string();
                insert_user(conn, &id, &user)?;
                debug!("Created user {} with role {}", id, user.role);

                find_one(conn, "id", &id)?
                    .ok_or_else(|| RepositoryError::NotFound(format!("user {}", id)))
            })
            .await
    }

    async fn find_by_email(&self, email: String) -> Result<Option<User>, RepositoryError> {
        self.pool.run(move |conn| find_one(conn, "email", &email)).await
    }

    async fn find_by_id(&self, id: String) -> Result<Option<User>, RepositoryError> {
        self.pool.run(move |conn| find_one(conn, "id", &id)).await
    }

    async fn record_login(&self, id: String) -> Result<(), RepositoryError> {
        self.pool
            .run(move |conn| {
                let updated = conn.execute(
                    "UPDATE users SET last_login_at = ?1 WHERE id = ?2",
                    params![Utc::now(), id],
                )?;

                if updated == 0 {
                    return Err(RepositoryError::NotFound(format!("user {}", id)));
                }
                Ok(())
            })
            .await
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), RepositoryError> {
        self.pool
            .run(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "{} ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
                    USER_SELECT
                ))?;
                let users = stmt
                    .query_map(params![page.limit, page.offset], map_user_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                let total: u64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
                Ok((users, total))
            })
            .await
    }

    async fn stats(&self, id: String) -> Result<UserStats, RepositoryError> {
        self.pool
            .run(move |conn| {
                Ok(conn.query_row(
                    "SELECT
                        (SELECT COUNT(*) FROM enrollments WHERE user_id = ?1),
                        (SELECT COUNT(*) FROM courses WHERE author_id = ?1),
                        (SELECT COUNT(*) FROM articles WHERE author_id = ?1)",
                    [&id],
                    |row| {
                        Ok(UserStats {
                            enrollments: row.get(0)?,
                            courses_authored: row.get(1)?,
                            articles_authored: row.get(2)?,
                        })
                    },
                )?)
            })
            .await
    }
}
