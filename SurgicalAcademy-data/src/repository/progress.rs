use async_trait::async_trait;
use rusqlite::params;

use super::errors::RepositoryError;
use crate::database::DatabasePool;
use crate::models::{ProgressCourse, ProgressSummary};

/// Repository trait for learner progress
#[async_trait]
pub trait ProgressRepositoryTrait: Send + Sync {
    /// A user's most recently accessed courses
    async fn recent_for_user(&self, user_id: String, limit: u64) -> Result<Vec<ProgressSummary>, RepositoryError>;
}

/// SQLite-backed progress repository
#[derive(Debug, Clone)]
pub struct ProgressRepository {
    pool: DatabasePool,
}

impl ProgressRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressRepositoryTrait for ProgressRepository {
    async fn recent_for_user(&self, user_id: String, limit: u64) -> Result<Vec<ProgressSummary>, RepositoryError> {
        self.pool
            .run(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT c.id, c.title, c.slug, c.cover_image, c.difficulty,
                        p.completed_lessons, p.total_lessons, p.progress_percentage, p.last_accessed_at
                     FROM progress p
                     JOIN courses c ON c.id = p.course_id
                     WHERE p.user_id = ?1
                     ORDER BY p.last_accessed_at DESC
                     LIMIT ?2",
                )?;

                let progress = stmt
                    .query_map(params![user_id, limit], |row| {
                        Ok(ProgressSummary {
                            course: ProgressCourse {
                                id: row.get(0)?,
                                title: row.get(1)?,
                                slug: row.get(2)?,
                                cover_image: row.get(3)?,
                                difficulty: row.get(4)?,
                            },
                            completed_lessons: row.get(5)?,
                            total_lessons: row.get(6)?,
                            progress_percentage: row.get(7)?,
                            last_accessed_at: row.get(8)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(progress)
            })
            .await
    }
}
