use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row};

use super::errors::RepositoryError;
use crate::database::DatabasePool;
use crate::models::Category;

/// Repository trait for categories
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    /// All categories ordered by name
    async fn list(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Category by primary key
    async fn find_by_id(&self, id: String) -> Result<Option<Category>, RepositoryError>;
}

/// SQLite-backed category repository
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: DatabasePool,
}

impl CategoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

const CATEGORY_SELECT: &str =
    "SELECT id, name, slug, description, color, icon, created_at FROM categories";

fn map_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        color: row.get(4)?,
        icon: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn list_categories(conn: &Connection) -> Result<Vec<Category>, RepositoryError> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY name", CATEGORY_SELECT))?;
    let categories = stmt
        .query_map([], map_category_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        self.pool.run(|conn| list_categories(conn)).await
    }

    async fn find_by_id(&self, id: String) -> Result<Option<Category>, RepositoryError> {
        self.pool
            .run(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("{} WHERE id = ?1", CATEGORY_SELECT),
                        [&id],
                        map_category_row,
                    )
                    .optional()?)
            })
            .await
    }
}
