// Repository module structure
pub mod errors;
pub mod predicate;

mod article;
mod category;
mod course;
mod fhir;
mod progress;
mod user;

use std::collections::HashMap;

use rusqlite::{params_from_iter, Connection, Row};

use crate::models::{AuthorSummary, CategorySummary, Tag};

// Re-export commonly used types
pub use article::{ArticleRepository, ArticleRepositoryTrait};
pub use category::{CategoryRepository, CategoryRepositoryTrait};
pub use course::{CourseRepository, CourseRepositoryTrait};
pub use errors::RepositoryError;
pub use fhir::{FhirRepository, FhirRepositoryTrait};
pub use predicate::Predicate;
pub use progress::{ProgressRepository, ProgressRepositoryTrait};
pub use user::{UserRepository, UserRepositoryTrait};

pub(crate) use course::{insert_course, slug_exists as course_slug_exists};
pub(crate) use fhir::insert_resource;
pub(crate) use user::insert_user;

/// Author columns `id, name, full_name, specialization` starting at `start`
pub(crate) fn author_at(row: &Row<'_>, start: usize) -> rusqlite::Result<AuthorSummary> {
    Ok(AuthorSummary {
        id: row.get(start)?,
        name: row.get(start + 1)?,
        full_name: row.get(start + 2)?,
        specialization: row.get(start + 3)?,
    })
}

/// Category columns `name, slug, color, icon` starting at `start`
pub(crate) fn category_at(row: &Row<'_>, start: usize) -> rusqlite::Result<CategorySummary> {
    Ok(CategorySummary {
        name: row.get(start)?,
        slug: row.get(start + 1)?,
        color: row.get(start + 2)?,
        icon: row.get(start + 3)?,
    })
}

/// Join table linking tags to their owner
#[derive(Debug, Clone, Copy)]
pub(crate) enum TagLink {
    Course,
    Article,
}

impl TagLink {
    fn table_and_column(self) -> (&'static str, &'static str) {
        match self {
            TagLink::Course => ("course_tags", "course_id"),
            TagLink::Article => ("article_tags", "article_id"),
        }
    }
}

/// Tags for each owner id, ordered by tag name
pub(crate) fn load_tags(
    conn: &Connection,
    link: TagLink,
    owner_ids: &[String],
) -> Result<HashMap<String, Vec<Tag>>, RepositoryError> {
    let mut tags: HashMap<String, Vec<Tag>> = HashMap::new();
    if owner_ids.is_empty() {
        return Ok(tags);
    }

    let (table, column) = link.table_and_column();
    let placeholders = vec!["?"; owner_ids.len()].join(", ");
    let sql = format!(
        "SELECT l.{column}, t.id, t.name, t.slug, t.color
         FROM {table} l
         JOIN tags t ON t.id = l.tag_id
         WHERE l.{column} IN ({placeholders})
         ORDER BY t.name",
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(owner_ids.iter()), |row| {
        Ok((
            row.get::<_, String>(0)?,
            Tag {
                id: row.get(1)?,
                name: row.get(2)?,
                slug: row.get(3)?,
                color: row.get(4)?,
            },
        ))
    })?;

    for row in rows {
        let (owner, tag) = row?;
        tags.entry(owner).or_default().push(tag);
    }

    Ok(tags)
}
