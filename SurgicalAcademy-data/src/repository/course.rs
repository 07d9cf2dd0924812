use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::errors::{map_unique_violation, RepositoryError};
use super::predicate::Predicate;
use super::{author_at, category_at, load_tags, TagLink};
use crate::database::DatabasePool;
use crate::models::{CourseCounts, CourseDetail, CourseFilter, CourseSummary, Lesson, NewCourse, PageRequest};

/// Repository trait for courses
#[async_trait]
pub trait CourseRepositoryTrait: Send + Sync {
    /// Published courses matching `filter`, featured first then newest, plus the total match count
    async fn find(
        &self,
        filter: CourseFilter,
        page: PageRequest,
    ) -> Result<(Vec<CourseSummary>, u64), RepositoryError>;

    /// Up to `limit` published courses whose title or description contains `term`
    async fn search(&self, term: String, limit: u64) -> Result<Vec<CourseSummary>, RepositoryError>;

    /// Published course with lessons and tags
    async fn find_published_by_slug(&self, slug: String) -> Result<Option<CourseDetail>, RepositoryError>;

    /// Newest published courses
    async fn recent(&self, limit: u64) -> Result<Vec<CourseSummary>, RepositoryError>;

    /// Insert a course and return it with its joined fields
    async fn create(&self, course: NewCourse) -> Result<CourseSummary, RepositoryError>;
}

/// SQLite-backed course repository
#[derive(Debug, Clone)]
pub struct CourseRepository {
    pool: DatabasePool,
}

impl CourseRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepositoryTrait for CourseRepository {
    async fn find(
        &self,
        filter: CourseFilter,
        page: PageRequest,
    ) -> Result<(Vec<CourseSummary>, u64), RepositoryError> {
        self.pool
            .run(move |conn| {
                let predicate = listing_predicate(&filter);
                let courses = select_courses(conn, &predicate, LISTING_ORDER, page)?;
                let total = count_courses(conn, &predicate)?;
                debug!("Course listing matched {} rows, returning {}", total, courses.len());
                Ok((courses, total))
            })
            .await
    }

    async fn search(&self, term: String, limit: u64) -> Result<Vec<CourseSummary>, RepositoryError> {
        self.pool
            .run(move |conn| {
                let predicate = Predicate::new()
                    .is_set("c.published")
                    .contains_any(&["c.title", "c.description"], &term);
                select_courses(conn, &predicate, LISTING_ORDER, PageRequest { offset: 0, limit })
            })
            .await
    }

    async fn find_published_by_slug(&self, slug: String) -> Result<Option<CourseDetail>, RepositoryError> {
        self.pool
            .run(move |conn| {
                let predicate = Predicate::new().is_set("c.published").eq("c.slug", slug);
                let course = select_courses(conn, &predicate, LISTING_ORDER, PageRequest { offset: 0, limit: 1 })?
                    .into_iter()
                    .next();

                match course {
                    Some(course) => {
                        let lessons = lessons_for(conn, &course.id)?;
                        let tags = load_tags(conn, TagLink::Course, &[course.id.clone()])?
                            .remove(&course.id)
                            .unwrap_or_default();
                        Ok(Some(CourseDetail { course, lessons, tags }))
                    }
                    None => Ok(None),
                }
            })
            .await
    }

    async fn recent(&self, limit: u64) -> Result<Vec<CourseSummary>, RepositoryError> {
        self.pool
            .run(move |conn| {
                let predicate = Predicate::new().is_set("c.published");
                select_courses(conn, &predicate, "c.created_at DESC, c.rowid DESC", PageRequest { offset: 0, limit })
            })
            .await
    }

    async fn create(&self, course: NewCourse) -> Result<CourseSummary, RepositoryError> {
        self.pool
            .run(move |conn| {
                let id = Uuid::new_v4().to_string();
                insert_course(conn, &id, &course)?;

                let predicate = Predicate::new().eq("c.id", id.clone());
                select_courses(conn, &predicate, LISTING_ORDER, PageRequest { offset: 0, limit: 1 })?
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepositoryError::NotFound(format!("course {}", id)))
            })
            .await
    }
}

const LISTING_ORDER: &str = "c.featured DESC, c.created_at DESC, c.rowid DESC";

const COURSE_SELECT: &str = "SELECT c.id, c.title, c.slug, c.description, c.short_description, c.cover_image,
        c.difficulty, c.duration, c.prerequisites, c.learning_objectives, c.published, c.featured,
        c.created_at, c.updated_at,
        u.id, u.name, u.full_name, u.specialization,
        cat.name, cat.slug, cat.color, cat.icon,
        (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id),
        (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id)
    FROM courses c
    JOIN users u ON u.id = c.author_id
    JOIN categories cat ON cat.id = c.category_id";

fn listing_predicate(filter: &CourseFilter) -> Predicate {
    let predicate = Predicate::new()
        .is_set("c.published")
        .with(filter.category_slug.clone(), |p, slug| p.eq("cat.slug", slug))
        .with(filter.difficulty, |p, difficulty| {
            p.eq("c.difficulty", difficulty.as_str().to_string())
        })
        .with(filter.search.as_deref(), |p, term| {
            p.contains_any(&["c.title", "c.description"], term)
        });

    if filter.featured_only {
        predicate.is_set("c.featured")
    } else {
        predicate
    }
}

fn select_courses(
    conn: &Connection,
    predicate: &Predicate,
    order: &str,
    page: PageRequest,
) -> Result<Vec<CourseSummary>, RepositoryError> {
    let sql = format!(
        "{} {} ORDER BY {} LIMIT ? OFFSET ?",
        COURSE_SELECT,
        predicate.where_sql(),
        order
    );

    let mut stmt = conn.prepare(&sql)?;
    let courses = stmt
        .query_map(params_from_iter(predicate.params_with_page(page)), map_course_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(courses)
}

fn count_courses(conn: &Connection, predicate: &Predicate) -> Result<u64, RepositoryError> {
    let sql = format!(
        "SELECT COUNT(*) FROM courses c JOIN categories cat ON cat.id = c.category_id {}",
        predicate.where_sql()
    );

    Ok(conn.query_row(&sql, params_from_iter(predicate.params()), |row| row.get(0))?)
}

fn map_course_row(row: &Row<'_>) -> rusqlite::Result<CourseSummary> {
    let objectives: String = row.get(9)?;
    let learning_objectives = serde_json::from_str(&objectives)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;

    Ok(CourseSummary {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        short_description: row.get(4)?,
        cover_image: row.get(5)?,
        difficulty: row.get(6)?,
        duration: row.get(7)?,
        prerequisites: row.get(8)?,
        learning_objectives,
        published: row.get(10)?,
        featured: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
        author: author_at(row, 14)?,
        category: category_at(row, 18)?,
        counts: CourseCounts {
            enrollments: row.get(22)?,
            lessons: row.get(23)?,
        },
    })
}

pub(crate) fn insert_course(conn: &Connection, id: &str, course: &NewCourse) -> Result<(), RepositoryError> {
    let now = Utc::now();
    let objectives = serde_json::to_string(&course.learning_objectives)?;

    conn.execute(
        "INSERT INTO courses (id, title, slug, description, short_description, cover_image, difficulty,
            duration, prerequisites, learning_objectives, published, featured, author_id, category_id,
            created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15)",
        params![
            id,
            course.title,
            course.slug,
            course.description,
            course.short_description,
            course.cover_image,
            course.difficulty,
            course.duration,
            course.prerequisites,
            objectives,
            course.published,
            course.featured,
            course.author_id,
            course.category_id,
            now,
        ],
    )
    .map_err(|e| map_unique_violation(e, "A course with this slug"))?;

    Ok(())
}

fn lessons_for(conn: &Connection, course_id: &str) -> Result<Vec<Lesson>, RepositoryError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, slug, description, content, position, duration
         FROM lessons
         WHERE course_id = ?1 AND published = 1
         ORDER BY position",
    )?;

    let lessons = stmt
        .query_map([course_id], |row| {
            Ok(Lesson {
                id: row.get(0)?,
                title: row.get(1)?,
                slug: row.get(2)?,
                description: row.get(3)?,
                content: row.get(4)?,
                position: row.get(5)?,
                duration: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lessons)
}

/// Whether a course row exists for `slug`, published or not.
pub(crate) fn slug_exists(conn: &Connection, slug: &str) -> Result<bool, RepositoryError> {
    let found = conn
        .query_row("SELECT 1 FROM courses WHERE slug = ?1", [slug], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}
