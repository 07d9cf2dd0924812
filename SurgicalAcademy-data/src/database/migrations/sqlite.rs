use rusqlite::Connection;
use tracing::{debug, info};

use crate::database::DatabaseError;

/// Schema statements, applied in order. Every statement is idempotent.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "users",
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT,
            full_name TEXT NOT NULL,
            name TEXT,
            role TEXT NOT NULL DEFAULT 'STUDENT',
            specialization TEXT,
            institution TEXT,
            bio TEXT,
            last_login_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    ),
    (
        "categories",
        "CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT,
            color TEXT,
            icon TEXT,
            created_at TEXT NOT NULL
        )",
    ),
    (
        "tags",
        "CREATE TABLE IF NOT EXISTS tags (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            color TEXT
        )",
    ),
    (
        "courses",
        "CREATE TABLE IF NOT EXISTS courses (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL,
            short_description TEXT,
            cover_image TEXT,
            difficulty TEXT NOT NULL DEFAULT 'BEGINNER',
            duration INTEGER,
            prerequisites TEXT,
            learning_objectives TEXT NOT NULL DEFAULT '[]',
            published INTEGER NOT NULL DEFAULT 0,
            featured INTEGER NOT NULL DEFAULT 0,
            author_id TEXT NOT NULL REFERENCES users (id),
            category_id TEXT NOT NULL REFERENCES categories (id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    ),
    (
        "course_tags",
        "CREATE TABLE IF NOT EXISTS course_tags (
            course_id TEXT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
            tag_id TEXT NOT NULL REFERENCES tags (id) ON DELETE CASCADE,
            PRIMARY KEY (course_id, tag_id)
        )",
    ),
    (
        "lessons",
        "CREATE TABLE IF NOT EXISTS lessons (
            id TEXT PRIMARY KEY,
            course_id TEXT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            slug TEXT NOT NULL,
            description TEXT,
            content TEXT NOT NULL,
            position INTEGER NOT NULL,
            duration INTEGER,
            published INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            UNIQUE (course_id, slug)
        )",
    ),
    (
        "articles",
        "CREATE TABLE IF NOT EXISTS articles (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            content TEXT NOT NULL,
            excerpt TEXT,
            cover_image TEXT,
            published INTEGER NOT NULL DEFAULT 0,
            featured INTEGER NOT NULL DEFAULT 0,
            read_time INTEGER,
            author_id TEXT NOT NULL REFERENCES users (id),
            category_id TEXT REFERENCES categories (id),
            published_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    ),
    (
        "article_tags",
        "CREATE TABLE IF NOT EXISTS article_tags (
            article_id TEXT NOT NULL REFERENCES articles (id) ON DELETE CASCADE,
            tag_id TEXT NOT NULL REFERENCES tags (id) ON DELETE CASCADE,
            PRIMARY KEY (article_id, tag_id)
        )",
    ),
    (
        "enrollments",
        "CREATE TABLE IF NOT EXISTS enrollments (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            course_id TEXT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
            progress INTEGER NOT NULL DEFAULT 0,
            enrolled_at TEXT NOT NULL,
            completed_at TEXT,
            UNIQUE (user_id, course_id)
        )",
    ),
    (
        "progress",
        "CREATE TABLE IF NOT EXISTS progress (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            course_id TEXT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
            completed_lessons INTEGER NOT NULL DEFAULT 0,
            total_lessons INTEGER NOT NULL DEFAULT 0,
            progress_percentage REAL NOT NULL DEFAULT 0,
            last_accessed_at TEXT NOT NULL,
            UNIQUE (user_id, course_id)
        )",
    ),
    (
        "fhir_resources",
        "CREATE TABLE IF NOT EXISTS fhir_resources (
            id TEXT PRIMARY KEY,
            resource_type TEXT NOT NULL,
            fhir_id TEXT,
            data TEXT NOT NULL,
            status TEXT,
            author_id TEXT REFERENCES users (id),
            synced_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    ),
    (
        "idx_courses_listing",
        "CREATE INDEX IF NOT EXISTS idx_courses_listing
        ON courses (published, featured DESC, created_at DESC)",
    ),
    (
        "idx_articles_listing",
        "CREATE INDEX IF NOT EXISTS idx_articles_listing
        ON articles (published, featured DESC, published_at DESC)",
    ),
    (
        "idx_lessons_course",
        "CREATE INDEX IF NOT EXISTS idx_lessons_course ON lessons (course_id, position)",
    ),
    (
        "idx_fhir_resources_type",
        "CREATE INDEX IF NOT EXISTS idx_fhir_resources_type
        ON fhir_resources (resource_type, created_at DESC)",
    ),
];

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Running SQLite migrations");

    for (name, statement) in MIGRATIONS {
        debug!("Applying migration: {}", name);
        conn.execute_batch(statement)
            .map_err(|e| DatabaseError::Migration(format!("{}: {}", name, e)))?;
    }

    info!("SQLite migrations completed successfully");
    Ok(())
}
