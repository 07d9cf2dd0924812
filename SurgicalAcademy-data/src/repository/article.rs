use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection, Row};
use tracing::debug;

use super::errors::RepositoryError;
use super::predicate::Predicate;
use super::{author_at, load_tags, TagLink};
use crate::database::DatabasePool;
use crate::models::{ArticleFilter, ArticleSummary, CategorySummary, PageRequest};

/// Repository trait for articles
#[async_trait]
pub trait ArticleRepositoryTrait: Send + Sync {
    /// Published articles matching `filter`, plus the total match count
    async fn find(
        &self,
        filter: ArticleFilter,
        page: PageRequest,
    ) -> Result<(Vec<ArticleSummary>, u64), RepositoryError>;

    /// Up to `limit` published articles whose title or content contains `term`
    async fn search(&self, term: String, limit: u64) -> Result<Vec<ArticleSummary>, RepositoryError>;

    async fn find_published_by_slug(&self, slug: String) -> Result<Option<ArticleSummary>, RepositoryError>;

    /// Featured published articles, newest first
    async fn featured(&self, limit: u64) -> Result<Vec<ArticleSummary>, RepositoryError>;
}

/// SQLite-backed article repository
#[derive(Debug, Clone)]
pub struct ArticleRepository {
    pool: DatabasePool,
}

impl ArticleRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepositoryTrait for ArticleRepository {
    async fn find(
        &self,
        filter: ArticleFilter,
        page: PageRequest,
    ) -> Result<(Vec<ArticleSummary>, u64), RepositoryError> {
        self.pool
            .run(move |conn| {
                let predicate = Predicate::new()
                    .is_set("a.published")
                    .with(filter.category_slug, |p, slug| p.eq("cat.slug", slug))
                    .with(filter.search.as_deref(), |p, term| {
                        p.contains_any(&["a.title", "a.content", "a.excerpt"], term)
                    });

                let articles = select_articles(conn, &predicate, page)?;
                let total = count_articles(conn, &predicate)?;
                debug!("Article listing matched {} rows, returning {}", total, articles.len());
                Ok((articles, total))
            })
            .await
    }

    async fn search(&self, term: String, limit: u64) -> Result<Vec<ArticleSummary>, RepositoryError> {
        self.pool
            .run(move |conn| {
                let predicate = Predicate::new()
                    .is_set("a.published")
                    .contains_any(&["a.title", "a.content"], &term);
                select_articles(conn, &predicate, PageRequest { offset: 0, limit })
            })
            .await
    }

    async fn find_published_by_slug(&self, slug: String) -> Result<Option<ArticleSummary>, RepositoryError> {
        self.pool
            .run(move |conn| {
                let predicate = Predicate::new().is_set("a.published").eq("a.slug", slug);
                Ok(select_articles(conn, &predicate, PageRequest { offset: 0, limit: 1 })?
                    .into_iter()
                    .next())
            })
            .await
    }

    async fn featured(&self, limit: u64) -> Result<Vec<ArticleSummary>, RepositoryError> {
        self.pool
            .run(move |conn| {
                let predicate = Predicate::new().is_set("a.published").is_set("a.featured");
                select_articles(conn, &predicate, PageRequest { offset: 0, limit })
            })
            .await
    }
}

const ARTICLE_SELECT: &str = "SELECT a.id, a.title, a.slug, a.content, a.excerpt, a.cover_image,
        a.published, a.featured, a.read_time, a.published_at, a.created_at, a.updated_at,
        u.id, u.name, u.full_name, u.specialization,
        cat.name, cat.slug, cat.color, cat.icon
    FROM articles a
    JOIN users u ON u.id = a.author_id
    LEFT JOIN categories cat ON cat.id = a.category_id";

const ARTICLE_ORDER: &str = "a.featured DESC, a.published_at DESC, a.created_at DESC, a.rowid DESC";

fn select_articles(
    conn: &Connection,
    predicate: &Predicate,
    page: PageRequest,
) -> Result<Vec<ArticleSummary>, RepositoryError> {
    let sql = format!(
        "{} {} ORDER BY {} LIMIT ? OFFSET ?",
        ARTICLE_SELECT,
        predicate.where_sql(),
        ARTICLE_ORDER
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut articles = stmt
        .query_map(params_from_iter(predicate.params_with_page(page)), map_article_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let ids: Vec<String> = articles.iter().map(|a| a.id.clone()).collect();
    let mut tags = load_tags(conn, TagLink::Article, &ids)?;
    for article in &mut articles {
        article.tags = tags.remove(&article.id).unwrap_or_default();
    }

    Ok(articles)
}

fn count_articles(conn: &Connection, predicate: &Predicate) -> Result<u64, RepositoryError> {
    let sql = format!(
        "SELECT COUNT(*) FROM articles a LEFT JOIN categories cat ON cat.id = a.category_id {}",
        predicate.where_sql()
    );

    Ok(conn.query_row(&sql, params_from_iter(predicate.params()), |row| row.get(0))?)
}

fn map_article_row(row: &Row<'_>) -> rusqlite::Result<ArticleSummary> {
    // category is optional, so its slug decides whether the LEFT JOIN matched
    let category = match row.get::<_, Option<String>>(17)? {
        Some(slug) => Some(CategorySummary {
            name: row.get(16)?,
            slug,
            color: row.get(18)?,
            icon: row.get(19)?,
        }),
        None => None,
    };

    Ok(ArticleSummary {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        content: row.get(3)?,
        excerpt: row.get(4)?,
        cover_image: row.get(5)?,
        published: row.get(6)?,
        featured: row.get(7)?,
        read_time: row.get(8)?,
        published_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
        author: author_at(row, 12)?,
        category,
        tags: Vec::new(),
    })
}
