use std::sync::Arc;

use tracing::instrument;

use super::ServiceError;
use crate::entities::query::non_blank;
use crate::entities::{ArticleList, ArticleQuery, Pagination};
use crate::text::{calculate_read_time, truncate_text};
use surgical_academy_data::models::{ArticleFilter, ArticleSummary, Category};
use surgical_academy_data::repository::{ArticleRepositoryTrait, CategoryRepositoryTrait};

/// Length of an excerpt derived from the article body
pub const EXCERPT_LENGTH: usize = 200;

/// Published articles and the category list
#[derive(Clone)]
pub struct ArticleService {
    articles: Arc<dyn ArticleRepositoryTrait>,
    categories: Arc<dyn CategoryRepositoryTrait>,
}

impl ArticleService {
    pub fn new(articles: Arc<dyn ArticleRepositoryTrait>, categories: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { articles, categories }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: ArticleQuery) -> Result<ArticleList, ServiceError> {
        let (page, limit, window) = query.paging().window().map_err(ServiceError::Validation)?;

        let filter = ArticleFilter {
            category_slug: non_blank(&query.category),
            search: non_blank(&query.search),
        };

        let (articles, total) = self.articles.find(filter, window).await?;
        Ok(ArticleList {
            articles: articles.into_iter().map(present).collect(),
            pagination: Pagination::new(page, limit, total),
        })
    }

    #[instrument(skip(self))]
    pub async fn detail(&self, slug: &str) -> Result<ArticleSummary, ServiceError> {
        self.articles
            .find_published_by_slug(slug.to_string())
            .await?
            .map(present)
            .ok_or_else(|| ServiceError::NotFound("Article not found".to_string()))
    }

    /// All categories ordered by name
    pub async fn categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.categories.list().await?)
    }
}

/// Fill read time and excerpt when the stored row has none
pub(crate) fn present(mut article: ArticleSummary) -> ArticleSummary {
    if article.read_time.is_none() {
        article.read_time = Some(calculate_read_time(&article.content));
    }
    if article.excerpt.as_deref().map_or(true, |e| e.trim().is_empty()) {
        article.excerpt = Some(truncate_text(&article.content, EXCERPT_LENGTH));
    }
    article
}
