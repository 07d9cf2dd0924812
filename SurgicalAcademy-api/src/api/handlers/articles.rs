use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use tracing::instrument;

use surgical_academy_data::models::{ArticleSummary, Category};
use surgical_academy_domain::entities::{ArticleList, ArticleQuery};

use super::error::{ApiResult, ErrorResponse};
use crate::api::state::AppState;

/// List published articles
#[utoipa::path(
    get,
    path = "/api/articles",
    params(ArticleQuery),
    responses(
        (status = 200, description = "One page of articles", body = ArticleList),
        (status = 400, description = "Invalid page", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "articles"
)]
#[instrument(skip(state))]
pub async fn list_articles(
    State(state): State<AppState>,
    query: Result<Query<ArticleQuery>, QueryRejection>,
) -> ApiResult<Json<ArticleList>> {
    let Query(query) = query?;
    let list = state
        .services
        .articles
        .list(query)
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to fetch articles"))?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/api/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article found", body = ArticleSummary),
        (status = 404, description = "No published article with this slug", body = ErrorResponse)
    ),
    tag = "articles"
)]
#[instrument(skip(state))]
pub async fn get_article(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<ArticleSummary>> {
    let article = state
        .services
        .articles
        .detail(&slug)
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to fetch article"))?;
    Ok(Json(article))
}

/// All categories ordered by name
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories", body = [Category]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "articles"
)]
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state
        .services
        .articles
        .categories()
        .await
        .map_err(|e| ErrorResponse::from_service(e, "Failed to fetch categories"))?;
    Ok(Json(categories))
}
