use std::sync::Arc;

use tracing::{error, info, instrument};

use super::ServiceError;
use crate::completion::{ChatMessage, CompletionClient, CompletionRequest, CompletionStream};
use crate::entities::query::non_blank;
use crate::entities::search::DEFAULT_SEARCH_CONTEXT;
use crate::entities::{SearchInput, SearchResults};
use surgical_academy_data::repository::{ArticleRepositoryTrait, CourseRepositoryTrait};

/// Maximum courses and articles returned next to the answer
pub const LOOKUP_LIMIT: u64 = 5;

pub const SEARCH_SYSTEM_PROMPT: &str = "Вы помощник по поиску в медицинской образовательной платформе. \
Анализируйте запрос пользователя и предоставляйте релевантные результаты поиска по курсам хирургии, \
медицинским статьям и образовательным материалам.\n\n\
Отвечайте на русском языке и предоставляйте структурированную информацию. Если запрос связан с \
медицинскими процедурами, диагностикой или лечением, предоставьте образовательную информацию, но \
напомните о необходимости консультации с медицинскими специалистами.";

/// Local matches plus the still-running completion stream
pub struct SearchResponse {
    pub results: SearchResults,
    pub stream: CompletionStream,
}

/// Build the chat messages sent upstream for `query`
pub fn build_request(query: &str, context: &str) -> CompletionRequest {
    let prompt = format!(
        "Поисковый запрос: \"{}\"\nКонтекст: {}\n\n\
         Пожалуйста, помогите найти релевантную информацию и предоставьте рекомендации по обучению.",
        query, context
    );

    CompletionRequest {
        messages: vec![ChatMessage::system(SEARCH_SYSTEM_PROMPT), ChatMessage::user(prompt)],
    }
}

/// Relay between the completion endpoint and the local catalogue
#[derive(Clone)]
pub struct AiSearchService {
    client: Arc<dyn CompletionClient>,
    courses: Arc<dyn CourseRepositoryTrait>,
    articles: Arc<dyn ArticleRepositoryTrait>,
}

impl AiSearchService {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        courses: Arc<dyn CourseRepositoryTrait>,
        articles: Arc<dyn ArticleRepositoryTrait>,
    ) -> Self {
        Self {
            client,
            courses,
            articles,
        }
    }

    /// Open the upstream stream and run both lookups concurrently.
    ///
    /// A blank query is rejected before anything is sent upstream. Any
    /// failure among the three aborts the whole search.
    #[instrument(skip(self, input))]
    pub async fn search(&self, input: SearchInput) -> Result<SearchResponse, ServiceError> {
        let query = non_blank(&input.query).ok_or_else(|| ServiceError::Validation("Query is required".to_string()))?;
        let context = non_blank(&input.context).unwrap_or_else(|| DEFAULT_SEARCH_CONTEXT.to_string());
        let request = build_request(&query, &context);

        let joined = tokio::try_join!(
            async { self.client.stream_completion(request).await.map_err(ServiceError::from) },
            async { self.courses.search(query.clone(), LOOKUP_LIMIT).await.map_err(ServiceError::from) },
            async { self.articles.search(query.clone(), LOOKUP_LIMIT).await.map_err(ServiceError::from) },
        );

        match joined {
            Ok((stream, courses, articles)) => {
                info!(courses = courses.len(), articles = articles.len(), "search relay opened");
                Ok(SearchResponse {
                    results: SearchResults { courses, articles },
                    stream,
                })
            }
            Err(e) => {
                error!(error = %e, "AI search failed");
                Err(e)
            }
        }
    }
}
