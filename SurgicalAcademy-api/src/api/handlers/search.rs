use std::convert::Infallible;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, instrument};

use surgical_academy_domain::completion::CompletionStream;
use surgical_academy_domain::entities::SearchResults;
use surgical_academy_domain::services::ai_search::SearchResponse;

use super::error::{validated, ApiResult, ErrorResponse};
use crate::api::state::AppState;
use crate::entities::PublicSearchRequest;

/// Event names of the relay stream
pub const RESULTS_EVENT: &str = "results";
pub const CHUNK_EVENT: &str = "chunk";
pub const DONE_EVENT: &str = "done";
pub const ERROR_EVENT: &str = "error";

const STREAM_FAILED_MESSAGE: &str = "AI search stream interrupted";

fn json_event(name: &str, value: &impl Serialize) -> Event {
    match Event::default().event(name).json_data(value) {
        Ok(event) => event,
        Err(e) => {
            error!("Failed to encode {} frame: {}", name, e);
            Event::default()
                .event(ERROR_EVENT)
                .data(r#"{"message":"AI search failed"}"#)
        }
    }
}

/// `results`, then one `chunk` per upstream piece, then `done` or `error`
fn relay_frames(results: SearchResults, upstream: CompletionStream) -> impl Stream<Item = Result<Event, Infallible>> {
    let head = stream::once(async move { json_event(RESULTS_EVENT, &results) });

    let body = stream::unfold(Some(upstream), |state| async move {
        let mut upstream = state?;
        match upstream.next().await {
            Some(Ok(text)) => Some((json_event(CHUNK_EVENT, &json!({ "text": text })), Some(upstream))),
            Some(Err(e)) => {
                error!("AI search stream failed: {}", e);
                Some((json_event(ERROR_EVENT, &json!({ "message": STREAM_FAILED_MESSAGE })), None))
            }
            None => {
                debug!("AI search stream finished");
                Some((Event::default().event(DONE_EVENT).data("[DONE]"), None))
            }
        }
    });

    head.chain(body).map(Ok)
}

/// Relay a search query to the completion model
///
/// Responds with a Server-Sent Events stream: a `results` frame with up to five
/// matching courses and articles, the model output as `chunk` frames and a
/// closing `done` frame (or `error` if the upstream breaks off).
#[utoipa::path(
    post,
    path = "/api/ai-search",
    request_body = PublicSearchRequest,
    responses(
        (status = 200, description = "Event stream of results, chunk and done frames", content_type = "text/event-stream", body = String),
        (status = 400, description = "Query is missing or empty", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Upstream or lookup failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "search"
)]
#[instrument(skip_all)]
pub async fn ai_search(
    State(state): State<AppState>,
    body: Result<Json<PublicSearchRequest>, JsonRejection>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let request = validated(body)?;

    let SearchResponse { results, stream } = state
        .services
        .search
        .search(request.into())
        .await
        .map_err(|e| ErrorResponse::from_service(e, "AI search failed"))?;

    debug!(
        courses = results.courses.len(),
        articles = results.articles.len(),
        "Streaming AI search response"
    );

    Ok(Sse::new(relay_frames(results, stream)).keep_alive(KeepAlive::default()))
}
