use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use lexicon_db::{Definition, Emphasis, Entry, LexiconIndex, Quote, search};
use lexicon_types::{Genre, Location};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::query::{Format, QueryError, SearchParams, parse_search};

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<LexiconIndex>,
    /// Markup used by `format=text` responses.
    pub emphasis: Emphasis,
    pub disable_cache: bool,
}

/// Play names keyed by genre label (`comedies`, `tragedies`, `histories`).
pub type PlaysResponse = BTreeMap<&'static str, Vec<&'static str>>;

#[derive(Serialize)]
pub struct SearchResponse {
    total_entries: usize,
    total_quotes: usize,
    entries: Vec<EntryDto>,
}

#[derive(Serialize)]
struct EntryDto {
    key: String,
    headword: String,
    definitions: Vec<DefinitionDto>,
}

#[derive(Serialize)]
struct DefinitionDto {
    text: String,
    quotes: Vec<QuoteDto>,
}

#[derive(Serialize)]
struct QuoteDto {
    text: String,
    locations: Vec<LocationDto>,
}

#[derive(Serialize)]
struct LocationDto {
    play: &'static str,
    act: Option<String>,
    scene: Option<u32>,
    line: u32,
    citation: String,
}

impl From<&Entry> for EntryDto {
    fn from(entry: &Entry) -> Self {
        Self {
            key: entry.key().to_string(),
            headword: entry.headword().to_string(),
            definitions: entry.definitions().iter().map(DefinitionDto::from).collect(),
        }
    }
}

impl From<&Definition> for DefinitionDto {
    fn from(definition: &Definition) -> Self {
        Self {
            text: definition.text().to_string(),
            quotes: definition
                .quotes()
                .quotes()
                .iter()
                .map(QuoteDto::from)
                .collect(),
        }
    }
}

impl From<&Quote> for QuoteDto {
    fn from(quote: &Quote) -> Self {
        Self {
            text: quote.text().to_string(),
            locations: quote.locations().iter().map(LocationDto::from).collect(),
        }
    }
}

impl From<&Location> for LocationDto {
    fn from(location: &Location) -> Self {
        Self {
            play: location.play.name(),
            act: location.act.clone(),
            scene: location.scene,
            line: location.line,
            citation: location.to_string(),
        }
    }
}

impl From<&LexiconIndex> for SearchResponse {
    fn from(index: &LexiconIndex) -> Self {
        Self {
            total_entries: index.entry_count(),
            total_quotes: index.quote_count(),
            entries: index
                .iter()
                .flat_map(|(_, entries)| entries)
                .map(EntryDto::from)
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/plays", get(plays))
        .route("/v1/search", get(search_lexicon))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn plays(State(state): State<AppState>) -> Response {
    let response: Json<PlaysResponse> = Json(
        Genre::ALL
            .into_iter()
            .map(|genre| {
                let names: Vec<&'static str> = genre.plays().map(|p| p.name()).collect();
                (genre.label(), names)
            })
            .collect(),
    );
    if state.disable_cache {
        return response.into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400, immutable"),
        )],
        response,
    )
        .into_response()
}

async fn search_lexicon(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let (query, format) = parse_search(&params)?;
    debug!(?query, ?format, "search");

    let hits = search(&state.index, &query).ok_or(ApiError::NotFound)?;
    let response = match format {
        Format::Json => Json(SearchResponse::from(&hits)).into_response(),
        Format::Text => (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )],
            hits.render(state.emphasis),
        )
            .into_response(),
    };

    if state.disable_cache {
        Ok(response)
    } else {
        Ok((
            [(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=300"),
            )],
            response,
        )
            .into_response())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    BadRequest(#[from] QueryError),
    #[error("invalid query string: {}", .0.body_text())]
    MalformedQuery(#[from] QueryRejection),
    #[error("no results")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) | ApiError::MalformedQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
