//! Validation of raw search parameters into a [`SearchQuery`].

use std::str::FromStr;

use lexicon_db::SearchQuery;
use lexicon_types::Play;
use serde::Deserialize;
use thiserror::Error;

/// Query string of `/v1/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub word: Option<String>,
    pub play: Option<String>,
    pub act: Option<String>,
    pub scene: Option<u32>,
    pub line_start: Option<u32>,
    pub line_end: Option<u32>,
    pub format: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Format {
    #[default]
    Json,
    Text,
}

impl FromStr for Format {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "json" => Ok(Format::Json),
            "text" | "txt" => Ok(Format::Text),
            other => Err(QueryError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("word or play is required")]
    Empty,
    #[error("unknown play `{name}`{}", did_you_mean(.suggestion))]
    UnknownPlay { name: String, suggestion: Option<Play> },
    #[error("{0} requires a play")]
    ConstraintWithoutPlay(&'static str),
    #[error("{0} must be >= 1")]
    Zero(&'static str),
    #[error("line_start ({start}) must not exceed line_end ({end})")]
    InvertedRange { start: u32, end: u32 },
    #[error("unknown format `{0}` (expected json or text)")]
    UnknownFormat(String),
}

/// Check the raw parameters and build the query they describe.
pub fn parse_search(params: &SearchParams) -> Result<(SearchQuery, Format), QueryError> {
    let format = params
        .format
        .as_deref()
        .map(Format::from_str)
        .transpose()?
        .unwrap_or_default();

    let word = non_blank(params.word.as_deref());
    let play = non_blank(params.play.as_deref()).map(parse_play).transpose()?;
    let act = non_blank(params.act.as_deref());

    if play.is_none() {
        if act.is_some() {
            return Err(QueryError::ConstraintWithoutPlay("act"));
        }
        if params.scene.is_some() {
            return Err(QueryError::ConstraintWithoutPlay("scene"));
        }
        if params.line_start.is_some() || params.line_end.is_some() {
            return Err(QueryError::ConstraintWithoutPlay("line"));
        }
        if word.is_none() {
            return Err(QueryError::Empty);
        }
    }

    if params.scene == Some(0) {
        return Err(QueryError::Zero("scene"));
    }
    if params.line_start == Some(0) {
        return Err(QueryError::Zero("line_start"));
    }
    if params.line_end == Some(0) {
        return Err(QueryError::Zero("line_end"));
    }
    if let (Some(start), Some(end)) = (params.line_start, params.line_end)
        && start > end
    {
        return Err(QueryError::InvertedRange { start, end });
    }

    let query = SearchQuery {
        word: word.map(str::to_string),
        play,
        act: act.map(str::to_string),
        scene: params.scene,
        line_start: params.line_start,
        line_end: params.line_end,
    };
    Ok((query, format))
}

/// Resolve a play by name or citation abbreviation, suggesting the closest
/// name when nothing matches.
pub fn parse_play(raw: &str) -> Result<Play, QueryError> {
    Play::resolve_query(raw).ok_or_else(|| QueryError::UnknownPlay {
        name: raw.trim().to_string(),
        suggestion: Play::closest(raw),
    })
}

fn did_you_mean(suggestion: &Option<Play>) -> String {
    suggestion
        .map(|play| format!("; did you mean {play}?"))
        .unwrap_or_default()
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
