pub mod handlers;
pub mod query;

pub use handlers::{ApiError, AppState, router};
pub use query::{Format, QueryError, SearchParams, parse_play, parse_search};
