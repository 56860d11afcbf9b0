use crate::state::AppState;
use axum::Router;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod password;
pub mod token;

pub use extractors::{resolve_bearer, Identity};

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
