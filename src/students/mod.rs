pub mod dto;
pub mod extract;
pub mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use repo::{MemoryStudentStore, PgStudentStore, StudentStore};
pub use repo_types::{Status, Student};

pub fn router() -> Router<AppState> {
    handlers::student_routes()
}
