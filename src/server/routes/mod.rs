mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use axum::Json;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use crate::db::Category;

use super::error::ApiError;

pub type ApiResponse<T> = Result<Json<T>, ApiError>;

/// Category id to display label, serialized as a JSON object.
pub type CategoryMap = BTreeMap<i64, String>;

fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}
