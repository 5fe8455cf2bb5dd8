use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        pagination::{paginate, Page},
    },
};

use super::{category_map, ApiResponse, CategoryMap};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: String,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesResponse> {
    let all = categories::get_all_categories(&pool).await?;
    if all.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(all),
    }))
}

// the id comes from the URL, so an unknown category is a client error
async fn get_questions_for_category(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    page: Page,
) -> ApiResponse<CategoryQuestionsResponse> {
    let Path(id) = id.map_err(|_| ApiError::BadRequest)?;
    let category = categories::get_category(&pool, id)
        .await?
        .ok_or(ApiError::BadRequest)?;
    let selection = questions::get_questions_for_category(&pool, category.id).await?;
    let total_questions = selection.len();
    Ok(Json(CategoryQuestionsResponse {
        success: true,
        questions: paginate(selection, page.0),
        total_questions,
        current_category: category.kind,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route(
            "/categories/{id}/questions",
            get(get_questions_for_category),
        )
        .with_state(state)
}
