use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        pagination::{paginate, Page},
    },
    telemetry::QUESTION_CHANGES_CNTR,
};

use super::{category_map, ApiResponse, CategoryMap};

/// Body of `POST /questions`. A present `searchTerm`, even an empty one,
/// selects search mode; otherwise the remaining fields describe a new question.
#[derive(Debug, Deserialize)]
struct QuestionsBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
}

impl QuestionsBody {
    // empty strings and zeroes count as missing
    fn new_question(&self) -> Option<NewQuestion<'_>> {
        let question = self.question.as_deref().filter(|s| !s.is_empty())?;
        let answer = self.answer.as_deref().filter(|s| !s.is_empty())?;
        let difficulty = self.difficulty.filter(|&d| d != 0)?;
        let category = self.category.filter(|&c| c != 0)?;
        Some(NewQuestion {
            question,
            answer,
            difficulty,
            category,
        })
    }
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: String,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct DeletedResponse {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct CreatedResponse {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct SearchResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
#[serde(untagged)]
enum QuestionsPostResponse {
    Created(CreatedResponse),
    Search(SearchResponse),
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    page: Page,
) -> ApiResponse<QuestionsPage> {
    let selection = questions::get_all_questions(&pool).await?;
    let total_questions = selection.len();
    let current = paginate(selection, page.0);
    if current.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = categories::get_all_categories(&pool).await?;
    // not tied to any filter, always the lowest-id category
    let current_category = categories
        .first()
        .map(|c| c.kind.clone())
        .ok_or(ApiError::NotFound)?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: current,
        total_questions,
        current_category,
        categories: category_map(categories),
    }))
}

// a missing id is reported as 422, the same as a failed delete
async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    page: Page,
) -> ApiResponse<DeletedResponse> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let deleted = questions::delete_question(&pool, id).await.map_err(|e| {
        tracing::warn!("Failed to delete question {id}: {e}");
        ApiError::Unprocessable
    })?;
    if !deleted {
        tracing::debug!("Question {id} does not exist");
        return Err(ApiError::Unprocessable);
    }
    QUESTION_CHANGES_CNTR.with_label_values(&["deleted"]).inc();

    let selection = questions::get_all_questions(&pool).await?;
    let total_questions = selection.len();
    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
        questions: paginate(selection, page.0),
        total_questions,
    }))
}

async fn post_questions(
    State(pool): State<SqlitePool>,
    page: Page,
    body: Result<Json<QuestionsBody>, JsonRejection>,
) -> ApiResponse<QuestionsPostResponse> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!("Rejected questions body: {e}");
        ApiError::Unprocessable
    })?;

    let response = match &body.search_term {
        Some(term) => QuestionsPostResponse::Search(search(&pool, term.trim(), page).await?),
        None => QuestionsPostResponse::Created(create(&pool, &body, page).await?),
    };
    Ok(Json(response))
}

// total_questions counts the whole table, not the matches
async fn search(
    pool: &SqlitePool,
    term: &str,
    page: Page,
) -> Result<SearchResponse, ApiError> {
    let selection = questions::search_questions(pool, term).await?;
    let total_questions = questions::count_questions(pool).await?;
    tracing::debug!("Search {term:?} matched {} questions", selection.len());
    Ok(SearchResponse {
        success: true,
        questions: paginate(selection, page.0),
        total_questions,
    })
}

async fn create(
    pool: &SqlitePool,
    body: &QuestionsBody,
    page: Page,
) -> Result<CreatedResponse, ApiError> {
    let new = body.new_question().ok_or(ApiError::Unprocessable)?;
    let created = questions::create_question(pool, new).await.map_err(|e| {
        tracing::warn!("Failed to insert question: {e}");
        ApiError::Unprocessable
    })?;
    QUESTION_CHANGES_CNTR.with_label_values(&["created"]).inc();
    tracing::info!("Created question {created}");

    let selection = questions::get_all_questions(pool).await?;
    let total_questions = selection.len();
    Ok(CreatedResponse {
        success: true,
        created,
        questions: paginate(selection, page.0),
        total_questions,
    })
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(post_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
