use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question,
    },
    server::{
        app::AppState, deserializers::deserialize_lenient_id, error::ApiError,
        quiz::next_question,
    },
    telemetry::QUIZ_CNTR,
};

use super::ApiResponse;

#[derive(Debug, Deserialize)]
struct QuizCategory {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    #[serde(default)]
    previous_questions: Vec<i64>,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<Question>,
}

// the category is resolved by its label; an unknown label plays over all questions
async fn play_quiz(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<QuizResponse> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!("Rejected quiz body: {e}");
        ApiError::BadRequest
    })?;
    tracing::debug!(
        "Quiz for category {:?} (id {:?}), {} previous",
        request.quiz_category.kind,
        request.quiz_category.id,
        request.previous_questions.len()
    );

    let category = categories::get_category_by_type(&pool, &request.quiz_category.kind).await?;
    let (label, candidates) = match category {
        Some(category) => (
            category.kind,
            questions::get_questions_for_category(&pool, category.id).await?,
        ),
        None => ("all".to_owned(), questions::get_all_questions(&pool).await?),
    };

    let question = next_question(
        candidates,
        &request.previous_questions,
        &mut rand::thread_rng(),
    );
    if question.is_some() {
        QUIZ_CNTR.with_label_values(&[label.as_str()]).inc();
    }
    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
