use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: i64,
}

/// Validated input for a question insert.
#[derive(Debug, Clone)]
pub struct NewQuestion<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub difficulty: i64,
    pub category: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, difficulty, category FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM questions
        "#,
    )
    .fetch_one(pool)
    .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, difficulty, category FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, difficulty, category FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring match on the question text.
///
/// SQLite `LIKE` only folds ASCII, so matching happens on lowercased text here.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let needle = term.to_lowercase();
    Ok(get_all_questions(pool)
        .await?
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect())
}

pub async fn create_question(pool: &SqlitePool, new: NewQuestion<'_>) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, difficulty, category) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(new.question)
    .bind(new.answer)
    .bind(new.difficulty)
    .bind(new.category)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `false` when no row had that id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let mut conn = pool.acquire().await?;

    let affected = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?
    .rows_affected();
    Ok(affected > 0)
}

async fn insert_question_with_id(pool: &SqlitePool, question: &Question) -> sqlx::Result<()> {
    let mut conn = pool.acquire().await?;

    sqlx::query(
        r#"
        INSERT INTO questions (id, question, answer, difficulty, category) VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(question.id)
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.difficulty)
    .bind(question.category)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn update_question(pool: &SqlitePool, question: &Question) -> sqlx::Result<()> {
    let mut conn = pool.acquire().await?;

    sqlx::query(
        r#"
        UPDATE questions SET question=?1, answer=?2, difficulty=?3, category=?4 WHERE questions.id = ?5
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.difficulty)
    .bind(question.category)
    .bind(question.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Upserts by id, keeping the ids from the import.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = get_all_questions(pool)
        .await?
        .iter()
        .map(|q| q.id)
        .collect();
    for question in questions {
        if existing_ids.contains(&question.id) {
            update_question(pool, &question).await?;
        } else {
            insert_question_with_id(pool, &question).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_in_memory, run_migrations};

    async fn pool_with(texts: &[&str]) -> SqlitePool {
        let pool = establish_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        for text in texts {
            create_question(
                &pool,
                NewQuestion {
                    question: text,
                    answer: "a",
                    difficulty: 1,
                    category: 1,
                },
            )
            .await
            .unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let pool = pool_with(&["Who discovered Penicillin?", "What is 2+2?"]).await;
        let found = search_questions(&pool, "penicillin").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Who discovered Penicillin?");
    }

    #[tokio::test]
    async fn search_treats_percent_literally() {
        let pool = pool_with(&["Is 100% of water wet?", "Is water wet?"]).await;
        let found = search_questions(&pool, "100%").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let pool = pool_with(&["Where is ÉCOLE Polytechnique?", "Where is Paris?"]).await;
        let found = search_questions(&pool, "école").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Where is ÉCOLE Polytechnique?");
    }

    #[tokio::test]
    async fn empty_search_matches_everything() {
        let pool = pool_with(&["one", "two", "three"]).await;
        assert_eq!(search_questions(&pool, "").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let pool = pool_with(&["only"]).await;
        let id = get_all_questions(&pool).await.unwrap()[0].id;
        assert!(delete_question(&pool, id).await.unwrap());
        assert!(!delete_question(&pool, id).await.unwrap());
        assert_eq!(get_question_by_id(&pool, id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn import_updates_existing_and_keeps_ids() {
        let pool = pool_with(&["old text"]).await;
        let existing = get_all_questions(&pool).await.unwrap()[0].clone();
        let imported = vec![
            Question {
                question: "new text".to_owned(),
                ..existing.clone()
            },
            Question {
                id: 42,
                question: "fresh".to_owned(),
                answer: "b".to_owned(),
                difficulty: 3,
                category: 2,
            },
        ];
        import_questions(&pool, imported).await.unwrap();

        let all = get_all_questions(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].question, "new text");
        assert_eq!(all[1].id, 42);
    }
}
