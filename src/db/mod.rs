pub mod queries;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use queries::categories::Category;
pub use queries::questions::{NewQuestion, Question};

use sqlx::Error;

pub async fn establish_connection(url: &str) -> Result<SqlitePool, Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    SqlitePool::connect_with(options).await
}

/// Single-connection pool over a private in-memory database.
///
/// Every connection to `sqlite::memory:` opens a fresh database, so the pool
/// must never grow past one connection or recycle it.
pub async fn establish_in_memory() -> Result<SqlitePool, Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_empty_tables() {
        let pool = establish_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let categories = queries::categories::get_all_categories(&pool).await.unwrap();
        let total = queries::questions::count_questions(&pool).await.unwrap();
        assert!(categories.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn file_database_is_created_on_connect() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("trivia.db").display());
        let pool = establish_connection(&url).await.unwrap();
        run_migrations(&pool).await.unwrap();
        assert!(dir.path().join("trivia.db").exists());
    }
}
