use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use super::deserializers::deserialize_lenient_page;

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_page")]
    page: Option<u32>,
}

/// Requested page from `?page=`. A query string that cannot be read,
/// e.g. one with a repeated `page`, means the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(pub u32);

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let page = match Query::<PageQuery>::try_from_uri(&parts.uri) {
            Ok(Query(query)) => query.page,
            Err(e) => {
                tracing::debug!("Ignoring unreadable query string: {e}");
                None
            }
        };
        Ok(page.map(Page).unwrap_or_default())
    }
}

/// Slice of at most [`QUESTIONS_PER_PAGE`] items starting at `(page - 1) * QUESTIONS_PER_PAGE`.
/// Pages past the end, and page 0, are empty.
pub fn paginate<T>(items: Vec<T>, page: u32) -> Vec<T> {
    let Some(index) = (page as usize).checked_sub(1) else {
        return Vec::new();
    };
    let start = index.saturating_mul(QUESTIONS_PER_PAGE);
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::Request;

    async fn extract(uri: &str) -> Page {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        match Page::from_request_parts(&mut parts, &()).await {
            Ok(page) => page,
            Err(never) => match never {},
        }
    }

    #[tokio::test]
    async fn first_page_is_default() {
        assert_eq!(extract("/questions").await, Page(1));
        assert_eq!(extract("/questions?page=4").await, Page(4));
    }

    #[tokio::test]
    async fn unreadable_query_falls_back_to_first_page() {
        assert_eq!(extract("/questions?page=1&page=2").await, Page(1));
        assert_eq!(extract("/questions?page=x&page=y").await, Page(1));
    }

    #[test]
    fn pages_are_consecutive_without_overlap() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(items.clone(), 1), (1..=10).collect::<Vec<_>>());
        assert_eq!(paginate(items.clone(), 2), (11..=20).collect::<Vec<_>>());
        assert_eq!(paginate(items, 3), (21..=25).collect::<Vec<_>>());
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<u32> = (1..=25).collect();
        assert!(paginate(items.clone(), 4).is_empty());
        assert!(paginate(items.clone(), 0).is_empty());
        assert!(paginate(items, u32::MAX).is_empty());
    }
}
