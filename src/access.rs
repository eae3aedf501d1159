//! Generic read-operation facade
//!
//! [`AccessService`] wraps an [`OutputAssembler`] and fixes the error
//! contract at the service boundary: identifier problems and business-level
//! misses pass through unchanged, while anything storage-related is logged
//! with its cause and collapsed into an opaque internal error. The same
//! facade shape serves any resource kind with condensed/expanded views;
//! platforms are the one wired up here.
//!
//! Not-found semantics differ by operation on purpose: `get_one`/`get_many`
//! fetch and fail with `NotFound`, `exists` answers a predicate and returns
//! `false` for a well-formed identifier with no backing record.

use crate::error::{Error, Result};
use crate::model::SearchResult;
use crate::query::Query;
use async_trait::async_trait;
use tracing::error;

/// Resource assembly surface consumed by the facade
#[async_trait]
pub trait OutputAssembler: Send + Sync {
    type Condensed: Send;
    type Expanded: Send;

    async fn get_all_condensed(&self, query: &Query) -> Result<Vec<Self::Condensed>>;

    async fn get_all_expanded(&self, query: &Query) -> Result<Vec<Self::Expanded>>;

    async fn get_instance(&self, id: &str, query: &Query) -> Result<Self::Expanded>;

    async fn exists(&self, id: &str, query: &Query) -> Result<bool>;

    async fn search(&self, query: &Query) -> Result<Vec<SearchResult>>;
}

/// Read facade over one resource kind's assembler
pub struct AccessService<A: OutputAssembler> {
    repository: A,
}

impl<A: OutputAssembler> AccessService<A> {
    pub fn new(repository: A) -> Self {
        Self { repository }
    }

    pub async fn get_all_expanded(&self, query: &Query) -> Result<Vec<A::Expanded>> {
        self.repository
            .get_all_expanded(query)
            .await
            .map_err(|e| surface("Could not get data.", e))
    }

    pub async fn get_all_condensed(&self, query: &Query) -> Result<Vec<A::Condensed>> {
        self.repository
            .get_all_condensed(query)
            .await
            .map_err(|e| surface("Could not get data.", e))
    }

    pub async fn get_many(&self, ids: &[&str], query: &Query) -> Result<Vec<A::Expanded>> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            results.push(
                self.repository
                    .get_instance(id, query)
                    .await
                    .map_err(|e| surface("Could not get data.", e))?,
            );
        }
        Ok(results)
    }

    pub async fn get_one(&self, id: &str, query: &Query) -> Result<A::Expanded> {
        self.repository
            .get_instance(id, query)
            .await
            .map_err(|e| surface("Could not get data.", e))
    }

    /// Never fails with `NotFound`; a well-formed absent id is `false`
    pub async fn exists(&self, id: &str, query: &Query) -> Result<bool> {
        self.repository.exists(id, query).await.map_err(|e| {
            surface(
                &format!("Could not check if resource '{}' does exist.", id),
                e,
            )
        })
    }

    pub async fn search(&self, query: &Query) -> Result<Vec<SearchResult>> {
        self.repository
            .search(query)
            .await
            .map_err(|e| surface("Could not search data.", e))
    }
}

/// Pass client-input and not-found errors through; collapse the rest into an
/// opaque internal error, keeping the cause in the log only.
fn surface(message: &str, e: Error) -> Error {
    match e {
        e @ (Error::NotFound(_) | Error::InvalidIdentifier(_)) => e,
        cause => {
            error!("{} Cause: {}", message, cause);
            Error::Internal(message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_passes_client_errors_through() {
        match surface("Could not get data.", Error::NotFound("mobile-remote-7".into())) {
            Error::NotFound(id) => assert_eq!(id, "mobile-remote-7"),
            other => panic!("expected NotFound, got {:?}", other),
        }
        match surface("Could not get data.", Error::InvalidIdentifier("bad".into())) {
            Error::InvalidIdentifier(_) => {}
            other => panic!("expected InvalidIdentifier, got {:?}", other),
        }
    }

    #[test]
    fn surface_hides_storage_causes() {
        let wrapped = surface(
            "Could not get data.",
            Error::Database(sqlx::Error::PoolTimedOut),
        );
        match wrapped {
            Error::Internal(message) => {
                assert_eq!(message, "Could not get data.");
                assert!(!message.contains("pool"));
            }
            other => panic!("expected Internal, got {:?}", other),
        }
    }
}
