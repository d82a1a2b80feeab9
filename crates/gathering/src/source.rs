use async_trait::async_trait;

use crate::{Participant, Record};

/// Any failure to obtain data from an external source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered http={status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fixture {path}: {message}")]
    Fixture { path: String, message: String },
}

/// Supplies the ordered gathering records the world is built from.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<Record>, SourceError>;
}

/// Supplies the members of a group, keyed by the group's `urlname`.
#[async_trait]
pub trait MemberSource: Send + Sync {
    async fn fetch_participants(&self, group_id: &str) -> Result<Vec<Participant>, SourceError>;
}
