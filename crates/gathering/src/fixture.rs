//! Offline source backed by a JSON file.
//!
//! ```json
//! { "events": [ { "id": "1", "name": "...", ... } ],
//!   "members": { "rust-nyc": [ { "id": 1, "name": "...", "group_profile": { "visited": 0 } } ] } }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::source::{EventSource, MemberSource, SourceError};
use crate::{Participant, Record};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureSource {
    #[serde(default)]
    events: Vec<Record>,
    #[serde(default)]
    members: HashMap<String, Vec<Participant>>,
}

impl FixtureSource {
    pub fn new(events: Vec<Record>, members: HashMap<String, Vec<Participant>>) -> Self {
        Self { events, members }
    }

    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let fail = |message: String| SourceError::Fixture {
            path: path.display().to_string(),
            message,
        };
        let s = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        Self::parse(&s).map_err(|e| fail(e.to_string()))
    }

    pub fn parse(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[async_trait]
impl EventSource for FixtureSource {
    async fn fetch_records(&self) -> Result<Vec<Record>, SourceError> {
        Ok(self.events.clone())
    }
}

#[async_trait]
impl MemberSource for FixtureSource {
    async fn fetch_participants(&self, group_id: &str) -> Result<Vec<Participant>, SourceError> {
        Ok(self.members.get(group_id).cloned().unwrap_or_default())
    }
}
