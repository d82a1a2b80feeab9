//! Meetup REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::source::{EventSource, MemberSource, SourceError};
use crate::{Participant, Record};

pub const API_BASE_DEFAULT: &str = "https://api.meetup.com";

const EVENT_FIELDS: &[&str] = &[
    "plain_text_description",
    "id",
    "name",
    "rsvp_sample",
    "time",
    "venue",
    "yes_rsvp_count",
    "group",
];
const MEMBER_FIELDS: &[&str] = &["group_profile", "id", "name"];

#[derive(Clone, Debug)]
pub struct MeetupConfig {
    pub api_base: String,
    pub api_key: String,
    pub timeout: Duration,
    pub event_page: u32,
    pub member_page: u32,
}

impl MeetupConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: API_BASE_DEFAULT.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
            event_page: 20,
            member_page: 100,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MeetupClient {
    http: reqwest::Client,
    cfg: MeetupConfig,
}

impl MeetupClient {
    pub fn new(cfg: MeetupConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|source| SourceError::Http {
                url: cfg.api_base.clone(),
                source,
            })?;
        Ok(Self { http, cfg })
    }

    fn calendar_url(&self) -> String {
        format!("{}/self/calendar", self.cfg.api_base.trim_end_matches('/'))
    }

    fn members_url(&self, urlname: &str) -> String {
        format!(
            "{}/{}/members",
            self.cfg.api_base.trim_end_matches('/'),
            urlname.trim()
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        fields: &[&str],
        page: u32,
    ) -> Result<T, SourceError> {
        let fields = fields.join(",");
        let page = page.to_string();
        let query = [
            ("key", self.cfg.api_key.as_str()),
            ("fields", fields.as_str()),
            ("only", fields.as_str()),
            ("page", page.as_str()),
        ];

        debug!(url = %url, "meetup request");
        let resp = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|source| SourceError::Http {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            warn!(url = %url, status = status.as_u16(), "meetup request rejected");
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|source| SourceError::Decode { url, source })
    }
}

#[async_trait]
impl EventSource for MeetupClient {
    async fn fetch_records(&self) -> Result<Vec<Record>, SourceError> {
        self.get_json(self.calendar_url(), EVENT_FIELDS, self.cfg.event_page)
            .await
    }
}

#[async_trait]
impl MemberSource for MeetupClient {
    async fn fetch_participants(&self, group_id: &str) -> Result<Vec<Participant>, SourceError> {
        self.get_json(
            self.members_url(group_id),
            MEMBER_FIELDS,
            self.cfg.member_page,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls_without_the_key() {
        let mut cfg = MeetupConfig::new("secret");
        cfg.api_base = "http://127.0.0.1:9/".to_string();
        let c = MeetupClient::new(cfg).unwrap();

        assert_eq!(c.calendar_url(), "http://127.0.0.1:9/self/calendar");
        assert_eq!(c.members_url(" rust-nyc "), "http://127.0.0.1:9/rust-nyc/members");
        assert!(!c.calendar_url().contains("secret"));
    }

    #[tokio::test]
    async fn unreachable_api_is_a_source_error() {
        let mut cfg = MeetupConfig::new("k");
        // Port 9 (discard) on loopback is closed in test environments.
        cfg.api_base = "http://127.0.0.1:9".to_string();
        cfg.timeout = Duration::from_secs(2);
        let c = MeetupClient::new(cfg).unwrap();

        let err = c.fetch_records().await.unwrap_err();
        assert!(matches!(err, SourceError::Http { .. }));
    }
}
