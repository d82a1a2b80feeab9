//! `gathering`: the records a meetupside world is built from.
//!
//! Types mirror the Meetup API JSON closely enough to decode it directly; anything the
//! API may omit decodes to an empty default so a sparse event still becomes a room.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod fixture;
pub mod meetup;
pub mod source;

pub use fixture::FixtureSource;
pub use meetup::{MeetupClient, MeetupConfig};
pub use source::{EventSource, MemberSource, SourceError};

/// One scheduled gathering. Becomes exactly one room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "plain_text_description")]
    pub description: String,
    #[serde(default, rename = "rsvp_sample")]
    pub rsvps: Vec<Rsvp>,
    #[serde(default, rename = "yes_rsvp_count")]
    pub rsvp_count: u32,
    /// Start time, unix milliseconds.
    #[serde(default, rename = "time")]
    pub start_ms: i64,
    #[serde(default)]
    pub group: Group,
    #[serde(default)]
    pub venue: Venue,
}

impl Record {
    /// `None` when the source left the start time out.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        if self.start_ms == 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.start_ms)
    }

    /// Where the gathering happens, falling back to its own title when no venue is set.
    pub fn place(&self) -> &str {
        let venue = self.venue.name.trim();
        if venue.is_empty() {
            self.name.trim()
        } else {
            venue
        }
    }

    /// Trimmed names of the sampled attendees, in sample order.
    pub fn attendee_names(&self) -> impl Iterator<Item = &str> {
        self.rsvps.iter().map(|r| r.member.name.trim())
    }

    /// Confirmed attendees not covered by the sample.
    pub fn unsampled_count(&self) -> u32 {
        self.rsvp_count.saturating_sub(self.rsvps.len() as u32)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rsvp {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub member: RsvpMember,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpMember {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Group identifier used for member lookups.
    #[serde(default)]
    pub urlname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip: String,
}

/// A group member as seen by the mirror dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub group_profile: GroupProfile,
}

impl Participant {
    /// Last visit to the group, unix milliseconds. Zero when unknown.
    pub fn last_visited(&self) -> i64 {
        self.group_profile.visited
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProfile {
    #[serde(default)]
    pub visited: i64,
}
