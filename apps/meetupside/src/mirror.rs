use std::sync::Arc;

use gathering::{MemberSource, Participant, SourceError};
use tracing::{debug, warn};

/// How many members the upside down shows per room.
pub const MIRROR_LIMIT: usize = 10;

/// Members of a room's group, least recently active first.
#[derive(Clone)]
pub struct MirrorProvider {
    source: Arc<dyn MemberSource>,
}

impl MirrorProvider {
    pub fn new(source: Arc<dyn MemberSource>) -> Self {
        Self { source }
    }

    pub async fn mirror_view(&self, group_id: &str) -> Result<Vec<Participant>, SourceError> {
        if group_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        match self.source.fetch_participants(group_id).await {
            Ok(members) => {
                debug!(group = %group_id, members = members.len(), "mirror members fetched");
                Ok(most_inactive(members, MIRROR_LIMIT))
            }
            Err(e) => {
                warn!(group = %group_id, err = %e, "mirror members unavailable");
                Err(e)
            }
        }
    }
}

/// Ascending by last visit; equal visits keep their input order.
pub fn most_inactive(mut members: Vec<Participant>, limit: usize) -> Vec<Participant> {
    members.sort_by_key(Participant::last_visited);
    members.truncate(limit);
    members
}
