use gathering::Record;
use roomgraph::RoomGraph;

use crate::mirror::MirrorProvider;

/// Everything sessions share. Read-only once the server starts accepting.
pub struct World {
    pub graph: RoomGraph<Record>,
    pub mirror: MirrorProvider,
}

impl World {
    pub fn new(graph: RoomGraph<Record>, mirror: MirrorProvider) -> Self {
        Self { graph, mirror }
    }
}
