use rand::Rng;
use tracing::{debug, warn};

use crate::graph::{Direction, RoomGraph, RoomId};

/// Chance that the builder moves on to the room it just placed instead of branching
/// again from the same room.
pub const ADVANCE_PROBABILITY: f64 = 0.75;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("cannot build a room graph from zero records")]
    EmptyInput,
}

/// Source of the builder's random decisions.
///
/// Every `rand::Rng` is a `Placement`; tests can implement it directly to force a shape.
pub trait Placement {
    /// Index into the current room's free exits (N, E, S, W order), `0..free`.
    fn choose_exit(&mut self, free: usize) -> usize;

    /// Whether to move on to the newly placed room.
    fn advance(&mut self) -> bool;
}

impl<R: Rng + ?Sized> Placement for R {
    fn choose_exit(&mut self, free: usize) -> usize {
        self.gen_range(0..free)
    }

    fn advance(&mut self) -> bool {
        self.gen_bool(ADVANCE_PROBABILITY)
    }
}

/// Grow a graph from `records`; the first record becomes the root.
///
/// Each following record is hung off the builder's current room through a random free
/// exit, with the opposite exit pointing back. The builder then moves to the new room
/// (always, if the current room just used its last free exit), otherwise it stays and
/// the next record branches from the same room.
pub fn build<T, I, P>(records: I, placement: &mut P) -> Result<RoomGraph<T>, BuildError>
where
    I: IntoIterator<Item = T>,
    P: Placement + ?Sized,
{
    let mut records = records.into_iter();
    let first = records.next().ok_or(BuildError::EmptyInput)?;

    let mut graph = RoomGraph::with_root(first);
    let mut current = graph.root();
    for record in records {
        let room = graph.push(record);
        let free = graph.room(current).free_exits();
        place(&mut graph, current, room, &free, placement);

        // Always drawn so the random stream is consumed the same way on every step.
        let advance = placement.advance();
        if advance || free.len() <= 1 {
            current = room;
        }
    }

    debug!(
        rooms = graph.len(),
        reachable = graph.reachable(),
        "room graph built"
    );
    Ok(graph)
}

fn place<T, P>(
    graph: &mut RoomGraph<T>,
    current: RoomId,
    room: RoomId,
    free: &[Direction],
    placement: &mut P,
) where
    P: Placement + ?Sized,
{
    if free.is_empty() {
        warn!(
            current = current.index(),
            room = room.index(),
            "current room has no free exit; new room left unlinked"
        );
        return;
    }
    let i = placement.choose_exit(free.len()).min(free.len() - 1);
    graph.link(current, free[i], room);
}
