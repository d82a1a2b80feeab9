use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed scan order used everywhere exits are listed or chosen from.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }

    /// Accepts the full name or its one-letter shorthand, any case.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Some(Direction::North),
            "east" | "e" => Some(Direction::East),
            "south" | "s" => Some(Direction::South),
            "west" | "w" => Some(Direction::West),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle to a room inside one [`RoomGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub(crate) usize);

impl RoomId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Room<T> {
    record: T,
    exits: [Option<RoomId>; 4],
}

impl<T> Room<T> {
    fn new(record: T) -> Self {
        Self {
            record,
            exits: [None; 4],
        }
    }

    pub fn record(&self) -> &T {
        &self.record
    }

    pub fn exit(&self, dir: Direction) -> Option<RoomId> {
        self.exits[dir.slot()]
    }

    /// Linked exits in N, E, S, W order.
    pub fn exits(&self) -> impl Iterator<Item = (Direction, RoomId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.exit(d).map(|to| (d, to)))
    }

    /// Unlinked exits in N, E, S, W order.
    pub fn free_exits(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.exit(*d).is_none())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RoomGraph<T> {
    rooms: Vec<Room<T>>,
}

impl<T> RoomGraph<T> {
    pub(crate) fn with_root(record: T) -> Self {
        Self {
            rooms: vec![Room::new(record)],
        }
    }

    pub(crate) fn push(&mut self, record: T) -> RoomId {
        self.rooms.push(Room::new(record));
        RoomId(self.rooms.len() - 1)
    }

    /// Link `from --dir--> to` and `to --opposite--> from`. Both slots must be empty.
    pub(crate) fn link(&mut self, from: RoomId, dir: Direction, to: RoomId) {
        debug_assert!(self.rooms[from.0].exits[dir.slot()].is_none());
        debug_assert!(self.rooms[to.0].exits[dir.opposite().slot()].is_none());
        self.rooms[from.0].exits[dir.slot()] = Some(to);
        self.rooms[to.0].exits[dir.opposite().slot()] = Some(from);
    }

    pub fn root(&self) -> RoomId {
        RoomId(0)
    }

    /// Panics if `id` came from a different graph with more rooms.
    pub fn room(&self, id: RoomId) -> &Room<T> {
        &self.rooms[id.0]
    }

    pub fn get(&self, id: RoomId) -> Option<&Room<T>> {
        self.rooms.get(id.0)
    }

    pub fn exit(&self, from: RoomId, dir: Direction) -> Option<RoomId> {
        self.get(from)?.exit(dir)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &Room<T>)> {
        self.rooms.iter().enumerate().map(|(i, r)| (RoomId(i), r))
    }

    /// Number of rooms a walker starting at the root can reach, root included.
    pub fn reachable(&self) -> usize {
        let mut seen = vec![false; self.rooms.len()];
        let mut queue = VecDeque::from([self.root()]);
        seen[0] = true;
        let mut n = 0;
        while let Some(id) = queue.pop_front() {
            n += 1;
            for (_, to) in self.room(id).exits() {
                if !seen[to.0] {
                    seen[to.0] = true;
                    queue.push_back(to);
                }
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_pair_up() {
        for d in Direction::ALL {
            assert_ne!(d, d.opposite());
            assert_eq!(d, d.opposite().opposite());
        }
    }

    #[test]
    fn parses_names_and_shorthand() {
        assert_eq!(Direction::parse("N"), Some(Direction::North));
        assert_eq!(Direction::parse(" west "), Some(Direction::West));
        assert_eq!(Direction::parse("Sout"), None);
        assert_eq!(Direction::parse("up"), None);
    }

    #[test]
    fn link_is_symmetric() {
        let mut g = RoomGraph::with_root("a");
        let b = g.push("b");
        g.link(g.root(), Direction::East, b);

        assert_eq!(g.exit(g.root(), Direction::East), Some(b));
        assert_eq!(g.exit(b, Direction::West), Some(g.root()));
        assert_eq!(
            g.room(g.root()).free_exits(),
            vec![Direction::North, Direction::South, Direction::West]
        );
        assert_eq!(g.reachable(), 2);
    }

    #[test]
    fn unlinked_room_is_not_reachable() {
        let mut g = RoomGraph::with_root("a");
        let b = g.push("b");
        g.push("c");
        g.link(g.root(), Direction::North, b);

        assert_eq!(g.len(), 3);
        assert_eq!(g.reachable(), 2);
    }
}
