//! `roomgraph`: a compass-linked graph of rooms grown from a linear sequence of records.
//!
//! Rooms live in an arena and refer to each other by `RoomId`. A graph is only ever
//! produced by [`build`]; once returned nothing can relink or remove a room, so it can
//! be shared across tasks behind an `Arc` without locking.

pub mod builder;
pub mod graph;

pub use builder::{ADVANCE_PROBABILITY, BuildError, Placement, build};
pub use graph::{Direction, Room, RoomGraph, RoomId};
