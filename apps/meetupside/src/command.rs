//! Command interpretation: one line in, one response out, against a private cursor.

use std::sync::Arc;

use chrono::Local;
use gathering::Record;
use rand::Rng;
use rand::seq::SliceRandom;
use roomgraph::{Direction, RoomId};

use crate::render;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    What,
    Look,
    Go(Direction),
    Down,
    Up,
    Save,
    Quit,
    /// Anything unrecognized, including an empty line.
    Other,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim().to_uppercase().as_str() {
            "HELP" | "?" => Command::Help,
            "WHAT" => Command::What,
            "LOOK" | "L" => Command::Look,
            "DOWN" | "D" => Command::Down,
            "UP" | "U" => Command::Up,
            "SAVE" => Command::Save,
            "QUIT" | "Q" => Command::Quit,
            other => Direction::parse(other).map_or(Command::Other, Command::Go),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Mirrored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub room: RoomId,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    /// Send the text, then close the connection.
    Hangup(String),
}

/// Per-session state machine over the shared world.
pub struct Interpreter<R> {
    world: Arc<World>,
    cursor: Cursor,
    rng: R,
}

impl<R: Rng + Send> Interpreter<R> {
    pub fn new(world: Arc<World>, rng: R) -> Self {
        let room = world.graph.root();
        Self {
            world,
            cursor: Cursor {
                room,
                mode: Mode::Normal,
            },
            rng,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn greeting(&self) -> String {
        let mut s = render::BANNER.to_string();
        s.push_str(&render::room(self.record(), &Local::now()));
        s
    }

    pub async fn handle(&mut self, line: &str) -> Outcome {
        let text = match Command::parse(line) {
            Command::Help => render::help().to_string(),
            Command::What => self.what().await,
            Command::Look => self.look().await,
            Command::Go(dir) => self.go(dir),
            Command::Down => match self.cursor.mode {
                Mode::Mirrored => render::CANT_GO.to_string(),
                Mode::Normal => {
                    self.cursor.mode = Mode::Mirrored;
                    render::ENTER_MIRROR.to_string() + &self.mirrored().await
                }
            },
            Command::Up => match self.cursor.mode {
                Mode::Normal => render::CANT_GO.to_string(),
                Mode::Mirrored => {
                    self.cursor.mode = Mode::Normal;
                    render::LEAVE_MIRROR.to_string() + &self.describe()
                }
            },
            Command::Save => match self.cursor.mode {
                Mode::Normal => render::NOTHING_TO_SAVE.to_string(),
                Mode::Mirrored => {
                    self.cursor.mode = Mode::Normal;
                    render::RESCUE.to_string() + &self.describe()
                }
            },
            Command::Quit => return Outcome::Hangup(render::FAREWELL.to_string()),
            Command::Other => match self.cursor.mode {
                Mode::Normal => self.describe(),
                Mode::Mirrored => self.mirrored().await,
            },
        };
        Outcome::Reply(text)
    }

    fn record(&self) -> &Record {
        self.world.graph.room(self.cursor.room).record()
    }

    fn describe(&self) -> String {
        render::room(self.record(), &Local::now())
    }

    async fn mirrored(&self) -> String {
        let record = self.record();
        let view = self.world.mirror.mirror_view(&record.group.urlname).await;
        render::mirrored(record, view.as_deref().ok())
    }

    fn go(&mut self, dir: Direction) -> String {
        match self.world.graph.exit(self.cursor.room, dir) {
            Some(to) => {
                self.cursor.room = to;
                self.describe()
            }
            None => render::CANT_GO.to_string(),
        }
    }

    async fn look(&self) -> String {
        let room = self.world.graph.room(self.cursor.room);
        let exits = room.exits().map(|(d, _)| d).collect::<Vec<_>>();
        let mut s = match self.cursor.mode {
            Mode::Normal => render::placard(room.record()),
            Mode::Mirrored => self.mirrored().await,
        };
        s.push_str(&render::exits(&exits));
        s
    }

    async fn what(&mut self) -> String {
        let world = self.world.clone();
        let record = world.graph.room(self.cursor.room).record();
        match self.cursor.mode {
            Mode::Normal => match record.rsvps.choose(&mut self.rng) {
                Some(rsvp) => render::what(rsvp.member.name.trim(), record.name.trim()),
                None => render::NO_ONE_TO_ASK.to_string(),
            },
            Mode::Mirrored => match world.mirror.mirror_view(&record.group.urlname).await {
                Ok(members) => match members.choose(&mut self.rng) {
                    Some(m) => render::mirror_what(m.name.trim(), record.place()),
                    None => render::NO_ONE_TO_ASK.to_string(),
                },
                Err(_) => render::STATIC_ANSWERS.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use gathering::{
        FixtureSource, Group, GroupProfile, MemberSource, Participant, Rsvp, RsvpMember,
        SourceError, Venue,
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use roomgraph::Placement;

    use super::*;
    use crate::mirror::MirrorProvider;

    struct StraightNorth;

    impl Placement for StraightNorth {
        fn choose_exit(&mut self, _free: usize) -> usize {
            0
        }

        fn advance(&mut self) -> bool {
            true
        }
    }

    struct Unreachable;

    #[async_trait]
    impl MemberSource for Unreachable {
        async fn fetch_participants(&self, g: &str) -> Result<Vec<Participant>, SourceError> {
            Err(SourceError::Status {
                url: format!("http://meetup.invalid/{g}/members"),
                status: 502,
            })
        }
    }

    fn event(id: &str, attendees: &[&str]) -> Record {
        Record {
            id: id.to_string(),
            name: format!("{id} Night"),
            description: format!("All about {id}."),
            rsvps: attendees
                .iter()
                .map(|n| Rsvp {
                    id: 0,
                    member: RsvpMember {
                        id: 0,
                        name: n.to_string(),
                    },
                })
                .collect(),
            rsvp_count: attendees.len() as u32,
            group: Group {
                urlname: "grp".to_string(),
                ..Group::default()
            },
            venue: Venue {
                name: format!("{id} Hall"),
                ..Venue::default()
            },
            ..Record::default()
        }
    }

    fn members() -> HashMap<String, Vec<Participant>> {
        let ms: Vec<Participant> = [("A", 5), ("B", 1), ("C", 9), ("D", 3)]
            .into_iter()
            .enumerate()
            .map(|(i, (name, visited))| Participant {
                id: i as u64,
                name: name.to_string(),
                group_profile: GroupProfile { visited },
            })
            .collect();
        HashMap::from([("grp".to_string(), ms)])
    }

    fn line_world(source: Arc<dyn MemberSource>) -> Arc<World> {
        let records = vec![
            event("E1", &["Ada", "Grace"]),
            event("E2", &[]),
            event("E3", &["Linus"]),
        ];
        let graph = roomgraph::build(records, &mut StraightNorth).unwrap();
        Arc::new(World::new(graph, MirrorProvider::new(source)))
    }

    fn world() -> Arc<World> {
        line_world(Arc::new(FixtureSource::new(Vec::new(), members())))
    }

    fn session(world: &Arc<World>) -> Interpreter<StdRng> {
        Interpreter::new(world.clone(), StdRng::seed_from_u64(7))
    }

    async fn reply(s: &mut Interpreter<StdRng>, line: &str) -> String {
        match s.handle(line).await {
            Outcome::Reply(t) => t,
            Outcome::Hangup(t) => panic!("unexpected hangup: {t}"),
        }
    }

    fn place(w: &World, c: Cursor) -> &str {
        w.graph.room(c.room).record().place()
    }

    #[test]
    fn parses_commands_and_shorthand() {
        assert_eq!(Command::parse("  help "), Command::Help);
        assert_eq!(Command::parse("?"), Command::Help);
        assert_eq!(Command::parse("look"), Command::Look);
        assert_eq!(Command::parse("L"), Command::Look);
        assert_eq!(Command::parse("n"), Command::Go(Direction::North));
        assert_eq!(Command::parse("West"), Command::Go(Direction::West));
        assert_eq!(Command::parse("d"), Command::Down);
        assert_eq!(Command::parse("u"), Command::Up);
        assert_eq!(Command::parse("save"), Command::Save);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse(""), Command::Other);
        assert_eq!(Command::parse("dance"), Command::Other);
    }

    #[tokio::test]
    async fn greeting_shows_the_root() {
        let w = world();
        let s = session(&w);
        let g = s.greeting();
        assert!(g.starts_with(render::BANNER));
        assert!(g.contains("You're at E1 Hall.\r\n"));
        assert!(g.contains("Ada and Grace are here.\r\n"));
    }

    #[tokio::test]
    async fn missing_exit_leaves_cursor_in_place() {
        let w = world();
        let mut s = session(&w);
        let before = s.cursor();
        for dir in ["south", "e", "WEST"] {
            assert_eq!(reply(&mut s, dir).await, render::CANT_GO);
            assert_eq!(s.cursor(), before);
        }
    }

    #[tokio::test]
    async fn walks_the_line_and_back() {
        let w = world();
        let mut s = session(&w);
        let root = s.cursor().room;

        assert!(reply(&mut s, "NORTH").await.contains("You're at E2 Hall."));
        assert!(reply(&mut s, "north").await.contains("You're at E3 Hall."));
        assert_eq!(reply(&mut s, "north").await, render::CANT_GO);
        assert!(reply(&mut s, "SOUTH").await.contains("You're at E2 Hall."));
        assert!(reply(&mut s, "s").await.contains("You're at E1 Hall."));
        assert_eq!(s.cursor().room, root);
    }

    #[tokio::test]
    async fn exit_then_opposite_returns_home() {
        let records = (0..30).map(|i| event(&format!("R{i}"), &[])).collect::<Vec<_>>();
        for seed in 0..20 {
            let graph = roomgraph::build(records.clone(), &mut StdRng::seed_from_u64(seed)).unwrap();
            let w = Arc::new(World::new(
                graph,
                MirrorProvider::new(Arc::new(FixtureSource::default())),
            ));
            for (id, room) in w.graph.iter() {
                for (dir, _) in room.exits() {
                    let mut s = session(&w);
                    s.cursor.room = id;
                    reply(&mut s, dir.name()).await;
                    assert_ne!(s.cursor().room, id);
                    reply(&mut s, dir.opposite().name()).await;
                    assert_eq!(s.cursor().room, id, "seed={seed} dir={dir}");
                }
            }
        }
    }

    #[tokio::test]
    async fn down_twice_is_rejected_and_save_escapes() {
        let w = world();
        let mut s = session(&w);

        let down = reply(&mut s, "down").await;
        assert!(down.starts_with(render::ENTER_MIRROR));
        assert!(down.contains("You're in the upside down E1 Hall.\r\n"));
        assert!(down.contains("B, D, A and C are here and very inactive.\r\n"));
        assert_eq!(s.cursor().mode, Mode::Mirrored);

        assert_eq!(reply(&mut s, "d").await, render::CANT_GO);
        assert_eq!(s.cursor().mode, Mode::Mirrored);

        let saved = reply(&mut s, "save").await;
        assert!(saved.starts_with(render::RESCUE));
        assert!(saved.contains("You're at E1 Hall."));
        assert_eq!(s.cursor().mode, Mode::Normal);
    }

    #[tokio::test]
    async fn up_and_save_need_the_upside_down() {
        let w = world();
        let mut s = session(&w);
        assert_eq!(reply(&mut s, "up").await, render::CANT_GO);
        assert_eq!(reply(&mut s, "save").await, render::NOTHING_TO_SAVE);
        assert_eq!(s.cursor().mode, Mode::Normal);

        reply(&mut s, "down").await;
        let up = reply(&mut s, "U").await;
        assert!(up.starts_with(render::LEAVE_MIRROR));
        assert_eq!(s.cursor().mode, Mode::Normal);
    }

    #[tokio::test]
    async fn unknown_input_echoes_current_view() {
        let w = world();
        let mut s = session(&w);
        assert!(reply(&mut s, "").await.starts_with("You're at E1 Hall."));
        assert!(reply(&mut s, "dance").await.starts_with("You're at E1 Hall."));

        reply(&mut s, "down").await;
        assert!(
            reply(&mut s, "dance")
                .await
                .starts_with("You're in the upside down E1 Hall.")
        );
    }

    #[tokio::test]
    async fn moving_keeps_the_mirror_flag() {
        let w = world();
        let mut s = session(&w);
        reply(&mut s, "down").await;
        assert!(reply(&mut s, "n").await.starts_with("You're at E2 Hall."));
        assert_eq!(s.cursor().mode, Mode::Mirrored);
        assert_eq!(place(&w, s.cursor()), "E2 Hall");
    }

    #[tokio::test]
    async fn look_lists_placard_and_exits() {
        let w = world();
        let mut s = session(&w);
        let look = reply(&mut s, "l").await;
        assert!(look.contains("All about E1.\r\n"));
        assert!(look.ends_with("You can go in the following directions: north\r\n"));

        reply(&mut s, "n").await;
        let look = reply(&mut s, "LOOK").await;
        assert!(look.ends_with("You can go in the following directions: north, south\r\n"));

        reply(&mut s, "down").await;
        let look = reply(&mut s, "look").await;
        assert!(look.starts_with("You're in the upside down E2 Hall."));
        assert!(look.ends_with("You can go in the following directions: north, south\r\n"));
    }

    #[tokio::test]
    async fn what_quotes_someone_present() {
        let w = world();
        let mut s = session(&w);
        for _ in 0..10 {
            let said = reply(&mut s, "what").await;
            assert!(
                said == render::what("Ada", "E1 Night") || said == render::what("Grace", "E1 Night"),
                "{said}"
            );
        }

        reply(&mut s, "n").await;
        assert_eq!(reply(&mut s, "what").await, render::NO_ONE_TO_ASK);

        reply(&mut s, "down").await;
        let said = reply(&mut s, "what").await;
        assert!(said.contains("murmurs"), "{said}");
        assert!(said.contains("E2 Hall"), "{said}");
    }

    #[tokio::test]
    async fn unavailable_mirror_degrades_in_band() {
        let w = line_world(Arc::new(Unreachable));
        let mut s = session(&w);

        let down = reply(&mut s, "down").await;
        assert!(down.contains("Static fills the air"));
        assert_eq!(s.cursor().mode, Mode::Mirrored);
        assert_eq!(reply(&mut s, "what").await, render::STATIC_ANSWERS);
        assert!(reply(&mut s, "save").await.contains("You're at E1 Hall."));
    }

    #[tokio::test]
    async fn sessions_do_not_share_cursors() {
        let w = world();
        let mut a = session(&w);
        let mut b = session(&w);

        reply(&mut b, "n").await;
        reply(&mut b, "n").await;
        reply(&mut b, "down").await;

        assert_eq!(a.cursor().room, w.graph.root());
        assert_eq!(a.cursor().mode, Mode::Normal);
        assert!(reply(&mut a, "").await.starts_with("You're at E1 Hall."));
        assert_eq!(place(&w, b.cursor()), "E3 Hall");
    }

    #[tokio::test]
    async fn quit_hangs_up() {
        let w = world();
        let mut s = session(&w);
        assert_eq!(
            s.handle(" quit ").await,
            Outcome::Hangup(render::FAREWELL.to_string())
        );
    }
}
