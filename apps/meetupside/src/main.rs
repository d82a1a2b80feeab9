mod command;
mod config;
mod mirror;
mod render;
mod session;
mod world;

use std::sync::Arc;

use anyhow::Context;
use gathering::{EventSource, FixtureSource, MeetupClient, MemberSource};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::net::TcpListener;
use tracing::{Level, info, warn};

use crate::config::{Config, SourceConfig};
use crate::mirror::MirrorProvider;
use crate::world::World;

fn parse_args() -> Config {
    config::parse(|k| std::env::var(k).ok(), std::env::args().skip(1))
        .unwrap_or_else(|e| config::usage_and_exit(&e))
}

fn open_sources(
    source: &SourceConfig,
) -> anyhow::Result<(Arc<dyn EventSource>, Arc<dyn MemberSource>)> {
    match source {
        SourceConfig::Fixture(path) => {
            let fixture = Arc::new(FixtureSource::load(path)?);
            info!(path = %path.display(), "using fixture data");
            let events: Arc<dyn EventSource> = fixture.clone();
            let members: Arc<dyn MemberSource> = fixture;
            Ok((events, members))
        }
        SourceConfig::Meetup(cfg) => {
            let client = Arc::new(MeetupClient::new(cfg.clone())?);
            info!(api_base = %cfg.api_base, "using meetup api");
            let events: Arc<dyn EventSource> = client.clone();
            let members: Arc<dyn MemberSource> = client;
            Ok((events, members))
        }
    }
}

async fn load_world(cfg: &Config) -> anyhow::Result<World> {
    let (events, members) = open_sources(&cfg.source)?;

    let records = events
        .fetch_records()
        .await
        .context("fetch calendar events")?;
    if records.is_empty() {
        anyhow::bail!("calendar has no upcoming events; nothing to build a world from");
    }

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let graph = roomgraph::build(records, &mut rng).context("build room graph")?;
    info!(
        rooms = graph.len(),
        reachable = graph.reachable(),
        seed = ?cfg.seed,
        "world built"
    );

    Ok(World::new(graph, MirrorProvider::new(members)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,meetupside=info".into()),
        )
        .with_target(false)
        .with_max_level(Level::INFO)
        .init();

    let cfg = parse_args();
    let world = Arc::new(load_world(&cfg).await?);

    let listener = TcpListener::bind(cfg.bind)
        .await
        .with_context(|| format!("bind {}", cfg.bind))?;
    info!(bind = %cfg.bind, max_line = cfg.max_line_len, "meetupside listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(err = %e, "accept failed");
                continue;
            }
        };
        let world = world.clone();
        let max_line_len = cfg.max_line_len;
        tokio::spawn(async move {
            if let Err(e) = session::serve(stream, peer, world, max_line_len).await {
                warn!(peer = %peer, err = %e, "session ended with error");
            }
        });
    }
}
