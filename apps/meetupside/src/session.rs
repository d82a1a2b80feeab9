use std::net::SocketAddr;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sideio::{Input, LineReader};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::command::{Interpreter, Outcome};
use crate::world::World;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session io: {0}")]
    Io(#[from] std::io::Error),
}

/// Run one client until it quits or its connection fails.
///
/// Only this connection's state lives here; an error ends this session and nothing else.
pub async fn serve<S>(
    stream: S,
    peer: SocketAddr,
    world: Arc<World>,
    max_line_len: usize,
) -> Result<(), SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (rd, mut wr) = tokio::io::split(stream);
    let mut lines = LineReader::new(rd).max_line_len(max_line_len);
    let mut interp = Interpreter::new(world, StdRng::from_entropy());

    info!(peer = %peer, "session started");
    wr.write_all(interp.greeting().as_bytes()).await?;

    loop {
        let line = match lines.read_input().await? {
            Some(Input::Line(line)) => line,
            Some(Input::Negotiation(replies)) => {
                wr.write_all(&replies).await?;
                continue;
            }
            None => {
                info!(peer = %peer, "client disconnected");
                return Ok(());
            }
        };

        let line = String::from_utf8_lossy(&line);
        debug!(peer = %peer, line = %line.trim(), "command");
        match interp.handle(&line).await {
            Outcome::Reply(text) => wr.write_all(text.as_bytes()).await?,
            Outcome::Hangup(text) => {
                wr.write_all(text.as_bytes()).await?;
                wr.shutdown().await?;
                info!(peer = %peer, "client quit");
                return Ok(());
            }
        }
    }
}
