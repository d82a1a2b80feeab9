//! `sideio`: line transport for text sessions.
//!
//! - newline framing over any `AsyncRead`, with one buffer kept for the whole connection,
//! - telnet IAC filtering, so raw `telnet` clients and `nc` both work.

pub mod line;
pub mod telnet;

pub use line::{Input, LineReader};
pub use telnet::IacFilter;
