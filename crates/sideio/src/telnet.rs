//! Telnet IAC filtering.
//!
//! Everything that is not plain data is dropped. Option negotiation is refused:
//! - `IAC DO <opt>`   => `IAC WONT <opt>`
//! - `IAC WILL <opt>` => `IAC DONT <opt>`
//!
//! Subnegotiation blocks (`IAC SB ... IAC SE`) are skipped whole.

use bytes::BytesMut;

const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250;
const SE: u8 = 240;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum State {
    #[default]
    Data,
    Iac,
    Option(u8),
    Sub,
    SubIac,
}

/// Streaming filter; state carries over between chunks so sequences may be split
/// across reads.
#[derive(Debug, Default)]
pub struct IacFilter {
    state: State,
}

impl IacFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the data bytes of `chunk` to `data` and any negotiation replies to `replies`.
    pub fn feed(&mut self, chunk: &[u8], data: &mut BytesMut, replies: &mut Vec<u8>) {
        for &b in chunk {
            self.state = match self.state {
                State::Data if b == IAC => State::Iac,
                State::Data => {
                    data.extend_from_slice(&[b]);
                    State::Data
                }
                State::Iac => match b {
                    IAC => {
                        data.extend_from_slice(&[IAC]);
                        State::Data
                    }
                    DO | DONT | WILL | WONT => State::Option(b),
                    SB => State::Sub,
                    // NOP, GA, AYT and friends carry no option byte.
                    _ => State::Data,
                },
                State::Option(cmd) => {
                    match cmd {
                        DO => replies.extend_from_slice(&[IAC, WONT, b]),
                        WILL => replies.extend_from_slice(&[IAC, DONT, b]),
                        _ => {}
                    }
                    State::Data
                }
                State::Sub if b == IAC => State::SubIac,
                State::Sub => State::Sub,
                State::SubIac if b == SE => State::Data,
                State::SubIac => State::Sub,
            };
        }
    }
}
