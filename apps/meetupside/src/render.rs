//! Response text. Every line ends in CRLF for telnet clients.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use gathering::{Participant, Record};
use roomgraph::Direction;

pub const BANNER: &str = "Entering Meetupside...\r\n";
pub const CANT_GO: &str = "You can't go that way.\r\n";
pub const ENTER_MIRROR: &str = "Entering the upside down...\r\n";
pub const LEAVE_MIRROR: &str = "Returning to the real world...\r\n";
pub const RESCUE: &str = "Bringing them back to the real world!\r\n";
pub const NOTHING_TO_SAVE: &str =
    "People are already meeting up! There's no one here to save.\r\n";
pub const NO_ONE_TO_ASK: &str = "No one is around to answer.\r\n";
pub const STATIC_ANSWERS: &str = "Only static answers you.\r\n";
pub const FAREWELL: &str = "You blink, and Meetupside fades away.\r\n";

pub fn help() -> &'static str {
    concat!(
        "+=====================================================================+\r\n",
        "|  COMMAND          |  DESCRIPTION                      |  SHORTHAND  |\r\n",
        "|-------------------+-----------------------------------+-------------|\r\n",
        "| LOOK              | Read the placard and find exits   | L           |\r\n",
        "| WHAT              | Ask someone what is happening     |             |\r\n",
        "| NORTH             | Go north                          | N           |\r\n",
        "| EAST              | Go east                           | E           |\r\n",
        "| SOUTH             | Go south                          | S           |\r\n",
        "| WEST              | Go west                           | W           |\r\n",
        "| DOWN              | Slip into the upside down         | D           |\r\n",
        "| UP                | Climb back to the real world      | U           |\r\n",
        "| SAVE              | Bring everyone back up            |             |\r\n",
        "| QUIT              | Leave Meetupside                  | Q           |\r\n",
        "| HELP              | Display this message              | ?           |\r\n",
        "+=====================================================================+\r\n",
    )
}

/// The room as it is in the real world: where, who, and when.
pub fn room<Tz>(record: &Record, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut people = record.attendee_names().map(str::to_string).collect::<Vec<_>>();
    match record.unsampled_count() {
        0 => {}
        1 => people.push("1 other".to_string()),
        n => people.push(format!("{n} others")),
    }

    let mut s = format!("You're at {}.\r\n", record.place());
    s.push_str(&presence(&people, "here"));
    match record.start_time() {
        Some(start) => s.push_str(&start_line(&start.with_timezone(&now.timezone()), now)),
        None => s.push_str("No one knows when this Meetup starts.\r\n"),
    }
    s
}

/// The room's upside down. `None` members means they could not be fetched.
pub fn mirrored(record: &Record, members: Option<&[Participant]>) -> String {
    let mut s = format!("You're in the upside down {}.\r\n", record.place());
    match members {
        None => s.push_str("Static fills the air; you can't make out who is here.\r\n"),
        Some([]) => s.push_str("No one is here, not even the inactive ones.\r\n"),
        Some(ms) => {
            let names = ms.iter().map(|m| m.name.trim().to_string()).collect::<Vec<_>>();
            s.push_str(&presence(&names, "here and very inactive"));
        }
    }
    s
}

pub fn placard(record: &Record) -> String {
    let mut s = String::from(
        "On a posted placard, you see the following text written in barely legible handwriting:\r\n",
    );
    let text = record.description.trim();
    if text.is_empty() {
        s.push_str("(the placard is blank)\r\n");
    } else {
        for line in text.lines() {
            s.push_str(line.trim_end());
            s.push_str("\r\n");
        }
    }
    s
}

pub fn exits(dirs: &[Direction]) -> String {
    if dirs.is_empty() {
        return "\r\nThere are no visible exits.\r\n".to_string();
    }
    let names = dirs.iter().map(|d| d.name()).collect::<Vec<_>>();
    format!(
        "\r\nYou can go in the following directions: {}\r\n",
        names.join(", ")
    )
}

pub fn what(speaker: &str, title: &str) -> String {
    format!("{speaker} says: \"This is {title}. Care to join?\"\r\n")
}

pub fn mirror_what(speaker: &str, place: &str) -> String {
    format!("{speaker} murmurs: \"No one has come to {place} in a long time.\"\r\n")
}

fn presence(names: &[String], whereabouts: &str) -> String {
    match names {
        [] => "No one is here.\r\n".to_string(),
        [one] if !one.ends_with("others") => format!("{one} is {whereabouts}.\r\n"),
        _ => format!("{} are {whereabouts}.\r\n", join_names(names)),
    }
}

/// "A", "A and B", "A, B and C".
pub fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

fn start_line<Tz>(start: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if start < now {
        format!("This Meetup started at {}.\r\n", start.format("%-I:%M%P"))
    } else if start.date_naive() == now.date_naive() {
        format!("This Meetup is starting at {}.\r\n", start.format("%-I:%M%P"))
    } else {
        format!(
            "This Meetup is happening {}.\r\n",
            start.format("%A, %B %d, %Y at %-I:%M%P")
        )
    }
}
