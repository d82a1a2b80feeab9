use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use gathering::MeetupConfig;
use gathering::meetup::API_BASE_DEFAULT;

const BIND_DEFAULT: &str = "0.0.0.0:2002";
const MAX_LINE_DEFAULT: usize = 1024;
const HTTP_TIMEOUT_S_DEFAULT: u64 = 10;

pub const USAGE: &str = "meetupside (text adventure over your Meetup calendar)\n\n\
USAGE:\n  meetupside [--bind HOST:PORT] [--fixture PATH] [--seed N]\n\n\
ENV:\n  MEETUPSIDE_BIND          default 0.0.0.0:2002\n  MEETUP_API_KEY           required unless a fixture is used\n  MEETUP_API_BASE          default https://api.meetup.com\n  MEETUP_HTTP_TIMEOUT_S    default 10\n  MEETUPSIDE_FIXTURE       optional; JSON file with events and members (no API calls)\n  MEETUPSIDE_SEED          optional; fixed seed for the room layout\n  MEETUPSIDE_MAX_LINE      default 1024 (bytes per input line)\n";

#[derive(Clone, Debug)]
pub enum SourceConfig {
    Meetup(MeetupConfig),
    Fixture(PathBuf),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind: SocketAddr,
    pub source: SourceConfig,
    pub seed: Option<u64>,
    pub max_line_len: usize,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("help requested")]
    Help,
    #[error("bad value for {name}: {value:?}")]
    BadValue { name: &'static str, value: String },
    #[error("missing value after {0}")]
    MissingValue(String),
    #[error("unknown argument {0:?}")]
    UnknownArg(String),
    #[error("MEETUP_API_KEY is not set (or use MEETUPSIDE_FIXTURE)")]
    MissingKey,
}

pub fn usage_and_exit(err: &ConfigError) -> ! {
    if *err != ConfigError::Help {
        eprintln!("error: {err}\n");
    }
    eprintln!("{USAGE}");
    std::process::exit(2);
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::BadValue { name, value })
}

fn flag_value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, ConfigError> {
    it.next()
        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

/// Environment first, then command line flags on top.
pub fn parse<E, A>(env: E, args: A) -> Result<Config, ConfigError>
where
    E: Fn(&str) -> Option<String>,
    A: IntoIterator<Item = String>,
{
    let var = |k: &str| env(k).filter(|v| !v.trim().is_empty());

    let mut bind: SocketAddr = parse_value(
        "MEETUPSIDE_BIND",
        var("MEETUPSIDE_BIND").unwrap_or_else(|| BIND_DEFAULT.to_string()),
    )?;
    let mut fixture = var("MEETUPSIDE_FIXTURE").map(PathBuf::from);
    let mut seed = var("MEETUPSIDE_SEED")
        .map(|v| parse_value("MEETUPSIDE_SEED", v))
        .transpose()?;
    let max_line_len = var("MEETUPSIDE_MAX_LINE")
        .map(|v| parse_value("MEETUPSIDE_MAX_LINE", v))
        .transpose()?
        .unwrap_or(MAX_LINE_DEFAULT)
        .max(1);
    let timeout_s: u64 = var("MEETUP_HTTP_TIMEOUT_S")
        .map(|v| parse_value("MEETUP_HTTP_TIMEOUT_S", v))
        .transpose()?
        .unwrap_or(HTTP_TIMEOUT_S_DEFAULT);

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--bind" => bind = parse_value("--bind", flag_value(&mut it, &arg)?)?,
            "--fixture" => fixture = Some(PathBuf::from(flag_value(&mut it, &arg)?)),
            "--seed" => seed = Some(parse_value("--seed", flag_value(&mut it, &arg)?)?),
            "-h" | "--help" => return Err(ConfigError::Help),
            _ => return Err(ConfigError::UnknownArg(arg)),
        }
    }

    let source = match fixture {
        Some(path) => SourceConfig::Fixture(path),
        None => {
            let key = var("MEETUP_API_KEY").ok_or(ConfigError::MissingKey)?;
            let mut m = MeetupConfig::new(key.trim());
            m.api_base = var("MEETUP_API_BASE").unwrap_or_else(|| API_BASE_DEFAULT.to_string());
            m.timeout = Duration::from_secs(timeout_s.max(1));
            SourceConfig::Meetup(m)
        }
    };

    Ok(Config {
        bind,
        source,
        seed,
        max_line_len,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn run(env: &[(&str, &str)], args: &[&str]) -> Result<Config, ConfigError> {
        let env = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        parse(
            |k| env.get(k).cloned(),
            args.iter().map(|a| a.to_string()),
        )
    }

    #[test]
    fn defaults_with_api_key() {
        let cfg = run(&[("MEETUP_API_KEY", " abc ")], &[]).unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:2002".parse().unwrap());
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.max_line_len, 1024);
        let SourceConfig::Meetup(m) = cfg.source else {
            panic!("expected meetup source");
        };
        assert_eq!(m.api_key, "abc");
        assert_eq!(m.api_base, API_BASE_DEFAULT);
        assert_eq!(m.timeout, Duration::from_secs(10));
    }

    #[test]
    fn key_is_required_without_fixture() {
        assert_eq!(run(&[], &[]).unwrap_err(), ConfigError::MissingKey);
        assert_eq!(
            run(&[("MEETUP_API_KEY", "  ")], &[]).unwrap_err(),
            ConfigError::MissingKey
        );
    }

    #[test]
    fn fixture_needs_no_key() {
        let cfg = run(&[("MEETUPSIDE_FIXTURE", "world.json")], &[]).unwrap();
        assert!(matches!(cfg.source, SourceConfig::Fixture(p) if p == PathBuf::from("world.json")));
    }

    #[test]
    fn flags_override_env() {
        let cfg = run(
            &[
                ("MEETUPSIDE_BIND", "127.0.0.1:1"),
                ("MEETUPSIDE_SEED", "1"),
                ("MEETUPSIDE_MAX_LINE", "64"),
            ],
            &["--bind", "127.0.0.1:4000", "--seed", "99", "--fixture", "f.json"],
        )
        .unwrap();
        assert_eq!(cfg.bind, "127.0.0.1:4000".parse().unwrap());
        assert_eq!(cfg.seed, Some(99));
        assert_eq!(cfg.max_line_len, 64);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            run(&[("MEETUPSIDE_FIXTURE", "f"), ("MEETUPSIDE_SEED", "x")], &[]),
            Err(ConfigError::BadValue { name: "MEETUPSIDE_SEED", .. })
        ));
        assert_eq!(
            run(&[("MEETUPSIDE_FIXTURE", "f")], &["--seed"]).unwrap_err(),
            ConfigError::MissingValue("--seed".to_string())
        );
        assert_eq!(
            run(&[("MEETUPSIDE_FIXTURE", "f")], &["--port"]).unwrap_err(),
            ConfigError::UnknownArg("--port".to_string())
        );
        assert_eq!(
            run(&[], &["--help"]).unwrap_err(),
            ConfigError::Help
        );
    }
}
