//! Command-line flags understood by the settings resolver
//!
//! Only a handful of flags belong to the settings layer. They are picked out
//! of the full argument list and validated with clap; everything else is
//! handed back untouched so the application can parse it itself.

use super::error::Result;
use super::settings::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Flags consumed by the settings resolver.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "settings", disable_help_flag = true, disable_version_flag = true)]
#[command(args_override_self = true)]
pub struct SettingsArgs {
    /// Decrease logging level to WARNING
    #[arg(short, long, overrides_with = "verbose")]
    pub quiet: bool,

    /// Increase logging level to DEBUG
    #[arg(short, long, overrides_with = "quiet")]
    pub verbose: bool,

    /// Override config file
    #[arg(long = "config-file", value_name = "PATH", env = "DMLANE_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Override log directory
    #[arg(short = 'l', long = "log-directory", value_name = "PATH")]
    pub log_directory: Option<PathBuf>,

    /// Print version information and exit
    #[arg(short = 'V', long = "version")]
    pub display_version: bool,
}

impl SettingsArgs {
    /// Log level requested on the command line, if any.
    pub fn log_level(&self) -> Option<LogLevel> {
        if self.verbose {
            Some(LogLevel::Debug)
        } else if self.quiet {
            Some(LogLevel::Warning)
        } else {
            None
        }
    }
}

/// Recognized settings flags plus the arguments left for the caller.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    pub args: SettingsArgs,
    /// Program name followed by every unrecognized argument, in order.
    pub remaining: Vec<String>,
}

#[derive(Clone, Copy)]
enum Kind {
    Flag,
    NeedsValue,
    Inline,
    Other,
}

/// Long options of [`SettingsArgs`]. None is a prefix of another.
const LONG_OPTIONS: [(&str, Kind); 5] = [
    ("--quiet", Kind::Flag),
    ("--verbose", Kind::Flag),
    ("--version", Kind::Flag),
    ("--log-directory", Kind::NeedsValue),
    ("--config-file", Kind::NeedsValue),
];

/// Classify one argument, spelling out abbreviated long options.
fn classify(arg: String) -> (Kind, String) {
    if arg.starts_with("--") {
        return expand_long(&arg).unwrap_or((Kind::Other, arg));
    }
    match arg.as_str() {
        "-q" | "-v" | "-V" => (Kind::Flag, arg),
        "-l" => (Kind::NeedsValue, arg),
        _ if arg.starts_with("-l") => (Kind::Inline, arg),
        _ => (Kind::Other, arg),
    }
}

/// Full form of a long option given as itself or an unambiguous prefix
/// (`--verb`, `--conf=x`). Ambiguous prefixes are not ours.
fn expand_long(arg: &str) -> Option<(Kind, String)> {
    let (name, value) = match arg.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (arg, None),
    };
    if name.len() <= 2 {
        return None;
    }

    let mut candidates = LONG_OPTIONS.iter().filter(|(long, _)| long.starts_with(name));
    let &(long, kind) = candidates.next()?;
    if candidates.next().is_some() {
        return None;
    }

    match (kind, value) {
        (Kind::Flag, None) | (Kind::NeedsValue, None) => Some((kind, long.to_string())),
        (Kind::NeedsValue, Some(value)) => Some((Kind::Inline, format!("{long}={value}"))),
        _ => None,
    }
}

/// Split `argv` (program name first) into settings flags and the rest.
///
/// Arguments after a literal `--` are never interpreted.
pub fn parse_known_args<I, T>(argv: I) -> Result<ParsedArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut iter = argv.into_iter().map(Into::into);
    let program = iter.next();

    let mut recognized: Vec<String> =
        vec![program.clone().unwrap_or_else(|| "settings".to_string())];
    let mut remaining: Vec<String> = program.into_iter().collect();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            remaining.push(arg);
            remaining.extend(iter.by_ref());
            break;
        }
        let (kind, arg) = classify(arg);
        match kind {
            Kind::Flag | Kind::Inline => recognized.push(arg),
            Kind::NeedsValue => {
                recognized.push(arg);
                if let Some(value) = iter.next() {
                    recognized.push(value);
                }
            }
            Kind::Other => remaining.push(arg),
        }
    }

    let args = SettingsArgs::try_parse_from(recognized)?;
    Ok(ParsedArgs { args, remaining })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ParsedArgs {
        parse_known_args(args.iter().copied()).expect("parse")
    }

    #[test]
    fn test_no_flags_keeps_default_level() {
        let parsed = parse(&["prog"]);
        assert_eq!(parsed.args.log_level(), None);
        assert_eq!(parsed.remaining, vec!["prog"]);
    }

    #[test]
    fn test_verbose_and_quiet() {
        assert_eq!(parse(&["prog", "-v"]).args.log_level(), Some(LogLevel::Debug));
        assert_eq!(parse(&["prog", "--verbose"]).args.log_level(), Some(LogLevel::Debug));
        assert_eq!(parse(&["prog", "-q"]).args.log_level(), Some(LogLevel::Warning));
        assert_eq!(parse(&["prog", "--quiet"]).args.log_level(), Some(LogLevel::Warning));
    }

    #[test]
    fn test_last_level_flag_wins() {
        assert_eq!(parse(&["prog", "-q", "-v"]).args.log_level(), Some(LogLevel::Debug));
        assert_eq!(parse(&["prog", "-v", "-q"]).args.log_level(), Some(LogLevel::Warning));
        assert_eq!(parse(&["prog", "-v", "-v"]).args.log_level(), Some(LogLevel::Debug));
    }

    #[test]
    fn test_value_forms() {
        let parsed = parse(&["prog", "-l", "/custom/logs", "--config-file=/tmp/s.toml"]);
        assert_eq!(parsed.args.log_directory, Some(PathBuf::from("/custom/logs")));
        assert_eq!(parsed.args.config_file, Some(PathBuf::from("/tmp/s.toml")));

        let parsed = parse(&["prog", "--log-directory=/a", "--config-file", "/b.toml"]);
        assert_eq!(parsed.args.log_directory, Some(PathBuf::from("/a")));
        assert_eq!(parsed.args.config_file, Some(PathBuf::from("/b.toml")));

        let parsed = parse(&["prog", "-l/joined"]);
        assert_eq!(parsed.args.log_directory, Some(PathBuf::from("/joined")));
    }

    #[test]
    fn test_unrecognized_arguments_preserved_in_order() {
        let parsed = parse(&["prog", "-i", "in.txt", "-o", "out.txt", "-v"]);
        assert_eq!(parsed.remaining, vec!["prog", "-i", "in.txt", "-o", "out.txt"]);
        assert_eq!(parsed.args.log_level(), Some(LogLevel::Debug));

        let parsed = parse(&["prog", "-i", "in.txt", "-v", "-o", "out.txt"]);
        assert_eq!(parsed.remaining, vec!["prog", "-i", "in.txt", "-o", "out.txt"]);
    }

    #[test]
    fn test_double_dash_stops_recognition() {
        let parsed = parse(&["prog", "run", "--", "ls", "-v"]);
        assert_eq!(parsed.args.log_level(), None);
        assert_eq!(parsed.remaining, vec!["prog", "run", "--", "ls", "-v"]);
    }

    #[test]
    fn test_unambiguous_long_prefixes() {
        assert_eq!(parse(&["prog", "--verb"]).args.log_level(), Some(LogLevel::Debug));
        assert_eq!(parse(&["prog", "--qu"]).args.log_level(), Some(LogLevel::Warning));

        let parsed = parse(&["prog", "--conf", "/b.toml", "--log=/a", "rest"]);
        assert_eq!(parsed.args.config_file, Some(PathBuf::from("/b.toml")));
        assert_eq!(parsed.args.log_directory, Some(PathBuf::from("/a")));
        assert_eq!(parsed.remaining, vec!["prog", "rest"]);
    }

    #[test]
    fn test_ambiguous_or_foreign_long_options_pass_through() {
        let parsed = parse(&["prog", "--ver", "--verbose-output", "--verb=1"]);
        assert_eq!(parsed.args.log_level(), None);
        assert!(!parsed.args.display_version);
        assert_eq!(parsed.remaining, vec!["prog", "--ver", "--verbose-output", "--verb=1"]);
    }

    #[test]
    fn test_version_flag() {
        assert!(parse(&["prog", "-V"]).args.display_version);
        assert!(parse(&["prog", "--version"]).args.display_version);
        assert!(!parse(&["prog"]).args.display_version);
    }

    #[test]
    fn test_missing_value_is_error() {
        let result = parse_known_args(["prog", "-l"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_is_left_for_caller() {
        let parsed = parse(&["prog", "--help"]);
        assert_eq!(parsed.remaining, vec!["prog", "--help"]);
    }
}
