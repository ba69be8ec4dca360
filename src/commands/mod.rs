//! Subcommand table, dispatcher, and help generation.
//!
//! One declarative `CommandTable` is the single source of truth: the
//! dispatcher routes verbs through it and the help generator renders it, so
//! every routable non-base verb is listed and every listed verb is routable.
//! Entries are declared once at startup and never mutated.

pub mod extract;
pub mod info;
pub mod survey;

use crate::cleanup::CleanupScope;
use crate::hints::HintResolver;
use crate::report::Registry;
use crate::utils::config::Config;
use crate::utils::error::AppError;

/// Per-invocation context threaded into every handler.
///
/// Everything a handler may need is here; handlers never consult the
/// environment or any global state themselves.
pub struct Ctx<'a> {
    pub config: &'a Config,
    pub registry: &'a Registry,
    pub cleanup: &'a CleanupScope,
    pub hints: &'a HintResolver,
}

/// A subcommand handler. Receives the table so the base verbs can render it.
pub type Handler = fn(&CommandTable, &Ctx<'_>, &[String]) -> Result<(), AppError>;

/// One declarative subcommand entry
pub struct CommandEntry {
    /// Primary verb
    pub verb: &'static str,

    /// Alternate verbs routing to the same handler
    pub aliases: &'static [&'static str],

    /// Base verbs (help/ls/manual/info) are excluded from the non-base listing
    pub base: bool,

    /// One-line usage text; entries with an empty synopsis are not rendered
    pub synopsis: &'static str,

    pub handler: Handler,
}

/// Ordered, immutable set of subcommand entries
pub struct CommandTable {
    entries: Vec<CommandEntry>,
}

impl CommandTable {
    /// Build a table, asserting that no verb or alias appears twice.
    pub fn new(entries: Vec<CommandEntry>) -> Self {
        let mut seen = std::collections::HashSet::new();
        for entry in &entries {
            assert!(seen.insert(entry.verb), "duplicate verb: {}", entry.verb);
            for alias in entry.aliases {
                assert!(seen.insert(alias), "duplicate alias: {alias}");
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Find an entry by verb or alias
    pub fn find(&self, verb: &str) -> Option<&CommandEntry> {
        self.entries
            .iter()
            .find(|e| e.verb == verb || e.aliases.contains(&verb))
    }
}

/// The production command table
pub fn command_table() -> CommandTable {
    CommandTable::new(vec![
        CommandEntry {
            verb: "help",
            aliases: &[],
            base: true,
            synopsis: "help [term]        show usage, optionally filtered by term",
            handler: handle_help,
        },
        CommandEntry {
            verb: "ls",
            aliases: &["list"],
            base: true,
            synopsis: "ls                 list the non-base subcommands",
            handler: handle_ls,
        },
        CommandEntry {
            verb: "manual",
            aliases: &[],
            base: true,
            synopsis: "manual             show the full manual",
            handler: handle_manual,
        },
        CommandEntry {
            verb: "info",
            aliases: &["version"],
            base: true,
            synopsis: "info               show tool and collaborator versions",
            handler: info::handle_info,
        },
        CommandEntry {
            verb: "start",
            aliases: &[],
            base: false,
            synopsis: "start <hint>...    launch the survey daemon on the hinted sources",
            handler: survey::handle_start,
        },
        CommandEntry {
            verb: "stop",
            aliases: &[],
            base: false,
            synopsis: "stop               gracefully stop the survey daemon",
            handler: survey::handle_stop,
        },
        CommandEntry {
            verb: "stream",
            aliases: &[],
            base: false,
            synopsis: "stream             capture the live stream into timed segments",
            handler: survey::handle_stream,
        },
        CommandEntry {
            verb: "extract",
            aliases: &[],
            base: false,
            synopsis: "extract <file>     extract fields from one capture file",
            handler: extract::handle_extract,
        },
        CommandEntry {
            verb: "bulk",
            aliases: &[],
            base: false,
            synopsis: "bulk <dir>         extract fields from every capture under a tree",
            handler: extract::handle_bulk,
        },
    ])
}

/// Render usage for entries matching `term` (case-insensitive, match-all when
/// empty), in declaration order. Always succeeds; zero matches renders the
/// header only.
pub fn usage(table: &CommandTable, term: &str) -> String {
    let needle = term.to_lowercase();
    let mut out = String::from("Usage: aircap <command> [args...]\n\nCommands:\n");

    for entry in table.entries() {
        if entry.synopsis.is_empty() {
            continue;
        }
        let haystack = format!("{} {}", entry.verb, entry.synopsis).to_lowercase();
        if needle.is_empty() || haystack.contains(&needle) {
            out.push_str("  ");
            out.push_str(entry.synopsis);
            out.push('\n');
        }
    }
    out
}

/// Usage restricted to non-base entries
pub fn list_subcommands(table: &CommandTable) -> String {
    let mut out = String::from("Subcommands:\n");
    for entry in table.entries() {
        if entry.base || entry.synopsis.is_empty() {
            continue;
        }
        out.push_str("  ");
        out.push_str(entry.synopsis);
        out.push('\n');
    }
    out
}

/// Full static manual text, unfiltered
pub fn manual() -> &'static str {
    MANUAL
}

const MANUAL: &str = "\
aircap - front end for packet-capture tooling

aircap drives three external collaborators through their command-line
contracts: a wireless-survey daemon, a packet-dissection tool, and a
network stream fetch.

  start <hint>...   Resolve each hint against the capture-source table
                    (unknown hints pass through verbatim) and launch the
                    survey daemon with the resulting source arguments.
  stop              Send the daemon a graceful stop signal by process name.
  stream            Fetch the live capture stream and roll it into
                    time-bounded segment files.
  extract <file>    Dissect one capture file into a deduplicated
                    tab-separated field table next to the input.
  bulk <dir>        Run extract over every capture file under a tree,
                    skipping failures and continuing.

Configuration is taken from AIRCAP_* environment variables at startup:
sink command overrides per reporting channel, the working directory for
transient files, the capture-source table, and the stream endpoint and
credentials.
";

/// Route `argv` to its handler.
///
/// Blank verb: print usage, succeed (exit 0). Unknown verb: print usage and
/// return invalid usage (exit 2). Known verb: emit entry/exit trace events
/// and run the handler with the remaining arguments untouched.
pub fn dispatch(table: &CommandTable, argv: &[String], ctx: &Ctx) -> Result<(), AppError> {
    let verb = argv.first().map(String::as_str).unwrap_or("");
    if verb.is_empty() {
        print!("{}", usage(table, ""));
        return Ok(());
    }

    let Some(entry) = table.find(verb) else {
        print!("{}", usage(table, ""));
        return Err(AppError::InvalidUsage(format!("unknown command: {verb}")));
    };

    let rest = &argv[1..];
    ctx.registry.trace_enter(entry.verb, rest);
    let result = (entry.handler)(table, ctx, rest);
    ctx.registry.trace_exit(entry.verb, rest);
    result
}

fn handle_help(table: &CommandTable, _ctx: &Ctx, args: &[String]) -> Result<(), AppError> {
    let term = args.first().map(String::as_str).unwrap_or("");
    print!("{}", usage(table, term));
    Ok(())
}

fn handle_ls(table: &CommandTable, _ctx: &Ctx, _args: &[String]) -> Result<(), AppError> {
    print!("{}", list_subcommands(table));
    Ok(())
}

fn handle_manual(_table: &CommandTable, _ctx: &Ctx, _args: &[String]) -> Result<(), AppError> {
    print!("{}", manual());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_nonbase_verb_is_listed_once() {
        let table = command_table();
        let listing = list_subcommands(&table);
        for entry in table.entries().iter().filter(|e| !e.base) {
            assert_eq!(
                listing.matches(entry.synopsis).count(),
                1,
                "{} must appear exactly once",
                entry.verb
            );
        }
    }

    #[test]
    fn test_base_verbs_excluded_from_listing() {
        let table = command_table();
        let listing = list_subcommands(&table);
        for entry in table.entries().iter().filter(|e| e.base) {
            assert!(!listing.contains(entry.synopsis), "{} is base", entry.verb);
        }
    }

    #[test]
    fn test_every_verb_and_alias_routable() {
        let table = command_table();
        for entry in table.entries() {
            assert!(table.find(entry.verb).is_some());
            for alias in entry.aliases {
                assert_eq!(table.find(alias).unwrap().verb, entry.verb);
            }
        }
    }

    #[test]
    fn test_usage_filter_case_insensitive() {
        let table = command_table();
        let filtered = usage(&table, "STREAM");
        assert!(filtered.contains("stream"));
        assert!(!filtered.contains("manual "));
    }

    #[test]
    fn test_usage_no_matches_renders_header_only() {
        let table = command_table();
        let filtered = usage(&table, "no-such-verb-anywhere");
        assert!(filtered.starts_with("Usage: aircap"));
        assert!(!filtered.contains("  start"));
    }

    #[test]
    #[should_panic(expected = "duplicate")]
    fn test_duplicate_verbs_rejected() {
        fn noop(_: &CommandTable, _: &Ctx, _: &[String]) -> Result<(), AppError> {
            Ok(())
        }
        let entry = |verb| CommandEntry {
            verb,
            aliases: &[],
            base: false,
            synopsis: "",
            handler: noop,
        };
        CommandTable::new(vec![entry("x"), entry("x")]);
    }
}
