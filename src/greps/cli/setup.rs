use clap::{Parser, Subcommand, ValueEnum};
use greps::model::{HistoryKind, Scope};
use std::path::PathBuf;

/// Returns the version string, with the git hash for non-release builds.
/// Format: "0.1.0" for releases, "0.1.0@abc1234" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GREPS_GIT_HASH");
    const IS_RELEASE: &str = env!("GREPS_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Every story of the document
    #[value(alias = "doc")]
    Document,
    /// Only the story holding the selection
    Story,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Document => Scope::Document,
            ScopeArg::Story => Scope::Story,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum HistoryArg {
    /// Patterns
    Find,
    /// Replacements
    Change,
}

impl From<HistoryArg> for HistoryKind {
    fn from(arg: HistoryArg) -> Self {
        match arg {
            HistoryArg::Find => HistoryKind::FindWhat,
            HistoryArg::Change => HistoryKind::ChangeTo,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "greps",
    bin_name = "greps",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Pattern search and replace across the stories of a document", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Document directory; each story file in it is searched separately
    #[arg(short, long, global = true, default_value = ".", help_heading = "Options")]
    pub doc: PathBuf,

    /// Story holding the current selection (file name in the document)
    #[arg(long, global = true, help_heading = "Options")]
    pub story: Option<String>,

    /// Where to search
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        default_value_t = ScopeArg::Document,
        help_heading = "Options"
    )]
    pub scope: ScopeArg,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every match in the scope
    #[command(alias = "f")]
    Find { pattern: String },

    /// Replace every match in the scope
    #[command(alias = "ra")]
    ReplaceAll {
        pattern: String,
        #[arg(default_value = "")]
        replacement: String,
    },

    /// Step through matches interactively (n, r, y, a, q on stdin)
    Step {
        pattern: String,
        #[arg(default_value = "")]
        replacement: String,
    },

    /// Manage saved queries
    #[command(alias = "q")]
    Query {
        #[command(subcommand)]
        action: QueryCommands,
    },

    /// Show recent patterns or replacements
    History {
        #[arg(value_enum, default_value_t = HistoryArg::Find)]
        kind: HistoryArg,
    },

    /// Show what a pattern or replacement expands to
    Normalize {
        text: String,

        /// Normalize as a replacement instead of a pattern
        #[arg(short, long)]
        replacement: bool,
    },

    /// List the special-character tags
    Tags {
        /// Show the tags offered for replacements
        #[arg(short, long)]
        replacement: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g. story-extensions)
        key: Option<String>,
        /// Value to set
        value: Option<String>,
    },

    /// Create the query store
    Init,
}

#[derive(Subcommand, Debug)]
pub enum QueryCommands {
    /// List saved queries
    #[command(alias = "ls")]
    List,

    /// Show a saved query
    Show { name: String },

    /// Save or overwrite a query
    Save {
        name: String,
        pattern: String,
        #[arg(default_value = "")]
        replacement: String,
    },

    /// Delete a saved query
    #[command(alias = "rm")]
    Delete { name: String },

    /// Replace all in the scope with a saved query
    Run { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_options_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "greps", "find", "a+", "--doc", "book", "--scope", "story", "--story", "ch1.txt",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Find { ref pattern }) if pattern == "a+"));
        assert_eq!(cli.doc, PathBuf::from("book"));
        assert_eq!(Scope::from(cli.scope), Scope::Story);
        assert_eq!(cli.story.as_deref(), Some("ch1.txt"));
    }

    #[test]
    fn replacement_defaults_to_empty() {
        let cli = Cli::try_parse_from(["greps", "replace-all", "x"]).unwrap();
        match cli.command {
            Some(Commands::ReplaceAll { replacement, .. }) => assert_eq!(replacement, ""),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn doc_is_a_scope_alias() {
        let cli = Cli::try_parse_from(["greps", "-s", "doc", "tags"]).unwrap();
        assert_eq!(cli.scope, ScopeArg::Document);
    }

    #[test]
    fn query_subcommands_parse() {
        let cli = Cli::try_parse_from(["greps", "query", "save", "dashes", "--", "-"]).unwrap();
        match cli.command {
            Some(Commands::Query {
                action:
                    QueryCommands::Save {
                        name,
                        pattern,
                        replacement,
                    },
            }) => {
                assert_eq!(name, "dashes");
                assert_eq!(pattern, "-");
                assert_eq!(replacement, "");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn history_defaults_to_patterns() {
        let cli = Cli::try_parse_from(["greps", "history"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::History {
                kind: HistoryArg::Find
            })
        ));
    }
}
