//! CLI module for Scout.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Scout - web, scholar and document lookups
///
/// Query the web and Google Scholar, read local PDFs, and expose the same
/// tools to AI assistants over MCP.
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the web
    Search {
        /// Search query
        query: String,

        /// Maximum number of results (defaults to web_search.default_results)
        #[arg(short = 'n', long)]
        num_results: Option<usize>,
    },

    /// Print the text of a PDF file
    Pdf {
        /// Path to the PDF file
        path: String,
    },

    /// Look up authors and papers on Google Scholar
    Scholar {
        #[command(subcommand)]
        action: ScholarAction,
    },

    /// Ask a canned question (lists every known question when omitted)
    Ask {
        /// The exact question to ask
        question: Option<String>,
    },

    /// Print the tool definitions as JSON
    Tools,

    /// Invoke a registered tool by name
    Call {
        /// Tool name (see `scout tools`)
        tool: String,

        /// Tool arguments as a JSON object
        args: Option<String>,
    },

    /// Start MCP server for AI assistant integration (Claude, etc.)
    Mcp,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScholarAction {
    /// Search authors by name
    Author {
        /// Author name, optionally with institute
        name: String,

        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// Search authors by comma-separated research interests
    Interests {
        /// e.g. "crowdsourcing,privacy"
        interests: String,

        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// List the papers of an author given their Scholar UID
    Papers {
        uid: String,

        /// Sort order (citedby, year)
        #[arg(long, default_value = "citedby")]
        sort: String,

        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// Search papers by title
    Paper {
        title: String,

        /// Sort order (relevance, date)
        #[arg(long, default_value = "relevance")]
        sort: String,

        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// Best match for a title
    Single { title: String },

    /// Papers related to the best match for a title
    Related {
        title: String,

        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// Papers citing the best match for a title
    Cites {
        title: String,

        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scholar_papers_defaults() {
        let cli = Cli::parse_from(["scout", "scholar", "papers", "abc123"]);
        match cli.command {
            Commands::Scholar {
                action: ScholarAction::Papers { uid, sort, top_k },
            } => {
                assert_eq!(uid, "abc123");
                assert_eq!(sort, "citedby");
                assert_eq!(top_k, 5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["scout", "search", "rust", "-n", "3", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Search {
                num_results: Some(3),
                ..
            }
        ));
    }
}
