use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Emit machine-readable JSON instead of text
    #[clap(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a query and print its term structure
    Parse {
        /// The raw boolean query
        query: String,
    },

    /// Check a query for structural problems.
    /// Exits nonzero when the query is invalid.
    Validate {
        /// The raw boolean query
        query: String,
    },

    /// Build the three search strategies from a concepts file
    Synthesize {
        /// JSON file holding an array of concepts
        #[clap(short, long)]
        concepts: PathBuf,

        /// Research framework (PICO, PEO, SPIDER, SPICE, ECLIPSE, FINER, ...)
        #[clap(short, long, default_value = "PICO")]
        framework: String,

        /// Hedge id overriding the framework default
        #[clap(long)]
        hedge: Option<String>,
    },

    /// List the built-in methodology hedges
    Hedges {},

    /// List the built-in filter catalog
    Filters {},
}
