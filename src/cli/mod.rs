//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the dtapi binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::{DEFAULT_FROM, DEFAULT_TO};

/// Dynatrace API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "dtapi", about = "Dynatrace entity API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity or entity type.
    Get {
        /// The kind of resource to get.
        resource: Resource,

        /// Entity ID (e.g. HOST-0123456789ABCDEF) or type name (e.g. HOST).
        id: String,
    },

    /// List entities or entity types.
    List {
        /// The kind of resource to list.
        resource: Resource,

        /// Entity selector (required for entities), e.g. "type(HOST)".
        #[arg(long, short = 's')]
        selector: Option<String>,

        /// Start of the timeframe.
        #[arg(long, default_value = DEFAULT_FROM)]
        from: String,

        /// End of the timeframe.
        #[arg(long, default_value = DEFAULT_TO)]
        to: String,

        /// Extra fields to include, e.g. "+properties,+tags".
        #[arg(long)]
        fields: Option<String>,

        /// Number of items per page (server maximum 500).
        #[arg(long)]
        page_size: Option<u32>,

        /// Stop after this many items.
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Resource kinds that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    /// A monitored entity.
    #[value(alias = "entities")]
    Entity,
    /// An entity type schema.
    #[value(alias = "types", alias = "entity-type", alias = "entity-types")]
    Type,
}
