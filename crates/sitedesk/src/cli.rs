//! Argument definitions for the `sitedesk` binary.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use strum::IntoEnumIterator;

use sitedesk_api::RowId;
use sitedesk_core::LogicalEntity;

#[derive(Debug, Parser)]
#[command(
    name = "sitedesk",
    version,
    about = "Manage sitedesk website content from the terminal",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "SITEDESK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Sign-in email; the password comes from SITEDESK_PASSWORD or a prompt
    #[arg(long, env = "SITEDESK_EMAIL", global = true)]
    pub email: Option<String>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the resolved table names of kinds whose tables are probed
    Schema,

    /// List the items of one content kind
    List {
        #[arg(value_parser = parse_kind)]
        kind: LogicalEntity,
    },

    /// Delete an item together with its translations and images
    Delete {
        #[arg(value_parser = parse_kind)]
        kind: LogicalEntity,
        id: RowId,
    },

    /// Upload files and link them after the item's existing images
    AddImages {
        #[arg(value_parser = parse_kind)]
        kind: LogicalEntity,
        id: RowId,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Unlink one image by its link row id
    RemoveImage {
        #[arg(value_parser = parse_kind)]
        kind: LogicalEntity,
        link_id: RowId,
    },

    /// Make one project image the cover
    SetCover { project_id: RowId, image_id: RowId },

    /// List team members
    Team,

    /// Print the signed-in email
    Whoami,
}

fn parse_kind(raw: &str) -> Result<LogicalEntity, String> {
    LogicalEntity::from_str(raw).map_err(|_| {
        let known: Vec<String> = LogicalEntity::iter().map(|e| e.as_ref().to_owned()).collect();
        format!("unknown kind '{raw}' (expected one of: {})", known.join(", "))
    })
}
