use clap::{Parser, Subcommand};
use pictura_core::PictureId;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pictura")]
#[command(author, version, about = "Manage pictures and their file assets")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides database.path from the config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Create a picture (and its file asset) for an owner
    Add {
        /// Picture name, also used as the file asset's filename
        #[arg(long)]
        name: String,

        /// Owner kind: User, Product or Article
        #[arg(long)]
        imageable_type: String,

        /// Owner id (UUID)
        #[arg(long)]
        imageable_id: String,
    },

    /// Show a picture and its file asset
    Show {
        /// Picture id
        id: PictureId,
    },

    /// List the pictures of an owner
    List {
        /// Owner kind: User, Product or Article
        #[arg(long)]
        imageable_type: String,

        /// Owner id (UUID)
        #[arg(long)]
        imageable_id: String,
    },

    /// Rename a picture (its file asset is not changed)
    Rename {
        /// Picture id
        id: PictureId,

        /// New name
        name: String,
    },

    /// Delete a picture; its file asset is left in place
    Delete {
        /// Picture id
        id: PictureId,
    },

    /// Validate configuration file
    Validate,

    /// Display version information
    Version,
}
