mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use pictura_core::config::Config;
use pictura_core::{Error, Imageable, PictureId};
use pictura_db::models::{FileAsset, Picture};
use pictura_db::pool::{get_conn, init_pool, PooledConnection};
use pictura_db::{migrations, queries::pictures};
use serde::Serialize;

/// A picture as printed by `show`.
#[derive(Serialize)]
struct PictureView<'a> {
    picture: &'a Picture,
    file_asset: Option<FileAsset>,
}

fn open(config: &Config) -> Result<PooledConnection> {
    let pool = init_pool(&config.database)
        .with_context(|| format!("Failed to open database {:?}", config.database.path))?;
    Ok(get_conn(&pool)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn migrate(config: &Config) -> Result<()> {
    let conn = open(config)?;
    let version = migrations::current_version(&conn)?;
    println!(
        "Database {} is at schema version {} (latest {})",
        config.database.path.display(),
        version,
        migrations::latest_version()
    );
    Ok(())
}

fn add_picture(config: &Config, name: &str, kind: &str, id: &str) -> Result<()> {
    let owner = Imageable::from_parts(kind, id)?;
    let conn = open(config)?;
    let created = pictures::create_picture(&conn, name, &owner)?;
    print_json(&created)
}

fn show_picture(config: &Config, id: PictureId) -> Result<()> {
    let conn = open(config)?;
    let picture =
        pictures::get_picture(&conn, id)?.ok_or_else(|| Error::not_found("picture", id))?;
    let file_asset = pictures::get_picture_file_asset(&conn, &picture)?;
    print_json(&PictureView {
        picture: &picture,
        file_asset,
    })
}

fn list_pictures(config: &Config, kind: &str, id: &str) -> Result<()> {
    let owner = Imageable::from_parts(kind, id)?;
    let conn = open(config)?;
    let list = pictures::list_pictures_for_imageable(&conn, &owner)?;
    print_json(&list)
}

fn rename_picture(config: &Config, id: PictureId, name: &str) -> Result<()> {
    let conn = open(config)?;
    if !pictures::rename_picture(&conn, id, name)? {
        return Err(Error::not_found("picture", id).into());
    }
    println!("Renamed picture {} to {:?}", id, name);
    Ok(())
}

fn delete_picture(config: &Config, id: PictureId) -> Result<()> {
    let conn = open(config)?;
    let picture =
        pictures::delete_picture(&conn, id)?.ok_or_else(|| Error::not_found("picture", id))?;
    match picture.file_asset_id {
        Some(asset) => println!("Deleted picture {id}; file asset {asset} was left in place"),
        None => println!("Deleted picture {id}"),
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    let warnings = config.validate();
    if warnings.is_empty() {
        println!("Configuration OK");
    } else {
        for warning in &warnings {
            println!("warning: {}", warning);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "pictura=debug,pictura_db=debug,pictura_core=debug".to_string()
        } else {
            "pictura=info,pictura_db=info".to_string()
        }
    });

    // stdout carries command output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }

    match cli.command {
        Commands::Migrate => migrate(&config),
        Commands::Add {
            name,
            imageable_type,
            imageable_id,
        } => add_picture(&config, &name, &imageable_type, &imageable_id),
        Commands::Show { id } => show_picture(&config, id),
        Commands::List {
            imageable_type,
            imageable_id,
        } => list_pictures(&config, &imageable_type, &imageable_id),
        Commands::Rename { id, name } => rename_picture(&config, id, &name),
        Commands::Delete { id } => delete_picture(&config, id),
        Commands::Validate => validate_config(&config),
        Commands::Version => {
            println!("pictura {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
