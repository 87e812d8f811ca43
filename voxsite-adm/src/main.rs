//! voxsite-adm - Operator tooling for a VoxSite installation
//!
//! One-shot maintenance commands against the site's root folder:
//! seeding the default services and site text, writing the static
//! `audios.json` manifest, and inspecting the persisted catalog.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;
use walkdir::WalkDir;

use voxsite_common::config::{RootFolderInitializer, RootFolderResolver};
use voxsite_common::db::{services, settings, site_content};
use voxsite_common::models::{AudioEntry, AudioFileInfo, AudioFileListing, Service};
use voxsite_common::{is_audio_extension, CATALOG_SETTING_KEY};

#[derive(Debug, Parser)]
#[command(name = "voxsite-adm", about = "VoxSite maintenance commands")]
struct Args {
    /// Root folder holding the database and audios tree
    #[arg(long)]
    root_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Insert the default service rows when the table is empty
    SeedServices,
    /// Insert default site text blocks for keys not yet written
    SeedContent,
    /// Walk the audios folder and write the static audios.json manifest
    WriteManifest,
    /// Print the persisted audio catalog
    ShowCatalog,
}

/// Default services for a fresh installation.
const DEFAULT_SERVICES: &[(&str, bool, bool)] = &[
    ("Locução comercial", true, false),
    ("Spot para rádio", false, true),
    ("Vinheta", false, false),
    ("Espera telefônica", false, false),
    ("Audiobook", false, false),
    ("Institucional", false, true),
];

/// Default site text for a fresh installation.
const DEFAULT_CONTENT: &[(&str, &str)] = &[
    ("hero_title", "Locução profissional para sua marca"),
    ("hero_subtitle", "Demos por locutor, entrega rápida"),
    ("about", "Estúdio de locução com anos de experiência em comerciais, vinhetas e institucionais."),
    ("whatsapp_number", "+55 11 99999-0000"),
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let resolver = RootFolderResolver::new(args.root_folder);
    let initializer = RootFolderInitializer::new(resolver.resolve());
    initializer.ensure_directories_exist()?;
    info!("Root folder: {}", initializer.root().display());

    match args.command {
        Command::SeedServices => {
            let db = voxsite_common::db::init_database_pool(&initializer.database_path()).await?;
            seed_services(&db).await?;
        }
        Command::SeedContent => {
            let db = voxsite_common::db::init_database_pool(&initializer.database_path()).await?;
            seed_content(&db).await?;
        }
        Command::WriteManifest => {
            let count =
                write_manifest(&initializer.audios_path(), &initializer.manifest_path())?;
            info!(
                "Wrote manifest {} ({} files)",
                initializer.manifest_path().display(),
                count
            );
        }
        Command::ShowCatalog => {
            let db = voxsite_common::db::init_database_pool(&initializer.database_path()).await?;
            show_catalog(&db).await?;
        }
    }

    Ok(())
}

async fn seed_services(db: &sqlx::SqlitePool) -> Result<()> {
    if services::count_services(db).await? > 0 {
        info!("Services table already populated; nothing to seed");
        return Ok(());
    }

    for (position, (title, best_seller, recommended)) in DEFAULT_SERVICES.iter().enumerate() {
        let service = Service {
            id: Uuid::new_v4(),
            title: title.to_string(),
            is_best_seller: *best_seller,
            is_recommended: *recommended,
            order_position: position as i64,
        };
        services::insert_service(db, &service).await?;
    }

    info!("Seeded {} default services", DEFAULT_SERVICES.len());
    Ok(())
}

async fn seed_content(db: &sqlx::SqlitePool) -> Result<()> {
    let mut seeded = 0;
    for (key, value) in DEFAULT_CONTENT {
        // Never clobber text an admin already edited
        if site_content::get_content(db, key).await?.is_none() {
            site_content::set_content(db, key, value).await?;
            seeded += 1;
        }
    }

    info!("Seeded {} site content blocks", seeded);
    Ok(())
}

/// Walk the audios folder (root plus one subfolder level) and write
/// the `{files: [...]}` manifest the web service serves as a listing
/// fallback.
fn write_manifest(audios_path: &Path, manifest_path: &Path) -> Result<usize> {
    let mut files = Vec::new();

    for entry in WalkDir::new(audios_path).follow_links(false).max_depth(2) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let has_audio_ext = entry
            .path()
            .extension()
            .map(|ext| is_audio_extension(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false);
        if !has_audio_ext {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(audios_path) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        files.push(AudioFileInfo::new(name, size));
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    let count = files.len();

    let listing = AudioFileListing { files };
    std::fs::write(manifest_path, serde_json::to_string_pretty(&listing)?)?;
    Ok(count)
}

async fn show_catalog(db: &sqlx::SqlitePool) -> Result<()> {
    let catalog: Option<Vec<AudioEntry>> = settings::get_setting(db, CATALOG_SETTING_KEY).await?;

    match catalog {
        None => println!("No catalog persisted yet (service never reconciled)"),
        Some(entries) => {
            println!("{:<6} {:<40} {}", "order", "title", "file_path");
            for entry in entries {
                println!("{:<6} {:<40} {}", entry.order, entry.title, entry.file_path);
            }
        }
    }

    Ok(())
}
