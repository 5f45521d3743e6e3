//! # Catalogue Seeder
//!
//! Loads the six sample destinations into the configured store.
//!
//! ## Usage
//! ```bash
//! # Seed the store named by the default config file and environment
//! cargo run -p wanderlust-db --bin seed
//!
//! # Seed a local SQLite file
//! WANDERLUST_STORE_BACKEND=sqlite WANDERLUST_SQLITE_PATH=./dev.db \
//!     cargo run -p wanderlust-db --bin seed
//!
//! # Use an explicit config file
//! cargo run -p wanderlust-db --bin seed -- --config ./wanderlust.toml
//! ```
//!
//! A store that already holds destinations is left untouched.

use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wanderlust_core::catalogue::sample_destinations;
use wanderlust_core::NewDestination;
use wanderlust_db::{SiteConfig, SiteData};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Wanderlust Catalogue Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                println!();
                println!("Environment overrides: WANDERLUST_STORE_BACKEND, WANDERLUST_STORE_URL,");
                println!("  WANDERLUST_STORE_ANON_KEY, WANDERLUST_SQLITE_PATH");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = SiteConfig::load(config_path)?;

    println!("🌱 Wanderlust Catalogue Seeder");
    println!("==============================");
    println!("Backend: {}", config.store.backend);
    println!();

    let db = match SiteData::open(&config).await? {
        SiteData::Store(db) => db,
        SiteData::Fallback(store) => {
            println!(
                "✓ Memory backend: the fallback store is pre-seeded with {} destinations",
                store.destinations().len()
            );
            return Ok(());
        }
    };

    println!("✓ Connected to {} store", db.backend());

    let existing = db.destinations().get_all().await?;
    if !existing.is_empty() {
        println!("⚠ Store already has {} destinations", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Creating destinations...");

    let mut created = 0;
    for destination in sample_destinations() {
        let name = destination.name.clone();
        match db.destinations().create(&NewDestination::from(destination)).await {
            Ok(stored) => {
                println!("  {} ({}) → {}", stored.name, stored.country, stored.id);
                created += 1;
            }
            Err(e) => eprintln!("Failed to create {}: {}", name, e),
        }
    }

    println!();
    let featured = db.destinations().get_featured(None).await?;
    let names: Vec<&str> = featured.iter().map(|d| d.name.as_str()).collect();
    println!("✓ Created {} destinations", created);
    println!("  Featured: {}", names.join(", "));

    Ok(())
}
