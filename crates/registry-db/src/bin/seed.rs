//! # Seed Data Generator
//!
//! Populates the database with regions and demo clients for development.
//!
//! ## Usage
//! ```bash
//! # Regions only
//! cargo run -p registry-db --bin seed
//!
//! # Regions plus 200 demo clients
//! cargo run -p registry-db --bin seed -- --clients 200
//!
//! # Specify database path
//! cargo run -p registry-db --bin seed -- --db ./data/registry.db
//! ```
//!
//! ## Generated Clients
//! - Every fifth client is a legal entity with up to four branches
//!   (children pointing at it through `parent_id`)
//! - INNs are 10 digits for legal entities, 12 for individuals
//! - Regions are assigned round-robin

use std::env;

use anyhow::{bail, Context};
use registry_core::{NewClient, PartyType};
use registry_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Company name stems for legal entities.
const COMPANIES: &[&str] = &[
    "Aurora",
    "Baikal",
    "Cedar",
    "Delta",
    "Ermak",
    "Fort",
    "Granit",
    "Horizon",
    "Ilmen",
    "Yenisei",
];

/// Company form suffixes.
const FORMS: &[&str] = &["LLC", "JSC", "Group", "Trading", "Logistics"];

/// Surnames for individuals.
const SURNAMES: &[&str] = &[
    "Ivanov", "Petrova", "Smirnov", "Kuznetsova", "Popov", "Volkova", "Sokolov", "Lebedeva",
];

/// Branches per legal entity.
const BRANCHES: usize = 4;

struct Args {
    db_path: String,
    clients: usize,
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let mut args = Args {
        db_path: String::from("./registry_dev.db"),
        clients: 0,
    };

    let mut argv = env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--clients" | "-c" => {
                let value = argv.next().context("--clients needs a value")?;
                args.clients = value
                    .parse()
                    .with_context(|| format!("--clients: not a number: {value}"))?;
            }
            "--db" | "-d" => {
                args.db_path = argv.next().context("--db needs a value")?;
            }
            "--help" | "-h" => {
                println!("Client Registry Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --clients <N>  Number of demo clients to generate (default: 0)");
                println!("  -d, --db <PATH>    Database file path (default: ./registry_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(None);
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(Some(args))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };

    info!(db = %args.db_path, clients = args.clients, "Seeding database");

    let db = Database::new(DbConfig::new(&args.db_path))
        .await
        .context("failed to open database")?;

    let seeded = db.regions().seed_defaults().await?;
    info!(seeded, "Regions ready");

    if args.clients == 0 {
        return Ok(());
    }

    let existing = db.clients().count().await?;
    if existing > 0 {
        warn!(
            existing,
            "Database already has clients, skipping to avoid duplicates"
        );
        return Ok(());
    }

    let regions: Vec<Uuid> = db.regions().list().await?.into_iter().map(|r| r.id).collect();

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut parent: Option<Uuid> = None;

    for seq in 0..args.clients {
        let mut client = demo_client(seq, &regions);

        // Individuals hang off the most recent legal entity.
        if client.party_type == PartyType::Individual {
            client.parent_id = parent;
        }

        match db.clients().insert(&client).await {
            Ok(stored) => {
                if stored.party_type == PartyType::Legal {
                    parent = Some(stored.client_id);
                }
                generated += 1;
            }
            Err(e) => warn!(name = %client.name, error = %e, "Failed to insert client"),
        }

        if generated > 0 && generated % 500 == 0 {
            info!(generated, "Progress");
        }
    }

    let elapsed = start.elapsed();
    info!(
        generated,
        elapsed_ms = elapsed.as_millis() as u64,
        "Seed complete"
    );

    Ok(())
}

/// Builds the `seq`-th demo client. Names and INNs are unique per `seq`.
fn demo_client(seq: usize, regions: &[Uuid]) -> NewClient {
    let region_id = if regions.is_empty() {
        None
    } else {
        Some(regions[seq % regions.len()])
    };

    if seq % (BRANCHES + 1) == 0 {
        let stem = COMPANIES[seq % COMPANIES.len()];
        let form = FORMS[(seq / COMPANIES.len()) % FORMS.len()];
        NewClient {
            name: format!("{stem} {seq:05}"),
            full_name: Some(format!("{stem} {form} #{seq}")),
            party_type: PartyType::Legal,
            inn: Some(format!("77{seq:08}")),
            region_id,
            parent_id: None,
        }
    } else {
        let surname = SURNAMES[seq % SURNAMES.len()];
        NewClient {
            name: format!("{surname} {seq:05}"),
            full_name: None,
            party_type: PartyType::Individual,
            inn: (seq % 3 != 0).then(|| format!("50{seq:010}")),
            region_id,
            parent_id: None,
        }
    }
}
