//! Billgraph CLI
//!
//! Command-line interface for:
//! - Resolving bill citations into a per-bill N-Triples graph (`triplify`)
//! - Dumping the most recent XML version of every bill (`dump`)
//! - Counting bill versions across the inventory (`census`)

use anyhow::{Context, Result};
use billgraph_cite::{resolve, ActLookup, NoEnrichment};
use billgraph_enrich::DbpediaLookup;
use billgraph_graph::{assemble, TripleSink};
use billgraph_ingest_xml::{extract_metadata, extract_references};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

mod inventory;

use inventory::{current_congress, latest_versions, Inventory, InventoryEntry};

#[derive(Parser)]
#[command(name = "billgraph")]
#[command(
    author,
    version,
    about = "Resolve legislative bill citations into a linked-data graph"
)]
struct Cli {
    /// Exclude introduction-only bill versions
    #[arg(long, global = true)]
    exclude_intros: bool,

    /// Limit the run to the first N bills
    #[arg(long, global = true, value_name = "N")]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve citations and append one N-Triples block per bill to a file.
    Triplify {
        /// Output triples file
        #[arg(short, long, default_value = "bill-triples.nt")]
        out: PathBuf,
        /// Skip DBpedia enrichment of named-act references
        #[arg(long)]
        no_enrich: bool,
    },

    /// Dump the most recent XML version of each bill into a directory.
    Dump {
        /// Output directory
        #[arg(short, long, default_value = "bill-xml")]
        out: PathBuf,
    },

    /// Count bills per version stage across the inventory.
    Census,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Triplify { out, no_enrich } => cmd_triplify(&cli, out, *no_enrich),
        Commands::Dump { out } => cmd_dump(&cli, out),
        Commands::Census => cmd_census(&cli),
    }
}

/// Fetch the inventory and reduce it to the bills this run covers.
fn load_inventory(cli: &Cli) -> Result<(Inventory, Vec<InventoryEntry>)> {
    let inventory = Inventory::new()?;
    let raw = inventory.fetch_entries()?;
    println!("Raw bill list has {} items", raw.len());

    let mut entries = latest_versions(raw, cli.exclude_intros);
    println!("Most-recent bill list has {} items", entries.len());

    if let Some(limit) = cli.limit {
        entries.truncate(limit);
        println!("Limiting run to {limit}");
    }
    Ok((inventory, entries))
}

fn cmd_triplify(cli: &Cli, out: &Path, no_enrich: bool) -> Result<()> {
    println!(
        "Triplifying citations (congress {} sitting)",
        current_congress()
    );
    let (inventory, entries) = load_inventory(cli)?;

    let lookup: Box<dyn ActLookup> = if no_enrich {
        Box::new(NoEnrichment)
    } else {
        Box::new(DbpediaLookup::new().context("building DBpedia client")?)
    };

    let file = fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let mut sink = TripleSink::new(BufWriter::new(file));

    let mut bills = 0usize;
    let mut entities_total = 0usize;
    let mut warnings_total = 0usize;

    for entry in &entries {
        let identity = entry.identity();
        let _span =
            tracing::info_span!("bill", congress = identity.congress, number = identity.bill_number)
                .entered();

        let xml = match inventory.fetch_bill_xml(&identity) {
            Ok(xml) => xml,
            Err(err) => {
                tracing::warn!(%err, "skipping bill: fetch failed");
                continue;
            }
        };
        let meta = match extract_metadata(&xml, &identity) {
            Ok(meta) => meta,
            Err(err) => {
                tracing::warn!(%err, "skipping bill: unusable metadata");
                continue;
            }
        };
        let refs = match extract_references(&xml) {
            Ok(refs) => refs,
            Err(err) => {
                tracing::warn!(%err, "skipping bill: unreadable document");
                continue;
            }
        };

        let raw: Vec<String> = refs.into_iter().map(|r| r.value).collect();
        let (entities, resolve_warnings) = resolve(&raw, lookup.as_ref());
        let (block, assemble_warnings) = match assemble(&meta, &entities) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(%err, "skipping bill: no usable identifier");
                continue;
            }
        };
        sink.append(&block)
            .with_context(|| format!("writing block for {}", meta.bill_key()))?;

        bills += 1;
        entities_total += entities.len();
        warnings_total += resolve_warnings.len() + assemble_warnings.len();
        println!(
            "  {} {} ({} citations, {} statements, {} warnings)",
            "→".cyan(),
            meta.bill_key(),
            entities.len(),
            block.len(),
            resolve_warnings.len() + assemble_warnings.len()
        );
    }

    let writer = sink.finish().context("flushing triples")?;
    drop(writer);
    println!("  {} {}", "→".cyan(), out.display());
    println!(
        "{} bills processed, {} citations resolved, {} warnings",
        bills, entities_total, warnings_total
    );
    Ok(())
}

fn cmd_dump(cli: &Cli, out: &Path) -> Result<()> {
    let (inventory, entries) = load_inventory(cli)?;
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    let mut dumped = 0usize;
    for entry in &entries {
        let identity = entry.identity();
        let xml = match inventory.fetch_bill_xml(&identity) {
            Ok(xml) => xml,
            Err(err) => {
                tracing::warn!(%err, "skipping bill: fetch failed");
                continue;
            }
        };
        let name = match extract_metadata(&xml, &identity) {
            Ok(meta) => meta.bill_key(),
            Err(err) => {
                tracing::warn!(%err, "skipping bill: unusable metadata");
                continue;
            }
        };
        let path = out.join(format!("{name}.xml"));
        fs::write(&path, &xml).with_context(|| format!("writing {}", path.display()))?;
        dumped += 1;
    }
    println!("{dumped} bills processed and XML dumped");
    Ok(())
}

fn cmd_census(cli: &Cli) -> Result<()> {
    let (_, entries) = load_inventory(cli)?;

    let mut census: std::collections::BTreeMap<String, usize> = std::collections::BTreeMap::new();
    for entry in &entries {
        *census.entry(entry.version.clone()).or_default() += 1;
    }
    for (stage, count) in &census {
        println!("{stage} : {count}");
    }
    Ok(())
}
