//! RefLens CLI
//!
//! Operator tool for classifying referer URLs and inspecting referer
//! database definitions.

use std::collections::BTreeMap;
use std::fs;

use clap::{Parser, Subcommand};

use rl_core::{AllowList, Classifier, Medium, RefererDatabase};

#[derive(Parser)]
#[command(name = "rl-cli")]
#[command(about = "RefLens referer classification tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a referer URL against a page host
    Classify {
        /// Referer URL to classify
        referer: String,

        /// Host of the page that received the visit
        #[arg(short, long)]
        page_host: String,

        /// Referer database definition (JSON)
        #[arg(short, long)]
        database: String,

        /// Internal-domains allow-list: local path or http(s) URL
        #[arg(short, long)]
        allow_list: Option<String>,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a referer database definition
    Validate {
        /// Definition file to validate
        #[arg(short, long)]
        database: String,
    },

    /// Dump database stats
    Info {
        /// Definition file to inspect
        #[arg(short, long)]
        database: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Classify {
            referer,
            page_host,
            database,
            allow_list,
            json,
        } => cmd_classify(&referer, &page_host, &database, allow_list.as_deref(), json),
        Commands::Validate { database } => cmd_validate(&database),
        Commands::Info { database } => cmd_info(&database),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_database(path: &str) -> Result<RefererDatabase, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;

    RefererDatabase::from_json(&text).map_err(|e| format!("Corrupt database '{}': {}", path, e))
}

fn load_allow_list(source: &str) -> Result<AllowList, String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| format!("Failed to start runtime: {}", e))?;
        runtime
            .block_on(rl_fetch::fetch_allow_list(source))
            .map_err(|e| format!("Failed to fetch '{}': {}", source, e))
    } else {
        rl_fetch::read_allow_list_file(source).map_err(|e| e.to_string())
    }
}

fn cmd_classify(
    referer: &str,
    page_host: &str,
    database: &str,
    allow_list: Option<&str>,
    json: bool,
) -> Result<(), String> {
    let classifier = Classifier::new(load_database(database)?);

    let list = match allow_list {
        Some(source) => Some(load_allow_list(source)?),
        None => None,
    };

    match classifier.classify_with_allow_list(referer, page_host, list.as_ref()) {
        Some(result) if json => {
            let rendered = serde_json::to_string_pretty(&result)
                .map_err(|e| format!("Failed to encode result: {}", e))?;
            println!("{rendered}");
        }
        Some(result) => {
            println!("Medium:  {}", result.medium);
            println!("Source:  {}", result.source.as_deref().unwrap_or("-"));
            println!("Term:    {}", result.term.as_deref().unwrap_or("-"));
        }
        None if json => println!("null"),
        None => println!("Not a referer"),
    }

    Ok(())
}

fn cmd_validate(database: &str) -> Result<(), String> {
    let db = load_database(database)?;

    println!("Database '{}' is valid", database);
    println!("  Sources:  {}", db.source_count());
    println!("  Domains:  {}", db.domain_count());

    Ok(())
}

fn cmd_info(database: &str) -> Result<(), String> {
    let db = load_database(database)?;

    let mut sources_per_medium: BTreeMap<Medium, usize> = BTreeMap::new();
    for record in db.sources() {
        *sources_per_medium.entry(record.medium).or_insert(0) += 1;
    }

    println!("Database: {}", database);
    println!("  Sources:  {}", db.source_count());
    println!("  Domains:  {}", db.domain_count());
    println!();

    println!("Sources per medium:");
    for (medium, count) in &sources_per_medium {
        println!("  {:<8} {}", medium.as_str(), count);
    }

    Ok(())
}
