use anyhow::{Context, Result};
use cedict_core::{Config, Dictionary, FstStore, Index, SortedStore};
use cedict_tools::{format_definition, EntryReader};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Look up Chinese words in a CC-CEDICT dictionary by longest match.
#[derive(Parser)]
#[command(name = "cedict", version)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Word store path (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Read from `<PREFIX>.fst` + `<PREFIX>.bincode` artifacts instead of the word store
    #[arg(long, global = true, value_name = "PREFIX")]
    fst: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the word store from a plain-text CC-CEDICT dump
    Load {
        #[arg(long)]
        input: PathBuf,

        /// Rebuild even if the store already holds a dictionary
        #[arg(long)]
        force: bool,
    },
    /// Look up one or more queries
    Lookup {
        /// Print definitions as JSON
        #[arg(long)]
        json: bool,

        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Read queries from stdin, one per line
    Interactive,
    /// Write fst + bincode artifacts for a dump
    BuildFst {
        #[arg(long)]
        input: PathBuf,

        #[arg(long, value_name = "PREFIX", default_value = "data/cedict")]
        out: PathBuf,
    },
    /// Show store statistics
    Stats,
}

fn fst_paths(prefix: &Path) -> (PathBuf, PathBuf) {
    (prefix.with_extension("fst"), prefix.with_extension("bincode"))
}

fn open_dictionary(cli: &Cli, config: &Config) -> Result<Dictionary> {
    if let Some(prefix) = &cli.fst {
        let (fst_path, bin_path) = fst_paths(prefix);
        let store = FstStore::load(&fst_path, &bin_path)
            .with_context(|| format!("loading fst artifacts {}", fst_path.display()))?;
        return Ok(Dictionary::with_store(store, config));
    }
    Dictionary::open(config)
        .with_context(|| format!("opening word store {}", config.database_path.display()))
}

fn print_lookup(dict: &Dictionary, query: &str, json: bool) -> Result<()> {
    let defs = dict.lookup(query)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&defs)?);
    } else if defs.is_empty() {
        println!("  → (no words found)");
    } else {
        for def in &defs {
            println!("{}", format_definition(def));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cedict=info,cedict_core=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }

    match &cli.command {
        Command::Load { input, force } => {
            let dict = Dictionary::open(&config)
                .with_context(|| format!("opening word store {}", config.database_path.display()))?;
            let stats = if *force {
                Some(dict.try_load(EntryReader::open(input)?)?)
            } else {
                dict.load_if_empty(|| EntryReader::open(input))?
            };
            match stats {
                Some(s) => println!(
                    "Loaded {} entries under {} keys into {}",
                    s.entries,
                    s.keys,
                    config.database_path.display()
                ),
                None => println!(
                    "{} already holds a dictionary; use --force to rebuild",
                    config.database_path.display()
                ),
            }
            dict.close();
        }
        Command::Lookup { json, queries } => {
            let dict = open_dictionary(&cli, &config)?;
            for q in queries {
                if !json && queries.len() > 1 {
                    println!("# {}", q);
                }
                print_lookup(&dict, q, *json)?;
            }
        }
        Command::Interactive => {
            let dict = open_dictionary(&cli, &config)?;
            if dict.is_empty()? {
                eprintln!("⚠ dictionary is empty; run `cedict load --input <file>` first");
            }
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line?;
                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                print_lookup(&dict, query, false)?;
                println!();
            }
            let (hits, misses) = dict.cache_stats();
            info!(hits, misses, "session finished");
        }
        Command::BuildFst { input, out } => {
            let index: Index = cedict_core::try_index(EntryReader::open(input)?)?;
            let store = FstStore::from_index(&index)?;
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let (fst_path, bin_path) = fst_paths(out);
            store.save(&fst_path, &bin_path)?;
            println!(
                "Wrote {} keys to {} and {}",
                store.len()?,
                fst_path.display(),
                bin_path.display()
            );
        }
        Command::Stats => {
            let dict = open_dictionary(&cli, &config)?;
            match &cli.fst {
                Some(prefix) => println!("source: {} (fst)", prefix.display()),
                None => println!("source: {}", config.database_path.display()),
            }
            println!("keys:   {}", dict.key_count()?);
        }
    }

    Ok(())
}
