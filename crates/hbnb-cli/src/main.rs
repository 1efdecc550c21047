//! HBnB admin console.
//!
//! Provides the `hbnb` binary for inspecting and editing the object store
//! directly, without the HTTP server. It opens the same backend the server
//! would (see [`StorageConfig`]), unless `--storage` or `--path` override it.

use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use hbnb_core::{Entity, EntityKind};
use hbnb_storage::config::{DB_PATH_VAR, FILE_PATH_VAR, STORAGE_TYPE_VAR};
use hbnb_storage::{ObjectStore, StorageConfig};

/// HBnB object store console.
#[derive(Parser)]
#[command(name = "hbnb", about = "HBnB object store console")]
struct Cli {
    /// Backend to open (default: HBNB_TYPE_STORAGE, else file).
    #[arg(long, global = true)]
    storage: Option<Backend>,

    /// Document or database path for the selected backend.
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    File,
    Db,
}

impl Backend {
    fn as_str(self) -> &'static str {
        match self {
            Backend::File => "file",
            Backend::Db => "db",
        }
    }
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create an entity and print its id.
    Create {
        kind: EntityKind,
        /// Fields as name=value.
        #[arg(value_parser = parse_assignment)]
        fields: Vec<(String, Value)>,
    },
    /// Print one entity.
    Show { kind: EntityKind, id: String },
    /// Delete an entity and everything it owns.
    Destroy { kind: EntityKind, id: String },
    /// Print every entity, optionally of one kind.
    All { kind: Option<EntityKind> },
    /// Count entities, optionally of one kind.
    Count { kind: Option<EntityKind> },
    /// Update fields of an entity.
    Update {
        kind: EntityKind,
        id: String,
        /// Fields as name=value.
        #[arg(value_parser = parse_assignment, required = true)]
        fields: Vec<(String, Value)>,
    },
}

/// Parses `name=value`. The value is read as JSON when it parses; JSON
/// strings get underscores turned into spaces. Anything else is a plain
/// string.
fn parse_assignment(arg: &str) -> Result<(String, Value), String> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{arg}'"))?;
    if name.is_empty() {
        return Err(format!("missing field name in '{arg}'"));
    }
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(Value::String(s)) => Value::String(s.replace('_', " ")),
        Ok(value) => value,
        Err(_) => Value::String(raw.to_string()),
    };
    Ok((name.to_string(), value))
}

fn storage_config(storage: Option<Backend>, path: Option<PathBuf>) -> anyhow::Result<StorageConfig> {
    let path = path.map(|p| p.display().to_string());
    let config = StorageConfig::from_lookup(|var| match var {
        STORAGE_TYPE_VAR if storage.is_some() => storage.map(|b| b.as_str().to_string()),
        FILE_PATH_VAR | DB_PATH_VAR if path.is_some() => path.clone(),
        _ => std::env::var(var).ok(),
    })?;
    Ok(config)
}

fn print_entity(entity: &Entity) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(entity)?);
    Ok(())
}

fn run(store: &mut dyn ObjectStore, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Create { kind, fields } => {
            let fields: Map<String, Value> = fields.into_iter().collect();
            let entity = Entity::create(kind, &fields)?;
            let key = store.register(entity)?;
            store.save()?;
            println!("{}", key.id);
        }
        Commands::Show { kind, id } => {
            let entity = store
                .get(kind, &id)?
                .ok_or_else(|| anyhow!("no instance found: {kind}.{id}"))?;
            print_entity(entity)?;
        }
        Commands::Destroy { kind, id } => {
            if store.delete(kind, &id)?.is_none() {
                bail!("no instance found: {kind}.{id}");
            }
            store.save()?;
        }
        Commands::All { kind } => {
            let entities: Vec<&Entity> = store.all(kind)?.into_values().collect();
            println!("{}", serde_json::to_string_pretty(&entities)?);
        }
        Commands::Count { kind } => {
            println!("{}", store.count(kind)?);
        }
        Commands::Update { kind, id, fields } => {
            let patch: Map<String, Value> = fields.into_iter().collect();
            let entity = store
                .get_mut(kind, &id)?
                .ok_or_else(|| anyhow!("no instance found: {kind}.{id}"))?;
            entity.apply_update(&patch)?;
            store.save()?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = storage_config(cli.storage, cli.path)?;
    let mut store = config.open()?;
    let result = run(store.as_mut(), cli.command);
    store.close()?;
    result
}
