//! LazyKV CLI
//!
//! Command-line interface for inspecting and editing a LazyKV file.

use clap::{Parser, Subcommand, ValueEnum};
use lazykv::{Config, Engine, Key, LazyError, Value};
use tracing_subscriber::{fmt, EnvFilter};

/// LazyKV CLI
#[derive(Parser, Debug)]
#[command(name = "lazykv-cli")]
#[command(about = "CLI for the LazyKV single-file key-value store")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(short, long, default_value = "./lazykv.db")]
    db: String,

    /// Treat keys as integers
    #[arg(short, long, global = true)]
    int_key: bool,

    /// Integer key width in bytes (new files only)
    #[arg(long, default_value = "4")]
    key_int_size: usize,

    /// Content-length field width in bytes (new files only)
    #[arg(long, default_value = "4")]
    content_int_size: usize,

    /// Integer-list element width in bytes (new files only)
    #[arg(long, default_value = "4")]
    int_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Store a value under a new key
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// How to interpret the value
        #[arg(short = 't', long = "type", value_enum, default_value = "text")]
        kind: ValueKind,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List keys with their index offsets
    Keys,

    /// Show widths, entry count and file size
    Info,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ValueKind {
    /// UTF-8 text
    Text,
    /// Non-negative integer
    Int,
    /// JSON document
    Json,
    /// Comma-separated non-negative integers
    Ints,
    /// Hex-encoded raw bytes
    Hex,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,lazykv=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> lazykv::Result<()> {
    let config = Config::builder()
        .path(&args.db)
        .key_int_size(args.key_int_size)
        .content_int_size(args.content_int_size)
        .int_size(args.int_size)
        .build();

    let mut engine = Engine::open(config)?;
    let key_of = |raw: &str| parse_key(raw, args.int_key);

    match &args.command {
        Commands::Get { key } => {
            let value = engine.read(key_of(key.as_str())?)?;
            println!("{}", render(&value));
        }
        Commands::Set { key, value, kind } => {
            engine.write(key_of(key.as_str())?, parse_value(value, *kind)?)?;
        }
        Commands::Del { key } => {
            engine.delete(key_of(key.as_str())?)?;
        }
        Commands::Keys => {
            let mut entries: Vec<_> = engine.index().iter().collect();
            entries.sort_by_key(|(_, offset)| **offset);
            for (key, offset) in entries {
                println!("{}\t{}", offset, key);
            }
        }
        Commands::Info => {
            let header = engine.header();
            println!("path:             {}", engine.path().display());
            println!("key_int_size:     {}", header.key_int_size);
            println!("content_int_size: {}", header.content_int_size);
            println!("int_size:         {}", header.int_size);
            println!("entries:          {}", engine.len());
            println!("header bytes:     {}", engine.header_len());
            println!("file bytes:       {}", engine.file_len());
        }
    }

    engine.close()
}

fn parse_key(raw: &str, int_key: bool) -> lazykv::Result<Key> {
    if !int_key {
        return Ok(Key::from(raw));
    }
    raw.parse::<u64>()
        .map(Key::Int)
        .map_err(|e| LazyError::Encoding(format!("invalid integer key {:?}: {}", raw, e)))
}

fn parse_value(raw: &str, kind: ValueKind) -> lazykv::Result<Value> {
    match kind {
        ValueKind::Text => Ok(Value::from(raw)),
        ValueKind::Int => raw
            .parse::<i128>()
            .map(Value::Integer)
            .map_err(|e| LazyError::Encoding(format!("invalid integer {:?}: {}", raw, e))),
        ValueKind::Json => serde_json::from_str(raw)
            .map(Value::Document)
            .map_err(|e| LazyError::Encoding(format!("invalid JSON: {}", e))),
        ValueKind::Ints => {
            let items = raw
                .split(',')
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(|item| {
                    item.parse::<i64>().map_err(|e| {
                        LazyError::Encoding(format!("invalid list element {:?}: {}", item, e))
                    })
                })
                .collect::<lazykv::Result<Vec<i64>>>()?;
            Value::try_from(items)
        }
        ValueKind::Hex => hex::decode(raw)
            .map(Value::Bytes)
            .map_err(|e| LazyError::Encoding(format!("invalid hex: {}", e))),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Text(text) => text.clone(),
        Value::Integer(int) => int.to_string(),
        Value::Document(document) => document.to_string(),
        Value::IntList(items) => items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(","),
        Value::Bytes(raw) => hex::encode(raw),
    }
}
