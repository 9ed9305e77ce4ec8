//! Treedoc CLI
//!
//! Entry point for the `treedoc` command-line tool.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path as FsPath, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use treedoc::config::{self, ConfigOverlay, HomeConfig};
use treedoc::{Document, Manifest, ManifestNode, Path, Segment, Value};
use treedoc_value::serialize_value;

#[derive(Parser)]
#[command(name = "treedoc")]
#[command(about = "Hierarchical JSON documents, configuration and manifests", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a document
    Show {
        file: PathBuf,

        /// Indented output
        #[arg(long)]
        pretty: bool,
    },

    /// Read a value at a path such as `storage/config/[0]/uri`
    Get {
        file: PathBuf,
        path: String,

        /// How to read the value
        #[arg(long = "as", value_enum, default_value = "string")]
        read_as: ReadAs,
    },

    /// Write a value at a path, creating intermediate nodes
    Set {
        file: PathBuf,
        path: String,
        value: String,

        /// Parse the value as JSON instead of storing it as a string
        #[arg(long)]
        json: bool,
    },

    /// List every value stored under a key, at any depth
    Search { file: PathBuf, key: String },

    /// Merge the fragments of a directory into a document and print the result
    Merge {
        file: PathBuf,
        dir: PathBuf,

        /// Fragment extensions (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "json")]
        ext: Vec<String>,
    },

    /// System configuration commands
    Config {
        /// Home directory (default: $TREEDOC_HOME, then ~/.treedoc)
        #[arg(long)]
        home: Option<PathBuf>,

        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Manifest commands
    Manifest {
        file: PathBuf,

        #[command(subcommand)]
        action: ManifestCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Read a configuration value
    Get {
        path: String,

        #[arg(long = "as", value_enum, default_value = "string")]
        read_as: ReadAs,
    },

    /// Rewrite the system configuration file, creating it if missing
    Store,

    /// Copy the system configuration to its .old backup
    Backup,

    /// List the fragments merged into each tier
    Sources,

    /// Show home directory and configuration state
    Status,
}

#[derive(Subcommand)]
enum ManifestCommands {
    /// Print the node tree
    List,

    /// Append a top-level node
    Add { id: String, title: String },

    /// Append a child node
    AddChild {
        parent: String,
        id: String,
        title: String,
    },

    /// Move a node to the end of a parent's children (top level when omitted)
    Move { id: String, destination: Option<String> },

    /// Move a node in front of a sibling
    MoveBefore { id: String, destination: String },

    /// Move a node behind a sibling
    MoveAfter { id: String, destination: String },

    /// Delete a node and its subtree
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReadAs {
    #[value(name = "string")]
    Text,
    Int,
    Bool,
    List,
    Json,
}

/// Typed reads shared by plain documents and the configuration overlay.
trait Lookup {
    fn value(&self, path: &[Segment]) -> Option<&Value>;
    fn string(&self, path: &[Segment]) -> Option<String>;
    fn integer(&self, path: &[Segment]) -> Option<i64>;
    fn boolean(&self, path: &[Segment]) -> Option<bool>;
    fn string_list(&self, path: &[Segment]) -> Option<Vec<String>>;
}

impl Lookup for Document {
    fn value(&self, path: &[Segment]) -> Option<&Value> {
        self.get_path(path)
    }

    fn string(&self, path: &[Segment]) -> Option<String> {
        self.get_string(None, path)
    }

    fn integer(&self, path: &[Segment]) -> Option<i64> {
        self.get_integer(None, path)
    }

    fn boolean(&self, path: &[Segment]) -> Option<bool> {
        self.get_boolean(None, path)
    }

    fn string_list(&self, path: &[Segment]) -> Option<Vec<String>> {
        self.get_string_list(path)
    }
}

impl Lookup for ConfigOverlay {
    fn value(&self, path: &[Segment]) -> Option<&Value> {
        self.get_path(path)
    }

    fn string(&self, path: &[Segment]) -> Option<String> {
        self.get_string(None, path)
    }

    fn integer(&self, path: &[Segment]) -> Option<i64> {
        self.get_integer(None, path)
    }

    fn boolean(&self, path: &[Segment]) -> Option<bool> {
        self.get_boolean(None, path)
    }

    fn string_list(&self, path: &[Segment]) -> Option<Vec<String>> {
        self.get_string_list(path)
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "treedoc=info,treedoc_value=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { file, pretty } => {
            let document = load_document(&file);
            println!("{}", document.to_json_string(pretty));
        }
        Commands::Get { file, path, read_as } => {
            let document = load_document(&file);
            print_lookup(&document, &parse_path(&path), read_as);
        }
        Commands::Set {
            file,
            path,
            value,
            json,
        } => {
            run_set(&file, &path, value, json);
        }
        Commands::Search { file, key } => {
            let document = load_document(&file);
            for value in document.search(&key) {
                println!("{}", value);
            }
        }
        Commands::Merge { file, dir, ext } => {
            run_merge(&file, &dir, &ext);
        }
        Commands::Config { home, action } => {
            run_config(home, action);
        }
        Commands::Manifest { file, action } => {
            run_manifest(&file, action);
        }
    }
}

fn load_document(file: &FsPath) -> Document {
    match Document::from_file(file) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error loading {}: {}", file.display(), e);
            process::exit(1);
        }
    }
}

fn parse_path(text: &str) -> Path {
    match Path::parse(text) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Invalid path '{}': {}", text, e);
            process::exit(1);
        }
    }
}

fn save(file: &FsPath, text: String) {
    if let Err(e) = fs::write(file, text) {
        eprintln!("Error writing {}: {}", file.display(), e);
        process::exit(1);
    }
}

fn print_lookup(source: &impl Lookup, path: &Path, read_as: ReadAs) {
    let output = match read_as {
        ReadAs::Text => source.string(path),
        ReadAs::Int => source.integer(path).map(|v| v.to_string()),
        ReadAs::Bool => source.boolean(path).map(|v| v.to_string()),
        ReadAs::List => source.string_list(path).map(|list| list.join("\n")),
        ReadAs::Json => source
            .value(path)
            .map(|v| serialize_value(v, true)),
    };

    match output {
        Some(text) => println!("{}", text),
        None => {
            eprintln!("No {:?} value at '{}'", read_as, path);
            process::exit(1);
        }
    }
}

fn run_set(file: &FsPath, path_text: &str, raw: String, json: bool) {
    let mut document = load_document(file);
    let path = parse_path(path_text);

    let value = if json {
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("Invalid JSON value: {}", e);
                process::exit(1);
            }
        }
    } else {
        Value::String(raw)
    };

    if document.write_value(&path, value).is_none() {
        eprintln!("Cannot write '{}': an existing node is in the way", path);
        process::exit(1);
    }
    save(file, document.to_json_string(true));
}

fn run_merge(file: &FsPath, dir: &FsPath, extensions: &[String]) {
    let mut document = load_document(file);
    match config::merge_directory(&mut document, dir, extensions) {
        Ok(merged) => {
            for source in &merged {
                eprintln!("merged {} ({})", source.path, source.sha256);
            }
            println!("{}", document.to_json_string(true));
        }
        Err(e) => {
            eprintln!("Error merging {}: {}", dir.display(), e);
            process::exit(1);
        }
    }
}

fn run_config(home: Option<PathBuf>, action: ConfigCommands) {
    let home = match HomeConfig::resolve(home) {
        Ok(home) => home,
        Err(e) => {
            eprintln!("Error resolving home directory: {}", e);
            process::exit(1);
        }
    };

    if let ConfigCommands::Backup = action {
        match home.backup_system_file() {
            Ok(backup) => println!("{}", backup.display()),
            Err(e) => {
                eprintln!("Error backing up configuration: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let overlay = match ConfigOverlay::system(home) {
        Ok(overlay) => overlay,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    match action {
        ConfigCommands::Get { path, read_as } => {
            print_lookup(&overlay, &parse_path(&path), read_as);
        }
        ConfigCommands::Store => match overlay.store_system_config() {
            Ok(file) => println!("{}", file.display()),
            Err(e) => {
                eprintln!("Error storing configuration: {}", e);
                process::exit(1);
            }
        },
        ConfigCommands::Sources => {
            let output = serde_json::json!({
                "instance": overlay.instance_fragments(),
                "system": overlay.system_fragments(),
            });
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing output: {}", e);
                    process::exit(1);
                }
            }
        }
        ConfigCommands::Status => {
            println!("Home: {}", overlay.home().path.display());
            println!("System file: {}", overlay.home().system_file().display());
            println!("Configured: {}", overlay.is_configured());
            println!("Outdated: {}", overlay.is_outdated());
        }
        ConfigCommands::Backup => {}
    }
}

fn run_manifest(file: &FsPath, action: ManifestCommands) {
    let mut manifest = match Manifest::from_file(file) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("Error loading manifest {}: {}", file.display(), e);
            process::exit(1);
        }
    };

    let changed = match action {
        ManifestCommands::List => {
            if let Some(title) = manifest.title() {
                println!("{}", title);
            }
            for node in manifest.top_nodes() {
                print_node(&node, 1);
            }
            println!("({} nodes)", manifest.size());
            return;
        }
        ManifestCommands::Add { id, title } => manifest.add_top_node(&id, &title),
        ManifestCommands::AddChild { parent, id, title } => {
            manifest.add_child(&parent, &id, &title)
        }
        ManifestCommands::Move { id, destination } => {
            manifest.move_into(&id, destination.as_deref())
        }
        ManifestCommands::MoveBefore { id, destination } => {
            manifest.move_before(&id, &destination)
        }
        ManifestCommands::MoveAfter { id, destination } => manifest.move_after(&id, &destination),
        ManifestCommands::Delete { id } => manifest.delete(&id),
    };

    if !changed {
        eprintln!("Manifest unchanged: node not found or move not allowed");
        process::exit(1);
    }
    save(file, manifest.to_json_string(true));
}

fn print_node(node: &ManifestNode, depth: usize) {
    let marker = if node.hidden { " (hidden)" } else { "" };
    println!(
        "{}{} {}{}",
        "  ".repeat(depth),
        node.key,
        node.title.as_deref().unwrap_or("-"),
        marker
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
