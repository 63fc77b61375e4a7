use clap::{Parser, Subcommand};
use speck_simon::{backend_by_name, Cipher, VariantConfig};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "speck-simon")]
#[command(about = "Speck and Simon block cipher CLI tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key for a variant and save it to ~/.speck-simon/
    GenerateKey {
        /// Variant name, e.g. speck64/128 or simon128/256
        #[arg(short, long, default_value = "speck64/128")]
        variant: String,

        /// Name for the key file (without extension)
        #[arg(short, long, default_value = "default")]
        name: String,

        /// Overwrite existing key file
        #[arg(short, long)]
        force: bool,
    },

    /// Encrypt a single block given in hex
    Encrypt {
        /// Name of the key to use
        #[arg(short, long, default_value = "default")]
        key: String,

        /// Block as hex, little-endian words, word 0 first
        #[arg(short, long)]
        block: String,

        /// Backend: generic or native
        #[arg(long, default_value = "generic")]
        backend: String,
    },

    /// Decrypt a single block given in hex
    Decrypt {
        /// Name of the key to use
        #[arg(short, long, default_value = "default")]
        key: String,

        /// Block as hex, little-endian words, word 0 first
        #[arg(short, long)]
        block: String,

        /// Backend: generic or native
        #[arg(long, default_value = "generic")]
        backend: String,
    },

    /// Print the expanded round keys of a saved key
    Schedule {
        /// Name of the key
        #[arg(short, long, default_value = "default")]
        key: String,
    },

    /// List all saved keys
    ListKeys,

    /// Show information about a key
    KeyInfo {
        /// Name of the key
        #[arg(short, long, default_value = "default")]
        name: String,
    },

    /// List supported variants
    Variants,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateKey {
            variant,
            name,
            force,
        } => {
            generate_key(&variant, &name, force);
        }
        Commands::Encrypt {
            key,
            block,
            backend,
        } => {
            run_block(&key, &block, &backend, Direction::Encrypt);
        }
        Commands::Decrypt {
            key,
            block,
            backend,
        } => {
            run_block(&key, &block, &backend, Direction::Decrypt);
        }
        Commands::Schedule { key } => {
            print_schedule(&key);
        }
        Commands::ListKeys => {
            list_keys();
        }
        Commands::KeyInfo { name } => {
            key_info(&name);
        }
        Commands::Variants => {
            list_variants();
        }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn invalid_key_file(path: &Path) -> ! {
    fail(format!("Invalid key format in {}", path.display()))
}

fn get_key_dir() -> PathBuf {
    let mut home = dirs::home_dir().unwrap_or_else(|| fail("Could not find home directory"));
    home.push(".speck-simon");
    home
}

fn ensure_key_dir() -> io::Result<()> {
    let dir = get_key_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(())
}

fn get_key_path(name: &str) -> PathBuf {
    let mut path = get_key_dir();
    path.push(format!("{}.key", name));
    path
}

fn generate_key(variant: &str, name: &str, force: bool) {
    let config = VariantConfig::by_name(variant).unwrap_or_else(|e| fail(e));
    let key_path = get_key_path(name);

    if key_path.exists() && !force {
        fail(format!(
            "Key '{}' already exists. Use --force to overwrite.",
            name
        ));
    }

    if let Err(e) = ensure_key_dir() {
        fail(format!("Failed to create .speck-simon directory: {}", e));
    }

    let key_hex = hex::encode(config.random_key());
    let contents = format!("{}\n{}\n", config.name(), key_hex);
    if let Err(e) = fs::write(&key_path, contents) {
        fail(format!("Failed to save key: {}", e));
    }

    info!(variant = %config, path = %key_path.display(), "generated key");
    println!("Generated new {} key '{}': {}", config, name, key_hex);
    println!("Key saved to: {}", key_path.display());
}

/// Reads `<name>.key`: the variant name on the first line, the key hex on the second.
fn load_key(name: &str) -> (VariantConfig, Vec<u8>) {
    let key_path = get_key_path(name);

    if !key_path.exists() {
        fail(format!(
            "Key '{}' not found. Generate it first with 'speck-simon generate-key --name {}'",
            name, name
        ));
    }

    let contents = fs::read_to_string(&key_path)
        .unwrap_or_else(|e| fail(format!("Failed to read key file: {}", e)));
    let mut lines = contents.lines().map(str::trim).filter(|l| !l.is_empty());

    let config = lines
        .next()
        .and_then(|l| VariantConfig::by_name(l).ok())
        .unwrap_or_else(|| invalid_key_file(&key_path));
    let key = lines
        .next()
        .and_then(|l| hex::decode(l).ok())
        .unwrap_or_else(|| invalid_key_file(&key_path));

    if key.len() != config.key_bytes() {
        fail(format!(
            "Key in {} is {} bytes, {} needs {}",
            key_path.display(),
            key.len(),
            config,
            config.key_bytes()
        ));
    }

    debug!(variant = %config, key = name, "loaded key");
    (config, key)
}

fn run_block(key_name: &str, block_hex: &str, backend: &str, direction: Direction) {
    let (config, key) = load_key(key_name);
    let backend = backend_by_name(backend).unwrap_or_else(|| {
        fail(format!(
            "Unsupported backend: {}. Use generic or native",
            backend
        ))
    });

    let cipher = Cipher::with_backend(config, &key, backend).unwrap_or_else(|e| fail(e));

    let mut block = hex::decode(block_hex.trim())
        .unwrap_or_else(|e| fail(format!("Invalid hex block: {}", e)));

    let result = match direction {
        Direction::Encrypt => cipher.encrypt_block(&mut block),
        Direction::Decrypt => cipher.decrypt_block(&mut block),
    };
    if let Err(e) = result {
        fail(e);
    }

    println!("{}", hex::encode(block));
}

fn print_schedule(key_name: &str) {
    let (config, key) = load_key(key_name);
    let cipher = Cipher::new(config, &key).unwrap_or_else(|e| fail(e));
    let digits = config.word().bytes() * 2;

    println!("{} round keys ({} rounds):", config, config.rounds());
    for (i, k) in cipher.schedule().keys().iter().enumerate() {
        println!("  {:>3}: {:0width$x}", i, k, width = digits);
    }
}

fn list_keys() {
    if let Err(e) = ensure_key_dir() {
        fail(format!("Failed to access .speck-simon directory: {}", e));
    }

    let entries = fs::read_dir(get_key_dir())
        .unwrap_or_else(|e| fail(format!("Failed to read .speck-simon directory: {}", e)));

    let mut keys: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "key"))
        .filter_map(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
        })
        .collect();
    keys.sort();

    if keys.is_empty() {
        println!("No keys found. Generate one with 'speck-simon generate-key'");
    } else {
        println!("Available keys:");
        for key in keys {
            println!("  {}", key);
        }
    }
}

fn key_info(name: &str) {
    let key_path = get_key_path(name);
    let metadata =
        fs::metadata(&key_path).unwrap_or_else(|_| fail(format!("Key '{}' not found", name)));
    let (config, key) = load_key(name);

    println!("Key: {}", name);
    println!("Path: {}", key_path.display());
    println!("Size: {} bytes", metadata.len());
    println!("Variant: {}", config);
    println!("Rounds: {}", config.rounds());

    if let Ok(created) = metadata.created() {
        println!("Created: {:?}", created);
    }

    // Show first few characters of the key
    let key_hex = hex::encode(key);
    println!("Key (first 8 chars): {}...", &key_hex[..8.min(key_hex.len())]);
}

fn list_variants() {
    println!(
        "{:<14} {:>6} {:>6} {:>6} {:>6}",
        "variant", "word", "key", "block", "rounds"
    );
    for config in VariantConfig::all() {
        println!(
            "{:<14} {:>6} {:>6} {:>6} {:>6}",
            config.name(),
            config.word_bits(),
            config.key_bytes(),
            config.block_bytes(),
            config.rounds()
        );
    }
}
