//! pwvault CLI - Command line interface for password-based encryption.
//!
//! Encrypts and decrypts data with a vault described by a JSON
//! configuration, and exposes the KDFs for interoperability checks.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use pwvault_common::Password;
use pwvault_crypto::{Codec, KdfSpec, KeyDerivation};
use pwvault_vault::{VaultBuilder, VaultConfig};

/// Environment variable consulted before prompting for a password.
const PASSWORD_ENV: &str = "PWVAULT_PASSWORD";

#[derive(Parser)]
#[command(name = "pwvault")]
#[command(about = "pwvault - Password-based encryption")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt data and print the encoded payload.
    Encrypt {
        /// Vault configuration (JSON).
        #[arg(short, long)]
        config: PathBuf,

        /// Input file (default: stdin).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decrypt an encoded payload.
    Decrypt {
        /// Vault configuration (JSON).
        #[arg(short, long)]
        config: PathBuf,

        /// Input file (default: stdin).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Derive a key and print it as hex.
    Derive {
        /// KDF spec (JSON).
        #[arg(short, long)]
        kdf: PathBuf,

        /// Salt as hex.
        #[arg(short, long, default_value = "")]
        salt: String,
    },

    /// Print a KDF spec in canonical form, defaults applied.
    Spec {
        /// KDF spec (JSON).
        #[arg(short, long)]
        kdf: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Encrypt {
            config,
            input,
            output,
        } => cmd_encrypt(&config, input.as_deref(), output.as_deref()),

        Commands::Decrypt {
            config,
            input,
            output,
        } => cmd_decrypt(&config, input.as_deref(), output.as_deref()),

        Commands::Derive { kdf, salt } => cmd_derive(&kdf, &salt),

        Commands::Spec { kdf } => cmd_spec(&kdf),
    }
}

/// Read the password from the environment, or prompt for it.
fn read_password() -> Result<Password> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        debug!("Using password from {}", PASSWORD_ENV);
        return Ok(Password::from(password));
    }
    let password = rpassword::prompt_password("Enter password: ").context("Failed to read password")?;
    Ok(Password::from(password))
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path).with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
            Ok(data)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn load_spec(path: &Path) -> Result<KdfSpec> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    KdfSpec::from_json(&json).context("Invalid KDF spec")
}

fn open_vault(config: &Path) -> Result<Box<dyn pwvault_vault::Vault>> {
    let config = VaultConfig::load(config)
        .with_context(|| format!("Failed to load vault config {}", config.display()))?;
    info!("Opening {} vault", config.vault_type);

    let builder = VaultBuilder::from_config(&config).context("Invalid vault config")?;
    let vault = builder
        .with_password(read_password()?)
        .build()
        .context("Failed to open vault")?;
    Ok(vault)
}

/// Encrypt input and write the encoded payload.
fn cmd_encrypt(config: &Path, input: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let vault = open_vault(config)?;
    let data = read_input(input)?;

    let result = vault.encrypt_encoded(&data);
    vault.close();
    let mut encoded = result.context("Encryption failed")?;
    encoded.push('\n');

    write_output(output, encoded.as_bytes())?;
    info!("Encrypted {} bytes", data.len());
    Ok(())
}

/// Decode and decrypt a payload.
fn cmd_decrypt(config: &Path, input: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let vault = open_vault(config)?;
    let data = read_input(input)?;
    let text = String::from_utf8(data).context("Payload is not valid text")?;

    let result = vault.decrypt_encoded(text.trim());
    vault.close();
    let plaintext = result.context("Decryption failed")?;

    write_output(output, &plaintext)?;
    info!("Decrypted {} bytes", plaintext.len());
    Ok(())
}

/// Derive a key for a given salt.
fn cmd_derive(kdf: &Path, salt: &str) -> Result<()> {
    let spec = load_spec(kdf)?;
    let salt = Codec::Hex.decode(salt).context("Salt must be hex")?;
    let password = read_password()?;

    info!("Deriving {} byte key with {}", spec.derived_key_length(), spec.function());
    let key = spec
        .kdf()
        .context("Unsupported KDF parameters")?
        .derive_key(password.as_bytes(), &salt)
        .context("Key derivation failed")?;

    println!("{}", Codec::Hex.encode(key.as_bytes()));
    Ok(())
}

/// Print a normalised spec.
fn cmd_spec(kdf: &Path) -> Result<()> {
    let spec = load_spec(kdf)?;
    let json = serde_json::to_string_pretty(&spec).context("Failed to serialize spec")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_derive() {
        let cli = Cli::try_parse_from(["pwvault", "derive", "--kdf", "kdf.json", "--salt", "0001"])
            .unwrap();
        match cli.command {
            Commands::Derive { kdf, salt } => {
                assert_eq!(kdf, PathBuf::from("kdf.json"));
                assert_eq!(salt, "0001");
            }
            _ => panic!("expected derive"),
        }
    }
}
