// src/bin/rotate_master.rs
//! Change the master secret of a local record vault
//!
//! Usage: rotate_master <user-id> [collection ...]
//! With no collections given, every standard collection is rotated.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use encrypted_record_vault::{load_config, Collection, InMemorySecretHolder, RotationError, Vault};
use rpassword::read_password;
use tracing::{error, info, warn};

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    Ok(read_password()?.trim_end().to_owned())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let user = args
        .next()
        .context("usage: rotate_master <user-id> [collection ...]")?;
    let named: Vec<String> = args.collect();
    let collections: Vec<&str> = if named.is_empty() {
        Collection::ALL.iter().map(|c| c.as_str()).collect()
    } else {
        named.iter().map(String::as_str).collect()
    };

    let config = load_config();
    info!(db = %config.paths.record_db, "opening record vault");
    let vault = Vault::open(config, Arc::new(InMemorySecretHolder::new()))
        .context("Failed to open record database")?;

    let old = prompt("Current master password")?;
    let new = prompt("New master password")?;
    if prompt("Repeat new master password")? != new {
        bail!("new passwords do not match");
    }

    vault.set_active_secret(&old)?;

    match vault.rotate_master_secret(&user, &old, &new, &collections) {
        Ok(report) => {
            println!("\n=== PASSWORD CHANGED ===");
            println!("Re-encrypted: {}", report.rotated.join(", "));
            if !report.skipped.is_empty() {
                println!("Nothing stored for: {}", report.skipped.join(", "));
            }
            Ok(())
        }
        Err(err @ RotationError::PartialFailure { .. }) => {
            error!(error = %err, "rotation left the vault in a mixed state, retrying once");
            let repair = err.into_repair().context("partial failure without repair handle")?;
            let report = vault
                .repair_rotation(repair)
                .context("password change partially failed; restore from backup")?;
            warn!(rotated = report.rotated.len(), "rotation completed on retry");
            println!("Password changed after retry.");
            Ok(())
        }
        Err(err) => Err(err).context("password change failed; vault left in previous state"),
    }
}
