//! Get Account Address from SDK Config
//!
//! Loads the account key referenced by the SDK configuration and prints the
//! account address derived from it.
//!
//! ## Usage
//!
//! ```bash
//! SDK_CONFIG_PATH=config.toml cargo run --bin get_account_address
//! ```

use anyhow::{Context, Result};
use sdk_config::config::load_document_from_path;
use sdk_config::load_private_key_from_pem;

fn main() -> Result<()> {
    let document = load_document_from_path(std::env::args().nth(1).as_deref())?;

    let key_file = document
        .account
        .and_then(|a| a.key_file)
        .context("Account.KeyFile has not been set")?;
    let key = load_private_key_from_pem(&key_file)?;

    println!("{}", key.address()?);

    Ok(())
}
