//! `pathtag resolve <identifier>` – print the logical path of an identifier.

use anyhow::Result;
use pathtag_core::logical_path::resolve_logical_path;

pub fn run_resolve(identifier: &str) -> Result<()> {
    match resolve_logical_path(identifier) {
        Some(path) => {
            println!("{path}");
            Ok(())
        }
        None => anyhow::bail!("not a valid storage identifier: {identifier}"),
    }
}
