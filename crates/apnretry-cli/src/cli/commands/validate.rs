//! `apnretry validate` – check a carrier policy file.

use anyhow::{bail, Result};
use apnretry_core::config::read_policy_file;
use apnretry_core::policy::loader;
use std::path::Path;

pub fn run_validate(path: &Path) -> Result<()> {
    let raw = read_policy_file(path)?;
    match loader::load(Some(&raw)) {
        Ok(Some(table)) => {
            println!(
                "{}: ok ({} policies in {} APN groups)",
                path.display(),
                table.len(),
                table.group_count()
            );
            Ok(())
        }
        Ok(None) => {
            println!("{}: empty, built-in defaults apply", path.display());
            Ok(())
        }
        Err(err) => bail!("{}: rejected: {}", path.display(), err),
    }
}
