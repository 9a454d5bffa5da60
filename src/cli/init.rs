//! Init command - write a starter corpuslens.toml

use anyhow::{Context, Result};
use console::style;
use corpuslens::config::{CONFIG_FILE_NAMES, SAMPLE_CONFIG};
use std::path::Path;

/// Run the init command
pub fn run(dir: &Path, force: bool) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(CONFIG_FILE_NAMES[0]);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    std::fs::write(&config_path, SAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!("\nPut your texts in {} and run:", style("corpus/").cyan());
    println!("  {}", style("corpuslens analyze").bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false).unwrap();
        let path = dir.path().join("corpuslens.toml");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);

        std::fs::write(&path, "# edited").unwrap();
        assert!(run(dir.path(), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited");

        run(dir.path(), true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);
    }
}
