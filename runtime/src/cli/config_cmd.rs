//! `studymatch config`: show the effective configuration.

use crate::cli::output::{self, Styled};
use crate::config::{studymatch_home, StudyMatchConfig, CONFIG_FILE};
use anyhow::Result;

pub fn run(config: &StudyMatchConfig) -> Result<()> {
    if output::is_json() {
        output::print_json(&serde_json::to_value(config)?);
        return Ok(());
    }

    let s = Styled::new();
    let path = studymatch_home().join(CONFIG_FILE);
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("defaults ({} not found)", path.display())
    };
    eprintln!("  {}", s.dim(&format!("# {source}")));
    println!("{}", config.to_toml()?);
    Ok(())
}
