use crate::cmd::load_config;
use anyhow::bail;
use shiftcrew_core::config::WarnLevel;
use std::path::Path;

pub fn run(config_path: &Path) -> anyhow::Result<()> {
    let cfg = load_config(config_path)?;
    let warnings = cfg.validate();

    if warnings.is_empty() {
        println!("configuration OK: {}", config_path.display());
        return Ok(());
    }

    let mut errors = 0;
    for warning in &warnings {
        let label = match warning.level {
            WarnLevel::Warning => "warning",
            WarnLevel::Error => {
                errors += 1;
                "error"
            }
        };
        println!("{label}: {}", warning.message);
    }

    if errors > 0 {
        bail!("{errors} configuration error(s)");
    }
    Ok(())
}
