use crate::cmd::{friendly, load_config, load_service, save_sheet};
use anyhow::bail;
use shiftcrew_core::types::RowStatus;
use std::path::Path;

pub fn run(config_path: &Path, identifier: &str, status: RowStatus) -> anyhow::Result<()> {
    let cfg = load_config(config_path)?;
    let mut service = load_service(&cfg)?;

    let Some((row, current)) = service.lookup(identifier).map_err(friendly)? else {
        bail!("identifier '{}' is not registered", identifier.trim());
    };
    if current == status {
        println!("row {row} is already {}", status.as_str());
        return Ok(());
    }

    service.set_status(row, status).map_err(friendly)?;
    save_sheet(&cfg, &service)?;
    println!("row {row} is now {}", status.as_str());
    Ok(())
}
