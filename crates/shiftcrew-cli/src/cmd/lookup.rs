use crate::cmd::{friendly, load_config, load_service};
use crate::output;
use anyhow::bail;
use serde::Serialize;
use shiftcrew_core::store::RowStore;
use shiftcrew_core::types::Column;
use std::path::Path;

#[derive(Serialize)]
struct LookupReport {
    identifier: String,
    row: u32,
    name: String,
    status: String,
    materials: Option<String>,
}

pub fn run(config_path: &Path, identifier: &str, json: bool) -> anyhow::Result<()> {
    let cfg = load_config(config_path)?;
    let service = load_service(&cfg)?;

    let Some((row, status)) = service.lookup(identifier).map_err(friendly)? else {
        bail!("identifier '{}' is not registered", identifier.trim());
    };

    let record = service.store().read_row(row).map_err(friendly)?;
    let name = [Column::B, Column::C, Column::D]
        .iter()
        .map(|&c| record.get(c))
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let name = if name.is_empty() {
        record.get(Column::E).to_string()
    } else {
        name
    };
    let materials = match record.get(Column::F) {
        "" => None,
        cell => Some(cell.to_string()),
    };

    if json {
        output::print_json(&LookupReport {
            identifier: identifier.trim().to_string(),
            row,
            name,
            status: status.as_str().to_string(),
            materials,
        })?;
    } else {
        println!("row:       {row}");
        println!("name:      {name}");
        println!("status:    {}", status.as_str());
        println!("materials: {}", materials.as_deref().unwrap_or("-"));
    }
    Ok(())
}
