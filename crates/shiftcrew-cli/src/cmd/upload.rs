use crate::cmd::{friendly, load_config, load_service, save_sheet};
use crate::output;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::Serialize;
use shiftcrew_core::config::{Config, StorageBackend};
use shiftcrew_core::disk::DiskClient;
use shiftcrew_core::drive::LocalDrive;
use shiftcrew_core::types::RowStatus;
use shiftcrew_core::upload::{DriveStore, MaterialFile, MaterialReference, MaterialUploadService};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct UploadReport {
    identifier: String,
    row: u32,
    files: usize,
    path: String,
    public_url: Option<String>,
}

pub fn run(
    config_path: &Path,
    identifier: &str,
    files: &[PathBuf],
    date: Option<NaiveDate>,
    json: bool,
) -> anyhow::Result<()> {
    let cfg = load_config(config_path)?;
    let mut service = load_service(&cfg)?;

    let Some((row, status)) = service.lookup(identifier).map_err(friendly)? else {
        bail!("identifier '{}' is not registered", identifier.trim());
    };
    if status == RowStatus::Archived {
        bail!("row {row} is archived; restore it before uploading materials");
    }

    let materials = read_files(files)?;
    let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());

    let reference = match &cfg.storage.backend {
        StorageBackend::Local { dir } => {
            let drive = LocalDrive::new(dir.clone());
            push(&cfg, drive, date, row, identifier, &materials)?
        }
        StorageBackend::Disk { api_base, .. } => {
            let token = cfg.storage.backend.resolve_token().map_err(friendly)?;
            let drive = DiskClient::new(api_base.clone(), token).map_err(friendly)?;
            push(&cfg, drive, date, row, identifier, &materials)?
        }
    };

    service
        .record_material_reference(row, reference.as_cell_value())
        .map_err(friendly)?;
    save_sheet(&cfg, &service)?;

    if json {
        output::print_json(&UploadReport {
            identifier: identifier.trim().to_string(),
            row,
            files: materials.len(),
            path: reference.path.clone(),
            public_url: reference.public_url.clone(),
        })?;
    } else {
        println!("uploaded {} file(s) to {}", materials.len(), reference.path);
        if let Some(url) = &reference.public_url {
            println!("public link: {url}");
        }
    }
    Ok(())
}

fn push<D: DriveStore>(
    cfg: &Config,
    drive: D,
    date: NaiveDate,
    row: u32,
    identifier: &str,
    materials: &[MaterialFile],
) -> anyhow::Result<MaterialReference> {
    let mut svc =
        MaterialUploadService::new(drive, cfg.storage.folder_root.clone(), cfg.storage.publish);
    svc.upload(date, row, identifier, materials).map_err(friendly)
}

fn read_files(paths: &[PathBuf]) -> anyhow::Result<Vec<MaterialFile>> {
    let mut materials = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            bail!("not a file path: {}", path.display());
        };
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        materials.push(MaterialFile::new(name, bytes));
    }
    Ok(materials)
}
