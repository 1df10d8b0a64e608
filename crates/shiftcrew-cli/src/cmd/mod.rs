pub mod check;
pub mod init;
pub mod lookup;
pub mod register;
pub mod status;
pub mod upload;

use anyhow::Context;
use shiftcrew_core::config::Config;
use shiftcrew_core::registration::RegistrationService;
use shiftcrew_core::sheet::MemorySheet;
use shiftcrew_core::ShiftError;
use std::path::Path;

/// Load the config, pointing the operator at `init` when it is missing.
pub fn load_config(config_path: &Path) -> anyhow::Result<Config> {
    Config::load(config_path)
        .with_context(|| format!("run `shiftcrew init` to create {}", config_path.display()))
}

/// Load the sheet named by the config and wrap it in the registration service.
pub fn load_service(cfg: &Config) -> anyhow::Result<RegistrationService<MemorySheet>> {
    let sheet = MemorySheet::load(&cfg.sheet.path).map_err(friendly)?;
    Ok(RegistrationService::new(sheet))
}

pub fn save_sheet(cfg: &Config, service: &RegistrationService<MemorySheet>) -> anyhow::Result<()> {
    service.store().save(&cfg.sheet.path).map_err(friendly)
}

/// Business errors stand on their own; transient infrastructure failures get
/// a retry hint so the operator knows the request itself was fine.
pub fn friendly(err: ShiftError) -> anyhow::Error {
    if err.is_transient() {
        anyhow::anyhow!("{err} (temporary problem, try again later)")
    } else {
        anyhow::Error::new(err)
    }
}
