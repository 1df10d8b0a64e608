use anyhow::Context;
use shiftcrew_core::config::Config;
use shiftcrew_core::sheet::MemorySheet;
use std::path::Path;

const HEADER_LABELS: [&str; 7] = [
    "id",
    "last_name",
    "first_name",
    "middle_name",
    "display_name",
    "materials",
    "status",
];

pub fn run(config_path: &Path) -> anyhow::Result<()> {
    let cfg = if config_path.exists() {
        println!("  exists:  {}", config_path.display());
        Config::load(config_path).context("failed to load existing config")?
    } else {
        let cfg = Config::default();
        cfg.save(config_path).context("failed to write config")?;
        println!("  created: {}", config_path.display());
        cfg
    };

    if cfg.sheet.path.exists() {
        println!("  exists:  {}", cfg.sheet.path.display());
    } else {
        let mut sheet = MemorySheet::new();
        for (i, label) in HEADER_LABELS.iter().enumerate() {
            sheet.seed_cell(1, i, *label);
        }
        sheet
            .save(&cfg.sheet.path)
            .context("failed to write sheet")?;
        println!("  created: {}", cfg.sheet.path.display());
    }

    println!("\nReady. Next: shiftcrew register <identifier> --last ... --first ...");
    Ok(())
}
