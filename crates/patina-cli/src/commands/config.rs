use anyhow::{Result, bail};
use patina_core::config::RootConfig;
use patina_infrastructure::ConfigService;

pub fn show(config_service: &ConfigService) -> Result<()> {
    let config = config_service.get_config()?;
    println!("# {}", config_service.path().display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn init(config_service: &ConfigService, force: bool) -> Result<()> {
    let path = config_service.path();
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    config_service.save(&RootConfig::default())?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
