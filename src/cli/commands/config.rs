use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use std::path::Path;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, path: &Path) -> AppResult<()> {
    if let Commands::Config { print_config } = cmd
        && *print_config
    {
        println!("📄 Configuration ({}):\n", path.display());
        println!("{}", serde_yaml::to_string(&cfg.masked())?);
        println!("🔌 Source      : {}", cfg.source.describe());
    }

    Ok(())
}
