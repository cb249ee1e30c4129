use crate::cli::parser::Commands;
use crate::config::{Config, DestinationKind};
use crate::core::log::LogLogic;
use crate::errors::AppResult;
use crate::store::sqlite::SqliteStore;
use crate::ui::messages::warning;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        if cfg.destination.kind != DestinationKind::Sqlite {
            warning("The internal log is only kept by the sqlite destination.");
            return Ok(());
        }

        let mut store = SqliteStore::open_read_only(&cfg.destination.database)?;
        LogLogic::print_log(store.pool())?;
    }

    Ok(())
}
