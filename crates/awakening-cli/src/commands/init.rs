use std::path::PathBuf;

use awakening_core::storage::SqliteStore;

use crate::app::AppContext;
use crate::cli::{Cli, InitArgs};
use crate::config::{default_config_path, write_config, AwakeningConfig};

pub fn handle_init(ctx: &AppContext, cli: &Cli, args: &InitArgs) -> anyhow::Result<()> {
    let target = match args.path {
        Some(ref path) => PathBuf::from(path),
        None => ctx.store_path()?,
    };

    let store_id = SqliteStore::create(&target)?;

    if args.write_config {
        let config_path = match cli.config {
            Some(ref path) => PathBuf::from(path),
            None => default_config_path()?,
        };
        write_config(&config_path, &AwakeningConfig::for_store(&target))?;
        if !ctx.quiet() {
            println!("Wrote config {}", config_path.display());
        }
    }

    if !ctx.quiet() {
        println!("Initialized new store at {}", target.display());
        println!("store_id={}", store_id);
    }
    Ok(())
}
