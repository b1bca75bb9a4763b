//! Init command implementation

use std::io::Write;
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use reshape_util::UtilConfig;
use tracing::info;

pub fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(UtilConfig::CONFIG_FILES[0]);

    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        match options.open(&config_path) {
            Ok(mut file) => {
                file.write_all(UtilConfig::template().as_bytes())
                    .into_diagnostic()?;
                info!("Created {}", config_path.display());
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                match std::fs::remove_file(&config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}
