use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, WriteLogger};

/// Routes `log` records to `path`, appending; the terminal belongs to the game UI.
///
/// Fails when the file cannot be opened or a global logger is already set.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    WriteLogger::init(level, Config::default(), file).map_err(io::Error::other)
}
