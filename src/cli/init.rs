//! Init command: write a stock particles.toml

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::config::{default_config_toml, CONFIG_FILE_NAME};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the init command
pub fn run_init(dir: &Path, force: bool) -> ExitCode {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        eprintln!("Error: {} already exists (use --force to overwrite)", path.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let contents = match default_config_toml() {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = fs::create_dir_all(dir).and_then(|_| fs::write(&path, contents)) {
        eprintln!("Error: Failed to write {}: {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Created: {}", path.display());
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        run_init(temp.path(), false);

        let path = temp.path().join(CONFIG_FILE_NAME);
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.particles.count, 110);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "# mine\n").unwrap();

        run_init(temp.path(), false);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        run_init(temp.path(), true);
        assert!(fs::read_to_string(&path).unwrap().contains("[particles]"));
    }
}
