//! Session chrome persisted between runs as a TOML file.

use anyhow::{Context, Result};
use engine::SessionState;
use shared::{AppSection, MigrationStrategy, SlicerConfig};
use std::path::Path;

/// A missing file is a fresh session.
pub fn load_session(path: &Path) -> Result<SessionState> {
    if !path.exists() {
        log::debug!("no session file at {}, starting fresh", path.display());
        return Ok(SessionState::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file: {}", path.display()))?;
    let config = SlicerConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse session file: {}", path.display()))?;

    let strategy = config.app.get_migration_strategy();
    Ok(restore_session(path, &config, strategy))
}

fn restore_session(path: &Path, config: &SlicerConfig, strategy: MigrationStrategy) -> SessionState {
    match strategy {
        MigrationStrategy::None => SessionState::from_section(&config.session),
        // The session layout is unchanged across upgrades so far; only the version moves.
        MigrationStrategy::Upgrade(description) => {
            log::info!("upgrading session file {}: {}", path.display(), description);
            SessionState::from_section(&config.session)
        }
        MigrationStrategy::Recreate => {
            log::warn!(
                "session file {} has unsupported version '{}', starting from defaults",
                path.display(),
                config.app.version
            );
            SessionState::default()
        }
    }
}

pub fn save_session(path: &Path, session: &SessionState) -> Result<()> {
    let config = SlicerConfig {
        app: AppSection::default(),
        session: session.to_section(),
    };
    let content = config
        .to_toml_string()
        .context("Failed to serialize session")?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write session file: {}", path.display()))?;
    log::debug!("session saved to {}", path.display());
    Ok(())
}
