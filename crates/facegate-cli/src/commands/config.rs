//! Configuration display.

use std::path::Path;

use anyhow::{Result, bail};
use facegate_config::{CameraSource, Paths};

use crate::style::colors::SemanticStyle;
use crate::style::print_info_table;

/// Show current configuration.
pub fn show(project_dir: &Path, format: &str) -> Result<()> {
    let config = super::load_config(project_dir, None)?;

    match format {
        "toml" => {
            print!("{}", config.to_toml()?);
        }
        "text" => {
            println!("{}", "Facegate Configuration".header());
            println!(
                "{}",
                format!(
                    "project: {}",
                    Paths::project_config_file(project_dir).display()
                )
                .muted()
            );
            let source = match config.camera.source {
                CameraSource::Replay => "replay",
            };
            print_info_table(&[
                ("store.path", config.store.path.display().to_string()),
                ("camera.source", source.to_string()),
                (
                    "camera.replay_script",
                    config
                        .camera
                        .replay_script
                        .as_ref()
                        .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
                ),
                ("camera.loop_replay", config.camera.loop_replay.to_string()),
                ("recognition.tolerance", config.recognition.tolerance.to_string()),
                (
                    "recognition.frame_interval_ms",
                    config.recognition.frame_interval_ms.to_string(),
                ),
                (
                    "recognition.start_active",
                    config.recognition.start_active.to_string(),
                ),
            ]);
        }
        other => bail!("Unknown format '{other}' (expected text or toml)"),
    }

    Ok(())
}
