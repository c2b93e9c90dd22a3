//! Loads a settings file, changes it, and saves it back.
//!
//! ```text
//! cargo run -p jsonconf --example settings_roundtrip -- [path]
//! ```
//!
//! The first run creates the file with defaults; later runs read it, bump the
//! launch counter and write it back.  Set `RUST_LOG=debug` to see every step.

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

use jsonconf::{ConfigFile, ConfigOptions, ConfigStore, Lifecycle, LifecycleEvent};

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    user_name: Option<String>,
    theme: Theme,
    launch_count: u32,
    recent_files: Vec<String>,
}

impl ConfigFile for AppSettings {
    fn on_create(&mut self) {
        self.user_name = std::env::var("USER").ok();
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(AppSettings::default_path);

    let lifecycle = Lifecycle::new().with(|event, settings: &mut AppSettings| match event {
        LifecycleEvent::Creating => info!("no settings yet, starting from defaults"),
        LifecycleEvent::Saved => info!("saved launch #{}", settings.launch_count),
        _ => {}
    });

    let options = ConfigOptions::default().shared();
    let mut settings = ConfigStore::new()
        .load_with(Some(&path), Some(options), lifecycle)
        .with_context(|| format!("loading {}", path.display()))?
        .context("settings file holds null; delete it to start over")?;

    info!(
        "hello {}, theme {:?}",
        settings.user_name.as_deref().unwrap_or("stranger"),
        settings.theme
    );

    settings.launch_count += 1;
    settings.save(None, None).context("saving settings")?;

    println!("{}", settings.to_json()?);
    Ok(())
}
