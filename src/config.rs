// ── Shell configuration ───────────────────────────────────────────────────────
//
// Reads `%APPDATA%\Scrawl\config.json`.  Every field has a default, so a
// partial file is fine and a missing one means "all defaults".
// No `unsafe`: pure safe Rust + serde_json.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{de::Error as _, Deserialize, Serialize};

use crate::{error::Result, render::Color};

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Root of the JSON configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ShellConfig {
    pub(crate) version: u32,
    pub(crate) window: WindowConfig,
    /// Document text handed to the editor right after it initialises.
    pub(crate) initial_text: String,
    /// Colour the surface is cleared to before the editor draws.
    pub(crate) background: Color,
    pub(crate) font: FontConfig,
}

/// Window geometry in logical units (pixels at 96 DPI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct WindowConfig {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct FontConfig {
    pub(crate) family: String,
    /// Size in DIPs.
    pub(crate) size: f32,
}

// ── Format version ────────────────────────────────────────────────────────────

const CONFIG_VERSION: u32 = 1;

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            window: WindowConfig::default(),
            initial_text: "H".to_owned(),
            background: Color::WHITE,
            font: FontConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "Scrawl".to_owned(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Consolas".to_owned(),
            size: 16.0,
        }
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the configuration file: `%APPDATA%\Scrawl\config.json`.
///
/// Returns `None` if the `APPDATA` environment variable is not set.
pub(crate) fn config_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("Scrawl");
    p.push("config.json");
    Some(p)
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Load the configuration, falling back to defaults.
///
/// A missing file is normal.  An unreadable, malformed or wrong-version file
/// is reported at `warn` and otherwise ignored; configuration never stops the
/// shell from starting.
pub(crate) fn load() -> ShellConfig {
    let Some(path) = config_path() else {
        log::debug!("APPDATA not set; using default configuration");
        return ShellConfig::default();
    };

    match read(&path) {
        Ok(Some(cfg)) => {
            log::info!("configuration loaded from {}", path.display());
            cfg
        }
        Ok(None) => {
            log::debug!("no configuration at {}; using defaults", path.display());
            ShellConfig::default()
        }
        Err(e) => {
            log::warn!("ignoring configuration at {}: {e}", path.display());
            ShellConfig::default()
        }
    }
}

/// Read and parse `path`.  `Ok(None)` when the file does not exist.
fn read(path: &Path) -> Result<Option<ShellConfig>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    parse(&data).map(Some)
}

fn parse(data: &[u8]) -> Result<ShellConfig> {
    let cfg: ShellConfig = serde_json::from_slice(data)?;
    if cfg.version != CONFIG_VERSION {
        return Err(serde_json::Error::custom(format!(
            "unsupported config version {} (expected {CONFIG_VERSION})",
            cfg.version
        ))
        .into());
    }
    Ok(cfg)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
