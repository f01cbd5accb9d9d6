// config.rs
// Environment-driven configuration with defaults, plus the small persisted
// UI preferences file (dark mode).

use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote REST backend, without trailing slash.
    pub api_base_url: String,
    /// Where the bearer token survives restarts (the local-storage analog).
    pub token_file: PathBuf,
    /// Where export downloads land.
    pub descargas_dir: PathBuf,
    /// Directory holding the .ttf fonts genpdf loads.
    pub fuentes_dir: PathBuf,
    /// Persisted UI preferences live next to the token.
    pub prefs_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api".to_string());
        let api_base_url = api_base_url.trim_end_matches('/').to_string();

        let token_file = env::var("TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".facturapro-token"));
        let prefs_file = env::var("PREFS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".facturapro-prefs.json"));
        let descargas_dir = env::var("DESCARGAS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("descargas"));
        let fuentes_dir = env::var("FUENTES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("fonts"));

        AppConfig {
            api_base_url,
            token_file,
            descargas_dir,
            fuentes_dir,
            prefs_file,
        }
    }
}

/// UI preferences that survive restarts. Kept deliberately tiny: the only
/// app-wide flag the screens share besides the session is the theme.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferencias {
    pub tema_oscuro: bool,
}

impl Preferencias {
    /// Missing or unreadable file means defaults, never an error.
    pub fn cargar(path: &PathBuf) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn guardar(&self, path: &PathBuf) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("no se pudo escribir {}", path.display()))
    }
}
