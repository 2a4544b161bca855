use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{OnceLock, RwLock},
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".ledger_forms";
const CONFIG_FILE: &str = "config.json";
const HOME_ENV: &str = "LEDGER_FORMS_HOME";
const TMP_SUFFIX: &str = "tmp";

/// Presentation and batch settings shared by every form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// CSS class attached to text-like widgets.
    pub input_class: String,
    /// Blank transaction lines offered after the existing ones.
    pub transaction_extra_lines: usize,
    /// Upper bound on submitted transaction lines in one batch.
    pub transaction_max_lines: usize,
    pub allow_delete: bool,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            input_class: "input".into(),
            transaction_extra_lines: 5,
            transaction_max_lines: 1000,
            allow_delete: true,
        }
    }
}

impl FormsConfig {
    /// Reads the config at `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let data = fs::read_to_string(path)?;
            let config = serde_json::from_str(&data)?;
            tracing::debug!(path = %path.display(), "loaded forms config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = tmp_path(path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// `~/.ledger_forms/config.json`, or `$LEDGER_FORMS_HOME/config.json` when set.
    pub fn default_path() -> PathBuf {
        app_data_dir().join(CONFIG_FILE)
    }
}

fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

static ACTIVE: OnceLock<RwLock<FormsConfig>> = OnceLock::new();

/// Makes `config` the process-wide settings used by subsequently built forms.
pub fn install(config: FormsConfig) {
    let lock = ACTIVE.get_or_init(|| RwLock::new(FormsConfig::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = config;
    }
}

pub fn active() -> FormsConfig {
    ACTIVE
        .get_or_init(|| RwLock::new(FormsConfig::default()))
        .read()
        .map(|guard| guard.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = FormsConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, FormsConfig::default());
        assert_eq!(config.input_class, "input");
        assert_eq!(config.transaction_extra_lines, 5);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = FormsConfig {
            input_class: "form-control".into(),
            transaction_extra_lines: 3,
            transaction_max_lines: 50,
            allow_delete: false,
        };
        config.save(&path).unwrap();
        assert!(!tmp_path(&path).exists());
        assert_eq!(FormsConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "transaction_extra_lines": 2 }"#).unwrap();
        let config = FormsConfig::load(&path).unwrap();
        assert_eq!(config.transaction_extra_lines, 2);
        assert_eq!(config.input_class, "input");
        assert!(config.allow_delete);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FormsConfig::load(&path),
            Err(crate::errors::FormError::Serde(_))
        ));
    }
}
