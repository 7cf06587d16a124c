use crate::error::ConfigError;
use crate::error::Result;
use crate::settings::Settings;
use dirs::home_dir;
use std::cell::Cell;
use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;
use tracing::warn;

const HOME_ENV: &str = "NAVGROUP_HOME";
const HOME_DIR_NAME: &str = ".navgroup";
pub const SETTINGS_FILENAME: &str = "settings.json";
const TMP_SUFFIX: &str = ".tmp";

/// Where the settings blob lives. The host owns the format; the engine only
/// needs load and save.
pub trait SettingsStore {
    /// `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<Settings>>;

    fn save(&self, settings: &Settings) -> Result<()>;
}

/// `$NAVGROUP_HOME`, else `~/.navgroup`.
pub fn find_navgroup_home() -> Result<PathBuf> {
    if let Ok(env_home) = std::env::var(HOME_ENV)
        && !env_home.is_empty()
    {
        return Ok(PathBuf::from(env_home));
    }
    let mut home = home_dir().ok_or(ConfigError::NoHome)?;
    home.push(HOME_DIR_NAME);
    Ok(home)
}

/// Loads settings, falling back to defaults when the store is empty or its
/// contents cannot be read.
pub fn load_settings(store: &dyn SettingsStore) -> Settings {
    match store.load() {
        Ok(Some(settings)) => settings,
        Ok(None) => Settings::default(),
        Err(err) => {
            warn!("ignoring stored settings: {err}");
            Settings::default()
        }
    }
}

/// Pretty JSON in a single file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join(SETTINGS_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<Settings>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        let settings = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), "loaded settings");
        Ok(Some(settings))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let mut body = serde_json::to_string_pretty(settings)?;
        body.push('\n');
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, body).map_err(|err| self.io_error(err))?;
        fs::rename(&tmp, &self.path).map_err(|err| self.io_error(err))?;
        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}

/// Keeps the serialized blob in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Rc<RefCell<Option<String>>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::default();
        *store.blob.borrow_mut() = Some(raw.into());
        store
    }

    pub fn with_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::with_raw(serde_json::to_string(settings)?))
    }

    pub fn raw(&self) -> Option<String> {
        self.blob.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<Settings>> {
        match self.blob.borrow().as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        *self.blob.borrow_mut() = Some(raw);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    fn load(&self) -> Result<Option<Settings>> {
        (**self).load()
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        (**self).save(settings)
    }
}
