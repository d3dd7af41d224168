use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Durable key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";

/// Session-scoped key holding the login timestamp (epoch milliseconds,
/// string-encoded).
pub const LOGIN_TIME_KEY: &str = "loginTime";

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Storage port consumed by the session and the request gateway. Two tiers
/// exist: a durable one (survives restarts, holds the token) and a
/// session-scoped one (process lifetime, holds the login timestamp).
///
/// Writes are fire-and-forget: callers cannot react to a failed write, so
/// implementations log and move on.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-lifetime store backing the session-scoped tier.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("memory store lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("memory store lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().expect("memory store lock poisoned").remove(key);
    }
}

/// File-backed store for the durable tier. All entries live in a single
/// JSON object so writes are idempotent replacements of the whole file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Opens the store at its default location under the config directory.
    pub fn open() -> anyhow::Result<Self> {
        Ok(Self {
            path: get_config_dir()?.join("auth.json"),
        })
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> HashMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    fn save(&self, entries: &HashMap<String, String>) {
        let content = match serde_json::to_string_pretty(entries) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("failed to serialize store file: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, content) {
            tracing::warn!("failed to write {}: {}", self.path.display(), e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries);
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("TASKDECK_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("taskdeck")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}
