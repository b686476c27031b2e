//! Access/refresh token persistence.
//!
//! The file store keeps both tokens in a small JSON file under the user's
//! data directory so a restart can resume the session.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Where the tokens live between requests.
pub trait TokenStore: Send + Sync {
    fn access(&self) -> Option<String>;
    fn refresh(&self) -> Option<String>;
    fn set_access(&self, token: Option<String>);
    fn set_refresh(&self, token: Option<String>);
    fn clear(&self);

    fn has_tokens(&self) -> bool {
        self.access().is_some() || self.refresh().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// Process-lifetime store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Tokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        Self {
            tokens: RwLock::new(Tokens {
                access: access.map(str::to_string),
                refresh: refresh.map(str::to_string),
            }),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn access(&self) -> Option<String> {
        self.tokens.read().ok().and_then(|t| t.access.clone())
    }

    fn refresh(&self) -> Option<String> {
        self.tokens.read().ok().and_then(|t| t.refresh.clone())
    }

    fn set_access(&self, token: Option<String>) {
        if let Ok(mut t) = self.tokens.write() {
            t.access = token;
        }
    }

    fn set_refresh(&self, token: Option<String>) {
        if let Ok(mut t) = self.tokens.write() {
            t.refresh = token;
        }
    }

    fn clear(&self) {
        if let Ok(mut t) = self.tokens.write() {
            *t = Tokens::default();
        }
    }
}

/// JSON file store; the file is rewritten on every change.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    tokens: RwLock<Tokens>,
}

impl FileTokenStore {
    /// `<data_dir>/lgpd-mobile/tokens.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("lgpd-mobile").join("tokens.json"))
    }

    /// Open the store, loading existing tokens. A missing or corrupt file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tokens = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| match serde_json::from_str::<Tokens>(&raw) {
                Ok(tokens) => Some(tokens),
                Err(e) => {
                    tracing::warn!("[AUTH] Ignoring unreadable token file {}: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default();
        Self {
            path,
            tokens: RwLock::new(tokens),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, change: impl FnOnce(&mut Tokens)) {
        let snapshot = match self.tokens.write() {
            Ok(mut t) => {
                change(&mut t);
                t.clone()
            }
            Err(_) => return,
        };
        if let Err(e) = self.persist(&snapshot) {
            tracing::error!("[AUTH] Failed to write token file {}: {}", self.path.display(), e);
        }
    }

    fn persist(&self, tokens: &Tokens) -> std::io::Result<()> {
        if tokens.access.is_none() && tokens.refresh.is_none() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(tokens).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, raw)
    }
}

impl TokenStore for FileTokenStore {
    fn access(&self) -> Option<String> {
        self.tokens.read().ok().and_then(|t| t.access.clone())
    }

    fn refresh(&self) -> Option<String> {
        self.tokens.read().ok().and_then(|t| t.refresh.clone())
    }

    fn set_access(&self, token: Option<String>) {
        self.update(|t| t.access = token);
    }

    fn set_refresh(&self, token: Option<String>) {
        self.update(|t| t.refresh = token);
    }

    fn clear(&self) {
        self.update(|t| *t = Tokens::default());
    }
}
