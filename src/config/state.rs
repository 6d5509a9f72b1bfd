// Application state module
// One lifecycle object shared by the HTTP listener, the push channel and the watcher

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::types::Config;
use crate::handler::static_files::{FileSource, LocalFs};
use crate::push::Reloader;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Absolute content root every route is joined onto
    pub content_root: PathBuf,
    /// Reload client code, read once at startup
    pub reload_script: Arc<str>,
    pub files: Arc<dyn FileSource>,
    pub reloader: Reloader,
}

impl AppState {
    /// Build state from configuration, reading the reload script from disk.
    ///
    /// A missing script is a startup failure.
    pub fn new(config: &Config) -> io::Result<Self> {
        let script_path = Path::new(&config.content.reload_script);
        let reload_script = std::fs::read_to_string(script_path).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!(
                    "Failed to read reload script '{}': {e}",
                    script_path.display()
                ),
            )
        })?;

        let content_root = absolute(Path::new(&config.content.root))?;
        Ok(Self::with_parts(
            config,
            content_root,
            reload_script,
            Arc::new(LocalFs),
        ))
    }

    pub fn with_parts(
        config: &Config,
        content_root: PathBuf,
        reload_script: impl Into<Arc<str>>,
        files: Arc<dyn FileSource>,
    ) -> Self {
        Self {
            config: config.clone(),
            content_root,
            reload_script: reload_script.into(),
            files,
            reloader: Reloader::new(),
        }
    }
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
