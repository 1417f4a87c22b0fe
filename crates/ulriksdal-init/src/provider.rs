#![forbid(unsafe_code)]

//! Where the configuration document comes from.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ulriksdal_core::Error;

use crate::options::DEFAULT_CONFIG_PATH;

/// Fetches configuration resources by path.
pub trait ResourceProvider: Send + Sync {
    fn load(&self, path: &str) -> Result<String, Error>;
}

const BUNDLED_CONFIG: &str = include_str!("../resource/config.xml");

/// Resources compiled into the library. Serves [`DEFAULT_CONFIG_PATH`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledResources;

impl ResourceProvider for BundledResources {
    fn load(&self, path: &str) -> Result<String, Error> {
        if path == DEFAULT_CONFIG_PATH {
            Ok(BUNDLED_CONFIG.to_owned())
        } else {
            Err(Error::ConfigDocument(format!("no bundled resource at {path}")))
        }
    }
}

/// Resources read from the filesystem, relative to `root`. Absolute paths
/// are used as given.
#[derive(Debug, Clone)]
pub struct FileSystemResources {
    root: PathBuf,
}

impl FileSystemResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceProvider for FileSystemResources {
    fn load(&self, path: &str) -> Result<String, Error> {
        let full = self.root.join(path);
        tracing::debug!(path = %full.display(), "reading configuration resource");
        std::fs::read_to_string(&full)
            .map_err(|e| Error::ConfigDocument(format!("cannot read {}: {e}", full.display())))
    }
}

/// The bundled default configuration, with every other path read from the
/// filesystem relative to the working directory. This is what an override in
/// [`CONFIG_ENV`](crate::options::CONFIG_ENV) is loaded through.
#[derive(Debug, Clone)]
pub struct DefaultResources {
    files: FileSystemResources,
}

impl DefaultResources {
    pub fn new() -> Self {
        Self {
            files: FileSystemResources::new(PathBuf::new()),
        }
    }
}

impl Default for DefaultResources {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceProvider for DefaultResources {
    fn load(&self, path: &str) -> Result<String, Error> {
        if path == DEFAULT_CONFIG_PATH {
            BundledResources.load(path)
        } else {
            self.files.load(path)
        }
    }
}

/// Resources held in memory, for tests and embedded configurations.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResources {
    resources: BTreeMap<String, String>,
}

impl InMemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.resources.insert(path.into(), content.into());
        self
    }
}

impl ResourceProvider for InMemoryResources {
    fn load(&self, path: &str) -> Result<String, Error> {
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| Error::ConfigDocument(format!("no resource at {path}")))
    }
}
