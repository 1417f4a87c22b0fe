#![forbid(unsafe_code)]

//! Bootstrap options.

/// Environment variable overriding the configuration resource path.
pub const CONFIG_ENV: &str = "ULRIKSDAL_RESOURCE_CONFIG";

/// Path of the bundled configuration document.
pub const DEFAULT_CONFIG_PATH: &str = "resource/config.xml";

/// What happens to the bootstrap state when the configuration document
/// cannot be fetched or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFailurePolicy {
    /// Return the error and stay uninitialized. A later call retries.
    #[default]
    Strict,
    /// Mark the registries ready (empty) and record the error in the report.
    Lenient,
}

/// Options for file-driven initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOptions {
    /// Resource path handed to the provider. `None` means
    /// [`DEFAULT_CONFIG_PATH`].
    pub config_path: Option<String>,
    pub failure_policy: DocumentFailurePolicy,
}

impl InitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with the path override taken from [`CONFIG_ENV`], if set and
    /// non-empty.
    pub fn from_env() -> Self {
        let config_path = std::env::var(CONFIG_ENV).ok().filter(|p| !p.trim().is_empty());
        Self {
            config_path,
            ..Self::default()
        }
    }

    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_failure_policy(mut self, policy: DocumentFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn lenient(self) -> Self {
        self.with_failure_policy(DocumentFailurePolicy::Lenient)
    }

    /// The path the provider is asked for.
    pub fn config_path(&self) -> &str {
        self.config_path.as_deref().unwrap_or(DEFAULT_CONFIG_PATH)
    }
}
