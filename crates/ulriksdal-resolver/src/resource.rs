#![forbid(unsafe_code)]

//! Resource resolvers.

use std::path::{Path, PathBuf};

use ulriksdal_core::Error;
use url::{ParseError, Url};

/// A reference to be dereferenced: the `URI` attribute of a `Reference`
/// plus the base URI of the document that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    pub uri: String,
    pub base_uri: Option<String>,
}

impl ResourceReference {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            base_uri: None,
        }
    }

    pub fn with_base(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Same-document references: empty, or a bare fragment.
    pub fn is_same_document(&self) -> bool {
        self.uri.is_empty() || self.uri.starts_with('#')
    }

    /// The URI scheme, lower-cased, if the URI is absolute.
    pub fn scheme(&self) -> Option<String> {
        scheme_of(&self.uri)
    }
}

/// Trait for resource resolvers.
pub trait ResourceResolver: Send + Sync {
    /// Whether this resolver handles `reference`.
    fn can_resolve(&self, reference: &ResourceReference) -> bool;

    /// Fetch the referenced octets.
    fn resolve(&self, reference: &ResourceReference) -> Result<Vec<u8>, Error>;
}

fn scheme_of(uri: &str) -> Option<String> {
    Url::parse(uri).ok().map(|url| url.scheme().to_owned())
}

fn invalid(uri: &str, reason: impl std::fmt::Display) -> Error {
    Error::InvalidUri(format!("{uri}: {reason}"))
}

// ── Local filesystem ─────────────────────────────────────────────────

/// Resolves `file:` URIs, and relative URIs whose base is a `file:` URI or
/// absent.
pub struct LocalFileResolver;

impl LocalFileResolver {
    fn url_for(reference: &ResourceReference) -> Result<Url, Error> {
        match Url::parse(&reference.uri) {
            Ok(url) => Ok(url),
            Err(ParseError::RelativeUrlWithoutBase) => {
                let base = base_url(reference.base_uri.as_deref())?;
                base.join(&reference.uri).map_err(|e| invalid(&reference.uri, e))
            }
            Err(e) => Err(invalid(&reference.uri, e)),
        }
    }

    fn path_for(reference: &ResourceReference) -> Result<PathBuf, Error> {
        let url = Self::url_for(reference)?;
        if url.scheme() != "file" {
            return Err(invalid(url.as_str(), "not a file URI"));
        }
        // Rejects any authority other than localhost.
        url.to_file_path().map_err(|()| invalid(url.as_str(), "not a local file path"))
    }
}

/// The URL relative references are joined against. A plain filesystem path
/// is accepted as a base, and the working directory stands in for a missing
/// one.
fn base_url(base: Option<&str>) -> Result<Url, Error> {
    let Some(base) = base else {
        let cwd = std::env::current_dir()?;
        return directory_url(&cwd);
    };
    match Url::parse(base) {
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            // A directory base without a trailing slash would lose its last
            // segment on join.
            Ok(path) if path.is_dir() => directory_url(&path),
            _ => Ok(url),
        },
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let path = std::env::current_dir()?.join(base);
            if path.is_dir() {
                directory_url(&path)
            } else {
                Url::from_file_path(&path).map_err(|()| invalid(base, "not an absolute path"))
            }
        }
        Err(e) => Err(invalid(base, e)),
    }
}

fn directory_url(path: &Path) -> Result<Url, Error> {
    Url::from_directory_path(path)
        .map_err(|()| invalid(&path.display().to_string(), "not an absolute path"))
}

impl ResourceResolver for LocalFileResolver {
    fn can_resolve(&self, reference: &ResourceReference) -> bool {
        if reference.is_same_document() {
            return false;
        }
        match reference.scheme().as_deref() {
            Some("file") => true,
            Some(_) => false,
            None => match &reference.base_uri {
                None => true,
                Some(base) => matches!(scheme_of(base).as_deref(), None | Some("file")),
            },
        }
    }

    fn resolve(&self, reference: &ResourceReference) -> Result<Vec<u8>, Error> {
        let path = Self::path_for(reference)?;
        tracing::debug!(uri = %reference.uri, path = %path.display(), "resolving local file");
        Ok(std::fs::read(&path)?)
    }
}
