use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use gtk4::glib;

const LOCAL_HOST: &str = "localhost";

/// Opaque reference to a user-selected resource.
///
/// Paths keep their raw OS bytes. URIs are carried as text and only `file://`
/// URIs on the local host resolve to a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageLocator {
    Path(PathBuf),
    Uri(String),
}

impl ImageLocator {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    /// Local filesystem path behind this locator, if it names one.
    pub fn to_path(&self) -> Option<PathBuf> {
        match self {
            Self::Path(path) if path.as_os_str().is_empty() => None,
            Self::Path(path) => Some(path.clone()),
            Self::Uri(uri) => {
                let (path, host) = glib::filename_from_uri(uri).ok()?;
                match host.as_deref() {
                    None | Some("") | Some(LOCAL_HOST) => Some(path),
                    Some(_) => None,
                }
            }
        }
    }
}

impl fmt::Display for ImageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Uri(uri) => f.write_str(uri),
        }
    }
}

pub type ResourceHandle = Box<dyn Read + Send>;

/// Turns a locator into a readable handle. The handle is dropped by the
/// caller as soon as the read finishes.
pub trait ResourceResolver: Send + Sync {
    fn open(&self, locator: &ImageLocator) -> io::Result<ResourceHandle>;
}

/// Resolves locators against the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsResolver;

impl ResourceResolver for FsResolver {
    fn open(&self, locator: &ImageLocator) -> io::Result<ResourceHandle> {
        let path = locator.to_path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Unsupported,
                format!("unsupported locator: {locator}"),
            )
        })?;
        let file = File::open(path)?;
        Ok(Box::new(file))
    }
}
