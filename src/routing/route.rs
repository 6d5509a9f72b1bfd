//! URL path to filesystem route
//!
//! A route is the content root joined with the percent-decoded URL path,
//! normalized syntactically. Nothing keeps the result inside the root: this
//! is a development server.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Normalized filesystem path derived from a URL path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route(PathBuf);

impl Route {
    /// Build a route from the raw (still percent-encoded) URL path.
    ///
    /// Returns `None` when the decoded bytes are not valid UTF-8.
    ///
    /// # Examples
    /// ```
    /// use livedev::routing::Route;
    /// use std::path::Path;
    ///
    /// let route = Route::from_url_path(Path::new("/srv/public"), "/docs/../a%20b.html").unwrap();
    /// assert_eq!(route.as_path(), Path::new("/srv/public/a b.html"));
    /// ```
    pub fn from_url_path(root: &Path, url_path: &str) -> Option<Self> {
        let decoded = percent_decode_str(url_path).decode_utf8().ok()?;
        // A leading slash would make `join` discard the root
        let relative = decoded.trim_start_matches('/');
        Some(Self(normalize(&root.join(relative))))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for Route {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Collapse `.` and `..` segments without touching the filesystem.
///
/// `..` at the filesystem root stays at the root; on a relative path with
/// nothing left to pop it is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
