//! Static file resolution module
//!
//! Locates the file behind a route (directory index, `.html` inference),
//! loads it and appends the reload script to HTML documents.
//! All file I/O here is blocking; this server is for local development.

use crate::http::mime;
use crate::logger;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Index document served for directory routes
pub const INDEX_FILE: &str = "index.html";

/// How many times a directory may descend into its index before giving up
pub const MAX_INDEX_DEPTH: usize = 2;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Kind of filesystem entry behind a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// FIFOs, sockets, devices: present but never served
    Other,
}

/// Filesystem access used by the resolver
pub trait FileSource: Send + Sync {
    /// Entry kind, or `None` when the path is missing or cannot be stat'ed
    fn kind(&self, path: &Path) -> Option<EntryKind>;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Local disk through `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSource for LocalFs {
    fn kind(&self, path: &Path) -> Option<EntryKind> {
        let meta = std::fs::metadata(path).ok()?;
        if meta.is_dir() {
            Some(EntryKind::Dir)
        } else if meta.is_file() {
            Some(EntryKind::File)
        } else {
            Some(EntryKind::Other)
        }
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// A file found on disk, body ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub body: Vec<u8>,
}

impl ResolvedFile {
    fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    pub fn is_html(&self) -> bool {
        self.extension() == Some("html")
    }

    /// Content-Type to send, if any.
    ///
    /// SVG always gets one since browsers refuse to render it otherwise.
    /// Everything else relies on client sniffing unless `infer` is set.
    pub fn content_type(&self, infer: bool) -> Option<&'static str> {
        match self.extension() {
            Some("svg") => Some(SVG_CONTENT_TYPE),
            ext if infer => Some(mime::get_content_type(ext)),
            _ => None,
        }
    }
}

/// Find the file a route points at.
///
/// Directories descend into `index.html` (bounded by `MAX_INDEX_DEPTH`);
/// a missing path without extension falls back to `<path>.html`. Entries
/// that exist but are neither file nor directory are not found.
pub fn locate(files: &dyn FileSource, route: &Path) -> Option<PathBuf> {
    let mut candidate = route.to_path_buf();

    for _ in 0..=MAX_INDEX_DEPTH {
        match files.kind(&candidate) {
            Some(EntryKind::File) => return Some(candidate),
            Some(EntryKind::Dir) => candidate = candidate.join(INDEX_FILE),
            Some(EntryKind::Other) => return None,
            None => return html_fallback(files, candidate),
        }
    }

    None
}

fn html_fallback(files: &dyn FileSource, missing: PathBuf) -> Option<PathBuf> {
    if missing.extension().is_some() {
        return None;
    }

    let mut html: OsString = missing.into_os_string();
    html.push(".html");
    let html = PathBuf::from(html);

    (files.kind(&html) == Some(EntryKind::File)).then_some(html)
}

/// Locate and load a route, injecting the reload script into HTML.
///
/// Every failure is reported as `None`; read errors other than a vanished
/// file are logged.
pub fn resolve(files: &dyn FileSource, route: &Path, reload_script: &str) -> Option<ResolvedFile> {
    let path = locate(files, route)?;

    let raw = match files.read(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            logger::log_warning(&format!("Failed to read '{}': {e}", path.display()));
            return None;
        }
    };

    let mut file = ResolvedFile { path, body: raw };
    if file.is_html() {
        file.body = inject_reload_script(file.body, reload_script);
    }
    Some(file)
}

/// Append `\n\n<script>{script}</script>` to an HTML body.
///
/// Browsers accept the tag after `</html>`, so no parsing happens here.
pub fn inject_reload_script(mut body: Vec<u8>, script: &str) -> Vec<u8> {
    body.reserve(script.len() + 19);
    body.extend_from_slice(b"\n\n<script>");
    body.extend_from_slice(script.as_bytes());
    body.extend_from_slice(b"</script>");
    body
}
