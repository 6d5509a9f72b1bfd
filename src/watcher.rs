//! File watcher
//!
//! Watches the content root and broadcasts a reload once a burst of
//! changes settles.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::logger;
use crate::push::Reloader;

/// A burst never delays its reload longer than this many debounce periods
pub const MAX_WAIT_FACTOR: u32 = 10;

/// Keeps the watch alive; dropping it stops watching
pub struct WatchHandle {
    _watcher: RecommendedWatcher,
}

/// Start watching `root` recursively on a background thread.
pub fn spawn(root: &Path, debounce: Duration, reloader: Reloader) -> notify::Result<WatchHandle> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(tx, notify::Config::default())?;
    watcher.watch(root, RecursiveMode::Recursive)?;

    let filter = ChangeFilter::new(root);
    std::thread::Builder::new()
        .name("livedev-watcher".to_string())
        .spawn(move || forward_changes(&rx, &filter, debounce, &reloader))
        .map_err(notify::Error::io)?;

    Ok(WatchHandle { _watcher: watcher })
}

/// Decides which reported paths count as content changes.
///
/// Only the part below the watched root is checked, so a root living under
/// a dot-directory (`~/.sites/blog`) still reloads.
struct ChangeFilter {
    root: PathBuf,
    // Some backends report resolved paths (macOS `/private/var/...`)
    canonical_root: Option<PathBuf>,
}

impl ChangeFilter {
    fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            canonical_root: root.canonicalize().ok(),
        }
    }

    fn relevant_path(&self, event: &Event) -> Option<PathBuf> {
        if matches!(event.kind, EventKind::Access(_)) {
            return None;
        }
        event
            .paths
            .iter()
            .find(|p| !is_hidden(self.relative(p)))
            .cloned()
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        let below_root = path.strip_prefix(&self.root).ok().or_else(|| {
            self.canonical_root
                .as_deref()
                .and_then(|root| path.strip_prefix(root).ok())
        });
        match below_root {
            Some(rel) => rel,
            // Outside the root: judge the file name alone
            None => path.file_name().map_or(path, Path::new),
        }
    }
}

/// Turn raw notify events into reload broadcasts until the watcher goes away
fn forward_changes(
    rx: &mpsc::Receiver<notify::Result<Event>>,
    filter: &ChangeFilter,
    debounce: Duration,
    reloader: &Reloader,
) {
    while let Some(changed) = next_change(rx, filter) {
        settle(rx, debounce);

        let clients = reloader.broadcast_reload();
        logger::log_reload(&format!("{} changed", changed.display()), clients);
    }
}

/// Fold the rest of a burst into the pending reload.
///
/// Returns once the channel is quiet for `debounce` or after
/// `MAX_WAIT_FACTOR` periods of continuous writes.
fn settle(rx: &mpsc::Receiver<notify::Result<Event>>, debounce: Duration) {
    let deadline = Instant::now() + debounce * MAX_WAIT_FACTOR;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || rx.recv_timeout(debounce.min(remaining)).is_err() {
            return;
        }
    }
}

/// Block until a relevant change arrives; `None` once the channel closes
fn next_change(
    rx: &mpsc::Receiver<notify::Result<Event>>,
    filter: &ChangeFilter,
) -> Option<PathBuf> {
    loop {
        match rx.recv().ok()? {
            Ok(event) => {
                if let Some(path) = filter.relevant_path(&event) {
                    return Some(path);
                }
            }
            Err(e) => logger::log_warning(&format!("Watch error: {e}")),
        }
    }
}

/// Editor swap files, `.git` and friends
fn is_hidden(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    fn modified(path: &str) -> Event {
        event(EventKind::Modify(ModifyKind::Any), path)
    }

    fn site_filter() -> ChangeFilter {
        ChangeFilter::new(Path::new("/site"))
    }

    #[test]
    fn test_hidden_paths() {
        assert!(is_hidden(Path::new("/site/.git/index")));
        assert!(is_hidden(Path::new("/site/.index.html.swp")));
        assert!(!is_hidden(Path::new("/site/index.html")));
        assert!(!is_hidden(Path::new("../site/index.html")));
    }

    #[test]
    fn test_relevant_events() {
        let filter = site_filter();
        assert_eq!(
            filter.relevant_path(&modified("/site/a.css")),
            Some(PathBuf::from("/site/a.css"))
        );

        let created = event(EventKind::Create(CreateKind::File), "/site/.tmp");
        assert_eq!(filter.relevant_path(&created), None);

        let accessed = event(EventKind::Access(AccessKind::Any), "/site/a.css");
        assert_eq!(filter.relevant_path(&accessed), None);
    }

    #[test]
    fn test_root_under_dot_directory() {
        let filter = ChangeFilter::new(Path::new("/home/dev/.sites/blog/public"));
        assert_eq!(
            filter.relevant_path(&modified("/home/dev/.sites/blog/public/index.html")),
            Some(PathBuf::from("/home/dev/.sites/blog/public/index.html"))
        );
        assert_eq!(
            filter.relevant_path(&modified("/home/dev/.sites/blog/public/.git/HEAD")),
            None
        );
    }

    #[test]
    fn test_path_outside_root_judged_by_file_name() {
        let filter = site_filter();
        assert!(filter.relevant_path(&modified("/elsewhere/.cache/a.js")).is_some());
        assert!(filter.relevant_path(&modified("/elsewhere/.a.swp")).is_none());
    }

    #[test]
    fn test_burst_becomes_one_reload() {
        let (tx, rx) = mpsc::channel();
        let reloader = Reloader::new();
        let mut client = reloader.subscribe();

        for name in ["/site/a.html", "/site/b.css", "/site/c.js"] {
            tx.send(Ok(modified(name))).unwrap();
        }
        drop(tx);

        forward_changes(&rx, &site_filter(), Duration::from_millis(20), &reloader);

        assert!(client.try_recv().is_ok());
        assert!(client.try_recv().is_err());
    }

    #[test]
    fn test_ignored_events_do_not_reload() {
        let (tx, rx) = mpsc::channel();
        let reloader = Reloader::new();
        let mut client = reloader.subscribe();

        tx.send(Ok(event(EventKind::Access(AccessKind::Any), "/site/a.html")))
            .unwrap();
        tx.send(Ok(modified("/site/.a.swp"))).unwrap();
        drop(tx);

        forward_changes(&rx, &site_filter(), Duration::from_millis(20), &reloader);
        assert!(client.try_recv().is_err());
    }

    #[test]
    fn test_continuous_writes_still_reload() {
        let (tx, rx) = mpsc::channel();
        let reloader = Reloader::new();
        let mut client = reloader.subscribe();

        // Writes every 5ms for 600ms; debounce 20ms caps each wait at 200ms
        let writer = std::thread::spawn(move || {
            let until = Instant::now() + Duration::from_millis(600);
            while Instant::now() < until {
                tx.send(Ok(modified("/site/bundle.js"))).unwrap();
                std::thread::sleep(Duration::from_millis(5));
            }
        });

        forward_changes(&rx, &site_filter(), Duration::from_millis(20), &reloader);
        writer.join().unwrap();

        let mut reloads = 0;
        while client.try_recv().is_ok() {
            reloads += 1;
        }
        assert!(reloads >= 2, "expected repeated reloads, got {reloads}");
    }

    #[test]
    fn test_settle_returns_when_quiet() {
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let started = Instant::now();
        settle(&rx, Duration::from_millis(20));
        assert!(started.elapsed() < Duration::from_millis(200));
        drop(tx);
    }

    #[test]
    fn test_watch_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(spawn(&missing, Duration::from_millis(10), Reloader::new()).is_err());
    }

    #[test]
    fn test_edit_under_dot_directory_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".work/public");
        std::fs::create_dir_all(&root).unwrap();

        let reloader = Reloader::new();
        let mut client = reloader.subscribe();
        let _watch = spawn(&root, Duration::from_millis(20), reloader.clone()).unwrap();

        std::fs::write(root.join("index.html"), "<h1>changed</h1>").unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while client.try_recv().is_err() {
            assert!(Instant::now() < deadline, "no reload after editing index.html");
            std::thread::sleep(Duration::from_millis(20));
        }
    }
}
