//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method check, route building,
//! file resolution and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::Route;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Generic over the body since requests are never read past their head.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (response, body_bytes) = respond(req.method(), req.uri().path(), &state);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            req.method().to_string(),
            req.uri().path().to_string(),
        );
        entry.http_version = http_version(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = body_bytes;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Map method and raw path to a response plus its body size
fn respond(method: &Method, path: &str, state: &AppState) -> (Response<Full<Bytes>>, usize) {
    if !is_get(method) {
        return (http::build_404_response(), 0);
    }

    let Some(route) = Route::from_url_path(&state.content_root, path) else {
        return (http::build_404_response(), 0);
    };

    match static_files::resolve(state.files.as_ref(), route.as_path(), &state.reload_script) {
        Some(file) => {
            let content_type = file.content_type(state.config.http.infer_content_type);
            let size = file.body.len();
            (http::build_file_response(file.body, content_type), size)
        }
        None => (http::build_404_response(), 0),
    }
}

/// GET in any letter case; HEAD and everything else is not served
fn is_get(method: &Method) -> bool {
    method.as_str().eq_ignore_ascii_case("GET")
}

const fn http_version(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::static_files::tests::MemoryFs;
    use crate::handler::static_files::LocalFs;
    use http_body_util::BodyExt;
    use std::path::PathBuf;

    const SCRIPT: &str = "console.log('reload-client')";

    fn memory_state(config: &Config) -> Arc<AppState> {
        let fs = MemoryFs::default()
            .with_file("/srv/public/index.html", "<h1>Hi</h1>")
            .with_file("/srv/public/about.html", "<p>About</p>")
            .with_file("/srv/public/logo.svg", "<svg/>")
            .with_file("/srv/public/css/site.css", "body {}")
            .with_file("/srv/public/docs/index.html", "<p>Docs</p>")
            .with_file("/srv/public/my page.html", "<p>Spaced</p>");
        Arc::new(AppState::with_parts(
            config,
            PathBuf::from("/srv/public"),
            SCRIPT,
            Arc::new(fs),
        ))
    }

    async fn get(state: &Arc<AppState>, method: &str, uri: &str) -> (u16, Option<String>, Vec<u8>) {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();
        let resp = handle_request(req, peer, Arc::clone(state)).await.unwrap();
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get("Content-Type")
            .map(|v| v.to_str().unwrap().to_string());
        let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, content_type, body)
    }

    fn with_script(html: &str) -> Vec<u8> {
        format!("{html}\n\n<script>{SCRIPT}</script>").into_bytes()
    }

    #[tokio::test]
    async fn test_root_serves_index_with_script() {
        let state = memory_state(&Config::default());
        let (status, _, body) = get(&state, "GET", "/").await;
        assert_eq!(status, 200);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "<h1>Hi</h1>\n\n<script>console.log('reload-client')</script>"
        );
    }

    #[tokio::test]
    async fn test_directory_with_and_without_slash() {
        let state = memory_state(&Config::default());
        let direct = get(&state, "GET", "/docs/index.html").await;
        assert_eq!(get(&state, "GET", "/docs").await, direct);
        assert_eq!(get(&state, "GET", "/docs/").await, direct);
        assert_eq!(direct.2, with_script("<p>Docs</p>"));
    }

    #[tokio::test]
    async fn test_extensionless_html() {
        let state = memory_state(&Config::default());
        let (status, _, body) = get(&state, "GET", "/about").await;
        assert_eq!(status, 200);
        assert_eq!(body, with_script("<p>About</p>"));
    }

    #[tokio::test]
    async fn test_trailing_slash_on_page() {
        // Trailing slashes are normalized away before lookup
        let state = memory_state(&Config::default());
        for uri in ["/about/", "/about.html/"] {
            let (status, _, body) = get(&state, "GET", uri).await;
            assert_eq!(status, 200, "{uri}");
            assert_eq!(body, with_script("<p>About</p>"));
        }
    }

    #[tokio::test]
    async fn test_missing_is_empty_404() {
        let state = memory_state(&Config::default());
        let (status, content_type, body) = get(&state, "GET", "/missing").await;
        assert_eq!(status, 404);
        assert_eq!(content_type, None);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_non_get_methods_are_404() {
        let state = memory_state(&Config::default());
        for method in ["POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH"] {
            let (status, _, body) = get(&state, method, "/index.html").await;
            assert_eq!(status, 404, "{method}");
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn test_lowercase_get_is_served() {
        let state = memory_state(&Config::default());
        let (status, _, _) = get(&state, "get", "/").await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_query_string_is_ignored() {
        let state = memory_state(&Config::default());
        let (status, _, body) = get(&state, "GET", "/css/site.css?v=3").await;
        assert_eq!(status, 200);
        assert_eq!(body, b"body {}");
    }

    #[tokio::test]
    async fn test_percent_encoded_path() {
        let state = memory_state(&Config::default());
        let (status, _, body) = get(&state, "GET", "/my%20page.html").await;
        assert_eq!(status, 200);
        assert_eq!(body, with_script("<p>Spaced</p>"));

        let (status, _, _) = get(&state, "GET", "/%FF").await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_content_types() {
        let state = memory_state(&Config::default());
        let (_, svg, _) = get(&state, "GET", "/logo.svg").await;
        assert_eq!(svg.as_deref(), Some("image/svg+xml"));
        let (_, css, _) = get(&state, "GET", "/css/site.css").await;
        assert_eq!(css, None);
        let (_, html, _) = get(&state, "GET", "/").await;
        assert_eq!(html, None);

        let mut config = Config::default();
        config.http.infer_content_type = true;
        let state = memory_state(&config);
        let (_, css, _) = get(&state, "GET", "/css/site.css").await;
        assert_eq!(css.as_deref(), Some("text/css; charset=utf-8"));
        let (_, svg, _) = get(&state, "GET", "/logo.svg").await;
        assert_eq!(svg.as_deref(), Some("image/svg+xml"));
    }

    #[tokio::test]
    async fn test_serves_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("blog")).unwrap();
        std::fs::write(dir.path().join("blog/index.html"), "<h2>Blog</h2>").unwrap();
        std::fs::write(dir.path().join("data.bin"), [0u8, 1, 2, 255]).unwrap();

        let state = Arc::new(AppState::with_parts(
            &Config::default(),
            dir.path().to_path_buf(),
            SCRIPT,
            Arc::new(LocalFs),
        ));

        let (status, _, body) = get(&state, "GET", "/blog/").await;
        assert_eq!(status, 200);
        assert_eq!(body, with_script("<h2>Blog</h2>"));

        let (status, _, body) = get(&state, "GET", "/data.bin").await;
        assert_eq!(status, 200);
        assert_eq!(body, vec![0u8, 1, 2, 255]);

        let (status, _, _) = get(&state, "GET", "/blog/missing").await;
        assert_eq!(status, 404);
    }

    #[test]
    fn test_is_get() {
        assert!(is_get(&Method::GET));
        assert!(is_get(&Method::from_bytes(b"Get").unwrap()));
        assert!(!is_get(&Method::HEAD));
        assert!(!is_get(&Method::POST));
    }
}
