//! Remote manifest source
//!
//! The manifest is the file produced by an export, placed where public
//! viewers can reach it. HTTP locations are fetched with a time-varying
//! query parameter so a stale cached copy is never served forever; any
//! other location is read as a local file.

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::Url;
use std::path::PathBuf;

use crate::error::ManifestError;
use crate::state::data::{parse_manifest, WorkRecord};
use crate::state::now_millis;

/// Query parameter carrying the cache-busting timestamp
pub const CACHE_BUST_PARAM: &str = "t";

#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Human-readable location for logs
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<WorkRecord>, ManifestError>;
}

/// Pick the source for a configured location
pub fn source_for(location: &str) -> Box<dyn ManifestSource> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Box::new(HttpManifest::new(url)),
        _ => Box::new(FileManifest::new(location)),
    }
}

/// Append the cache-busting parameter to `url`
pub fn cache_busted(url: &Url, stamp: i64) -> Url {
    let mut busted = url.clone();
    busted
        .query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &stamp.to_string());
    busted
}

pub struct HttpManifest {
    client: reqwest::Client,
    url: Url,
}

impl HttpManifest {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Reuse an existing client (shares its connection pool)
    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ManifestSource for HttpManifest {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Vec<WorkRecord>, ManifestError> {
        let url = cache_busted(&self.url, now_millis());
        tracing::debug!("Fetching manifest from {}", url);

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManifestError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(parse_manifest(&body)?)
    }
}

pub struct FileManifest {
    path: PathBuf,
}

impl FileManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ManifestSource for FileManifest {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<WorkRecord>, ManifestError> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        Ok(parse_manifest(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Serve one HTTP response on a local port; the handle yields the raw request
    fn serve_once(status_line: &str, body: &str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 8192];
            let n = stream.read(&mut buf).unwrap();
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });

        let url = Url::parse(&format!("http://{addr}/works.json")).unwrap();
        (url, handle)
    }

    fn direct_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_cache_busting_varies_with_time() {
        let url = Url::parse("https://example.com/data/works.json?v=2").unwrap();

        let first = cache_busted(&url, 1000);
        let second = cache_busted(&url, 2000);

        assert_ne!(first, second);
        assert_eq!(first.as_str(), "https://example.com/data/works.json?v=2&t=1000");
        assert_eq!(second.path(), url.path());
    }

    #[test]
    fn test_source_for_picks_backend() {
        assert_eq!(
            source_for("https://example.com/works.json").describe(),
            "https://example.com/works.json"
        );
        assert_eq!(source_for("public/works.json").describe(), "public/works.json");
    }

    #[tokio::test]
    async fn test_file_manifest_reads_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("works.json");
        std::fs::write(
            &path,
            r#"[{"id":"r1","title":"t","description":"d","mediaUrl":"m.png","mediaType":"image","createdAt":3}]"#,
        )
        .unwrap();

        let works = FileManifest::new(&path).fetch().await.unwrap();

        assert_eq!(works.len(), 1);
        assert_eq!(works[0].id, "r1");
    }

    #[tokio::test]
    async fn test_file_manifest_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = FileManifest::new(dir.path().join("absent.json")).fetch().await;
        assert!(matches!(missing, Err(ManifestError::Io(_))));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let broken = FileManifest::new(&path).fetch().await;
        assert!(matches!(broken, Err(ManifestError::Parse(_))));
    }

    #[tokio::test]
    async fn test_http_fetch_sends_cache_busting_request() {
        let (url, server) = serve_once(
            "200 OK",
            r#"[{"id":"r1","title":"t","description":"d","mediaUrl":"m.png","mediaType":"image","createdAt":3}]"#,
        );

        let works = HttpManifest::with_client(direct_client(), url).fetch().await.unwrap();
        let request = server.join().unwrap();

        assert_eq!(works.len(), 1);
        assert_eq!(works[0].id, "r1");
        assert!(request.starts_with("GET /works.json?t="));
        assert!(request.to_ascii_lowercase().contains("cache-control: no-cache"));
    }

    #[tokio::test]
    async fn test_http_error_status_is_reported() {
        let (url, server) = serve_once("500 Internal Server Error", "oops");

        let result = HttpManifest::with_client(direct_client(), url).fetch().await;
        server.join().unwrap();

        assert!(matches!(result, Err(ManifestError::Status(500))));
    }
}
