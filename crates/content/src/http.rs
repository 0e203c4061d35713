use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::source::{QuizSource, ResourceRef, SourceError};

/// Fetches quiz documents over HTTP(S).
///
/// Resource references must be absolute URLs; chapter files resolve relative
/// to the manifest URL.
#[derive(Clone, Debug, Default)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn parse(resource: &ResourceRef) -> Result<Url, SourceError> {
        Url::parse(resource.as_str())
            .map_err(|_| SourceError::InvalidReference(resource.to_string()))
    }
}

#[async_trait]
impl QuizSource for HttpSource {
    async fn fetch(&self, resource: &ResourceRef) -> Result<Vec<u8>, SourceError> {
        let url = Self::parse(resource)?;
        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(resource.to_string()));
        }
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn resolve(&self, base: &ResourceRef, reference: &str) -> Result<ResourceRef, SourceError> {
        let base = Self::parse(base)?;
        base.join(reference.trim())
            .map(|url| ResourceRef::new(url.as_str()))
            .map_err(|_| SourceError::InvalidReference(reference.to_string()))
    }
}

/// True when `raw` looks like an HTTP(S) URL rather than a file path.
#[must_use]
pub fn is_http_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single HTTP response on a local port and return the URL to request.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let mut read = 0;
            while !request[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut request[read..]).await.unwrap();
                if n == 0 {
                    break;
                }
                read += n;
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{addr}/quiz/quiz.json")
    }

    fn local_source() -> HttpSource {
        HttpSource::new().with_client(Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn success_returns_the_body() {
        let url = serve_once("200 OK", r#"{"questions":[]}"#).await;
        let body = local_source().fetch(&url.as_str().into()).await.unwrap();
        assert_eq!(body, br#"{"questions":[]}"#);
    }

    #[tokio::test]
    async fn missing_resource_is_not_found() {
        let url = serve_once("404 Not Found", "").await;
        let err = local_source().fetch(&url.as_str().into()).await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(ref resource) if *resource == url));
    }

    #[tokio::test]
    async fn other_failures_carry_the_status() {
        let url = serve_once("500 Internal Server Error", "boom").await;
        let err = local_source().fetch(&url.as_str().into()).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Status(status) if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[test]
    fn chapter_urls_resolve_against_manifest() {
        let source = HttpSource::new();
        let resolved = source
            .resolve(
                &"https://example.com/quiz/quiz.json".into(),
                "chapters/Chapter1.json",
            )
            .unwrap();
        assert_eq!(
            resolved.as_str(),
            "https://example.com/quiz/chapters/Chapter1.json"
        );
    }

    #[test]
    fn relative_base_is_rejected() {
        let err = HttpSource::new()
            .resolve(&"quiz.json".into(), "c1.json")
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidReference(_)));
    }

    #[test]
    fn detects_http_urls() {
        assert!(is_http_url("https://example.com/quiz.json"));
        assert!(!is_http_url("quiz.json"));
        assert!(!is_http_url("file:///tmp/quiz.json"));
    }
}
