use async_trait::async_trait;
use axum::http::request::Parts;
use axum::http::uri::Authority;
use axum::http::header::HOST;

use super::TenantDetectionStrategy;

/// Uses the left-most label of the request host as tenant id.
///
/// `acme.example.com` resolves to `acme`. Hosts with a single label, such as
/// `localhost`, do not resolve. IPv4 literals are not special-cased.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromRequestHostStrategy;

impl FromRequestHostStrategy {
    pub fn new() -> Self {
        Self
    }
}

fn request_host(parts: &Parts) -> Option<String> {
    let raw = parts
        .headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| parts.uri.authority().map(|a| a.to_string()))?;

    // Drops the port and any userinfo.
    let authority = raw.parse::<Authority>().ok()?;
    Some(authority.host().to_string())
}

#[async_trait]
impl TenantDetectionStrategy for FromRequestHostStrategy {
    async fn try_detect(&self, parts: &Parts) -> anyhow::Result<Option<String>> {
        let Some(host) = request_host(parts) else {
            return Ok(None);
        };

        let mut labels = host.split('.').filter(|label| !label.is_empty());

        match (labels.next(), labels.next()) {
            (Some(first), Some(_)) => Ok(Some(first.to_string())),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn detect_host(host: &str) -> Option<String> {
        let (parts, _) = Request::builder()
            .uri("/")
            .header(HOST, host)
            .body(())
            .unwrap()
            .into_parts();
        FromRequestHostStrategy.try_detect(&parts).await.unwrap()
    }

    #[tokio::test]
    async fn resolves_left_most_label() {
        assert_eq!(detect_host("example.com").await.as_deref(), Some("example"));
        assert_eq!(detect_host("sub.example.com").await.as_deref(), Some("sub"));
        assert_eq!(detect_host("deep-sub.sub.example.com").await.as_deref(), Some("deep-sub"));
    }

    #[tokio::test]
    async fn single_label_hosts_do_not_resolve() {
        assert_eq!(detect_host("localhost").await, None);
        assert_eq!(detect_host("localhost:8080").await, None);
    }

    #[tokio::test]
    async fn ignores_port_and_empty_labels() {
        assert_eq!(detect_host("acme.example.com:8443").await.as_deref(), Some("acme"));
        assert_eq!(detect_host(".acme.example.com").await.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn falls_back_to_uri_authority() {
        let (parts, _) = Request::builder()
            .uri("http://tenant.example.com/path")
            .body(())
            .unwrap()
            .into_parts();
        let detected = FromRequestHostStrategy.try_detect(&parts).await.unwrap();
        assert_eq!(detected.as_deref(), Some("tenant"));
    }

    #[tokio::test]
    async fn no_host_does_not_resolve() {
        let (parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        assert_eq!(FromRequestHostStrategy.try_detect(&parts).await.unwrap(), None);
    }
}
