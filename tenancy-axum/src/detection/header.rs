use async_trait::async_trait;
use axum::http::request::Parts;

use super::TenantDetectionStrategy;

/// Reads the tenant id from a request header.
///
/// A missing, empty or whitespace-only header yields no tenant. When the
/// header is sent more than once the first value is used.
#[derive(Debug, Clone)]
pub struct FromRequestHeaderStrategy {
    header_name: String,
}

impl FromRequestHeaderStrategy {
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
        }
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }
}

#[async_trait]
impl TenantDetectionStrategy for FromRequestHeaderStrategy {
    async fn try_detect(&self, parts: &Parts) -> anyhow::Result<Option<String>> {
        let mut values = parts.headers.get_all(self.header_name.as_str()).iter();

        let Some(first) = values.next() else {
            return Ok(None);
        };

        if values.next().is_some() {
            tracing::warn!(header = %self.header_name, "multiple tenant header values found, using the first");
        }

        let Ok(value) = std::str::from_utf8(first.as_bytes()) else {
            tracing::debug!(header = %self.header_name, "tenant header is not valid UTF-8");
            return Ok(None);
        };

        if value.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(value.to_string()))
    }
}
