//! Server categories and the catalog root.
//!
//! # Responsibilities
//! - Group servers into the fixed ftp / tv / others categories
//! - Validate URLs and enforce the per-category capacity cap on insert

use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::catalog::server::{Server, ServerStatus};
use crate::config::{MAX_SERVERS_PER_CATEGORY, MAX_URL_LENGTH};

/// Fixed category kinds, mirroring the catalog file keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Ftp,
    Tv,
    Others,
}

impl CategoryKind {
    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Ftp => "FTP",
            CategoryKind::Tv => "TV",
            CategoryKind::Others => "Others",
        }
    }

    /// JSON key in the catalog document.
    pub fn key(&self) -> &'static str {
        match self {
            CategoryKind::Ftp => "ftp",
            CategoryKind::Tv => "tv",
            CategoryKind::Others => "others",
        }
    }
}

/// Errors raised when building a category.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("category holds the maximum of {MAX_SERVERS_PER_CATEGORY} servers")]
    CategoryFull,
}

/// True for an http(s) URL of acceptable length.
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() || url.len() > MAX_URL_LENGTH {
        return false;
    }
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// An ordered collection of servers sharing a kind.
#[derive(Debug)]
pub struct Category {
    pub kind: CategoryKind,
    servers: Vec<Arc<Server>>,
}

impl Category {
    pub fn new(kind: CategoryKind) -> Self {
        Self {
            kind,
            servers: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Append a server, validating the URL and the capacity cap.
    pub fn add(&mut self, url: &str) -> Result<(), CatalogError> {
        if !is_valid_url(url) {
            return Err(CatalogError::InvalidUrl(url.to_string()));
        }
        if self.servers.len() >= MAX_SERVERS_PER_CATEGORY {
            return Err(CatalogError::CategoryFull);
        }
        self.servers.push(Arc::new(Server::new(url)));
        Ok(())
    }

    pub fn servers(&self) -> &[Arc<Server>] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Number of servers currently holding `status`.
    pub fn count_with_status(&self, status: ServerStatus) -> usize {
        self.servers.iter().filter(|s| s.status() == status).count()
    }
}

/// The complete server catalog.
#[derive(Debug)]
pub struct Catalog {
    pub ftp: Category,
    pub tv: Category,
    pub others: Category,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            ftp: Category::new(CategoryKind::Ftp),
            tv: Category::new(CategoryKind::Tv),
            others: Category::new(CategoryKind::Others),
        }
    }

    pub fn category(&self, kind: CategoryKind) -> &Category {
        match kind {
            CategoryKind::Ftp => &self.ftp,
            CategoryKind::Tv => &self.tv,
            CategoryKind::Others => &self.others,
        }
    }

    pub fn category_mut(&mut self, kind: CategoryKind) -> &mut Category {
        match kind {
            CategoryKind::Ftp => &mut self.ftp,
            CategoryKind::Tv => &mut self.tv,
            CategoryKind::Others => &mut self.others,
        }
    }

    pub fn categories(&self) -> [&Category; 3] {
        [&self.ftp, &self.tv, &self.others]
    }

    /// Total number of servers across all categories.
    pub fn total(&self) -> usize {
        self.ftp.len() + self.tv.len() + self.others.len()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_urls() {
        let mut category = Category::new(CategoryKind::Ftp);
        assert!(category.add("http://ftp.example.com").is_ok());
        assert!(category.add("https://ftp.example.com/path").is_ok());
        assert_eq!(category.len(), 2);
    }

    #[test]
    fn rejects_invalid_urls() {
        let mut category = Category::new(CategoryKind::Tv);
        assert!(category.add("").is_err());
        assert!(category.add("ftp://old.example.com").is_err());
        assert!(category.add("not a url").is_err());

        let oversized = format!("http://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(category.add(&oversized).is_err());

        assert!(category.is_empty());
    }

    #[test]
    fn catalog_totals_span_categories() {
        let mut catalog = Catalog::new();
        catalog.ftp.add("http://a.example.com").unwrap();
        catalog.tv.add("http://b.example.com").unwrap();
        catalog.tv.add("http://c.example.com").unwrap();

        assert_eq!(catalog.total(), 3);
        assert_eq!(catalog.category(CategoryKind::Tv).len(), 2);
    }

    #[test]
    fn status_counts_follow_recorded_results() {
        let mut category = Category::new(CategoryKind::Others);
        category.add("http://a.example.com").unwrap();
        category.add("http://b.example.com").unwrap();

        assert_eq!(category.count_with_status(ServerStatus::Unknown), 2);

        category.servers()[0].record(ServerStatus::Online, 12.0, Some(200));
        assert_eq!(category.count_with_status(ServerStatus::Online), 1);
        assert_eq!(category.count_with_status(ServerStatus::Unknown), 1);
    }
}
