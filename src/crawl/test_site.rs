// src/crawl/test_site.rs
// In-memory website for crawler tests. Records every fetch in order.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::FetchError;
use crate::page::{Page, PageSource};

pub enum StubPage {
    Html(String),
    /// Non-2xx answer with a body
    Status(u16, String),
    /// Fetch fails without any response
    Unreachable,
}

#[derive(Default)]
pub struct StubSite {
    pages: HashMap<String, StubPage>,
    fetched: Mutex<Vec<String>>,
}

impl StubSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(self, url: &str, body: &str) -> Self {
        self.page(url, StubPage::Html(body.to_string()))
    }

    pub fn page(mut self, url: &str, page: StubPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetched.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl PageSource for StubSite {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());

        match self.pages.get(url) {
            Some(StubPage::Html(body)) => Ok(Page {
                body: body.clone(),
                content_type: Some("text/html".to_string()),
                status: 200,
            }),
            Some(StubPage::Status(status, body)) => Err(FetchError::Status {
                status: *status,
                body: body.clone(),
            }),
            Some(StubPage::Unreachable) | None => Err(FetchError::Timeout),
        }
    }
}
