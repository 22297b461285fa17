//! Test utilities: a scripted mock value-reader with a recorded call log.
//!
//! Handwritten mocks using `Arc<Mutex<_>>` for interior mutability, so
//! tests can assert on the exact sequence of reader calls an evaluation
//! produced (which candidates ran, how navigation was bracketed).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::ScrapeError;
use crate::traits::ValueReader;

/// One recorded call against a [`MockReader`] or one of its scoped
/// element readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderCall {
    ElementText(String),
    ElementTexts(String),
    Attribute(String, String),
    Attributes(String, String),
    Element(String),
    Elements(String),
    CurrentUrl,
    NavigateTo(String),
    NavigateBack,
}

/// Scripted content for one page (or one element sub-tree).
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    texts: HashMap<String, Vec<String>>,
    attrs: HashMap<(String, String), Vec<String>>,
    elements: HashMap<String, Vec<MockPage>>,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, location: &str, text: &str) -> Self {
        self.with_texts(location, [text])
    }

    pub fn with_texts<I, S>(mut self, location: &str, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts.insert(
            location.to_string(),
            texts.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn with_attr(self, location: &str, name: &str, value: &str) -> Self {
        self.with_attrs(location, name, [value])
    }

    pub fn with_attrs<I, S>(mut self, location: &str, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs.insert(
            (location.to_string(), name.to_string()),
            values.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn with_element(self, location: &str, page: MockPage) -> Self {
        self.with_elements(location, [page])
    }

    pub fn with_elements<I>(mut self, location: &str, pages: I) -> Self
    where
        I: IntoIterator<Item = MockPage>,
    {
        self.elements
            .insert(location.to_string(), pages.into_iter().collect());
        self
    }
}

fn missing(location: &str) -> ScrapeError {
    ScrapeError::MissingElement {
        location: location.to_string(),
    }
}

fn read_text(page: &MockPage, location: &str) -> Result<String, ScrapeError> {
    page.texts
        .get(location)
        .and_then(|v| v.first())
        .cloned()
        .ok_or_else(|| missing(location))
}

fn read_texts(page: &MockPage, location: &str) -> Result<Vec<String>, ScrapeError> {
    page.texts
        .get(location)
        .cloned()
        .ok_or_else(|| missing(location))
}

fn read_attr(page: &MockPage, location: &str, name: &str) -> Result<String, ScrapeError> {
    page.attrs
        .get(&(location.to_string(), name.to_string()))
        .and_then(|v| v.first())
        .cloned()
        .ok_or_else(|| missing(location))
}

fn read_attrs(page: &MockPage, location: &str, name: &str) -> Result<Vec<String>, ScrapeError> {
    page.attrs
        .get(&(location.to_string(), name.to_string()))
        .cloned()
        .ok_or_else(|| missing(location))
}

/// Mock reader over a set of scripted pages, recording every call.
///
/// Clones share the page set and the call log; navigation state is per
/// instance.
#[derive(Clone)]
pub struct MockReader {
    pages: Arc<HashMap<String, MockPage>>,
    current: String,
    history: Vec<String>,
    calls: Arc<Mutex<Vec<ReaderCall>>>,
}

impl MockReader {
    pub const DEFAULT_URL: &'static str = "https://mock.test/";

    /// Reader over a single page at [`Self::DEFAULT_URL`].
    pub fn single(page: MockPage) -> Self {
        Self::with_pages(Self::DEFAULT_URL, [(Self::DEFAULT_URL, page)])
    }

    /// Reader over several scripted pages, starting at `initial_url`.
    pub fn with_pages<'a, I>(initial_url: &str, pages: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, MockPage)>,
    {
        let pages: HashMap<String, MockPage> = pages
            .into_iter()
            .map(|(url, page)| (url.to_string(), page))
            .collect();
        Self {
            pages: Arc::new(pages),
            current: initial_url.to_string(),
            history: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<ReaderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the navigation calls, in order.
    pub fn navigations(&self) -> Vec<ReaderCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, ReaderCall::NavigateTo(_) | ReaderCall::NavigateBack))
            .collect()
    }

    /// URL of the page the reader is currently on.
    pub fn current_page_url(&self) -> &str {
        &self.current
    }

    fn page(&self) -> Result<&MockPage, ScrapeError> {
        self.pages
            .get(&self.current)
            .ok_or_else(|| ScrapeError::Navigation(format!("no page scripted for {}", self.current)))
    }

    fn log(&self, call: ReaderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ValueReader for MockReader {
    fn element_text(&self, location: &str) -> Result<String, ScrapeError> {
        self.log(ReaderCall::ElementText(location.to_string()));
        read_text(self.page()?, location)
    }

    fn element_texts(&self, location: &str) -> Result<Vec<String>, ScrapeError> {
        self.log(ReaderCall::ElementTexts(location.to_string()));
        read_texts(self.page()?, location)
    }

    fn attribute(&self, location: &str, name: &str) -> Result<String, ScrapeError> {
        self.log(ReaderCall::Attribute(
            location.to_string(),
            name.to_string(),
        ));
        read_attr(self.page()?, location, name)
    }

    fn attributes(&self, location: &str, name: &str) -> Result<Vec<String>, ScrapeError> {
        self.log(ReaderCall::Attributes(
            location.to_string(),
            name.to_string(),
        ));
        read_attrs(self.page()?, location, name)
    }

    fn element(&self, location: &str) -> Result<Box<dyn ValueReader>, ScrapeError> {
        self.log(ReaderCall::Element(location.to_string()));
        let page = self.page()?;
        let sub = page
            .elements
            .get(location)
            .and_then(|v| v.first())
            .cloned()
            .ok_or_else(|| missing(location))?;
        Ok(Box::new(MockElement {
            page: sub,
            url: self.current.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }

    fn elements(&self, location: &str) -> Result<Vec<Box<dyn ValueReader>>, ScrapeError> {
        self.log(ReaderCall::Elements(location.to_string()));
        let page = self.page()?;
        let subs = page
            .elements
            .get(location)
            .cloned()
            .ok_or_else(|| missing(location))?;
        Ok(subs
            .into_iter()
            .map(|sub| {
                Box::new(MockElement {
                    page: sub,
                    url: self.current.clone(),
                    calls: Arc::clone(&self.calls),
                }) as Box<dyn ValueReader>
            })
            .collect())
    }

    fn current_url(&self) -> Result<String, ScrapeError> {
        self.log(ReaderCall::CurrentUrl);
        Ok(self.current.clone())
    }

    fn navigate_to(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.log(ReaderCall::NavigateTo(url.to_string()));
        if !self.pages.contains_key(url) {
            return Err(ScrapeError::Navigation(format!(
                "no page scripted for {url}"
            )));
        }
        self.history
            .push(std::mem::replace(&mut self.current, url.to_string()));
        Ok(())
    }

    fn navigate_back(&mut self) -> Result<(), ScrapeError> {
        self.log(ReaderCall::NavigateBack);
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                Ok(())
            }
            None => Err(ScrapeError::Navigation("history is empty".to_string())),
        }
    }
}

/// Reader scoped to a scripted element sub-tree. Refuses navigation, like
/// any element-scoped reader.
#[derive(Clone)]
pub struct MockElement {
    page: MockPage,
    url: String,
    calls: Arc<Mutex<Vec<ReaderCall>>>,
}

impl MockElement {
    fn log(&self, call: ReaderCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn scoped(&self, page: MockPage) -> MockElement {
        MockElement {
            page,
            url: self.url.clone(),
            calls: Arc::clone(&self.calls),
        }
    }
}

impl ValueReader for MockElement {
    fn element_text(&self, location: &str) -> Result<String, ScrapeError> {
        self.log(ReaderCall::ElementText(location.to_string()));
        read_text(&self.page, location)
    }

    fn element_texts(&self, location: &str) -> Result<Vec<String>, ScrapeError> {
        self.log(ReaderCall::ElementTexts(location.to_string()));
        read_texts(&self.page, location)
    }

    fn attribute(&self, location: &str, name: &str) -> Result<String, ScrapeError> {
        self.log(ReaderCall::Attribute(
            location.to_string(),
            name.to_string(),
        ));
        read_attr(&self.page, location, name)
    }

    fn attributes(&self, location: &str, name: &str) -> Result<Vec<String>, ScrapeError> {
        self.log(ReaderCall::Attributes(
            location.to_string(),
            name.to_string(),
        ));
        read_attrs(&self.page, location, name)
    }

    fn element(&self, location: &str) -> Result<Box<dyn ValueReader>, ScrapeError> {
        self.log(ReaderCall::Element(location.to_string()));
        let sub = self
            .page
            .elements
            .get(location)
            .and_then(|v| v.first())
            .cloned()
            .ok_or_else(|| missing(location))?;
        Ok(Box::new(self.scoped(sub)))
    }

    fn elements(&self, location: &str) -> Result<Vec<Box<dyn ValueReader>>, ScrapeError> {
        self.log(ReaderCall::Elements(location.to_string()));
        let subs = self
            .page
            .elements
            .get(location)
            .cloned()
            .ok_or_else(|| missing(location))?;
        Ok(subs
            .into_iter()
            .map(|sub| Box::new(self.scoped(sub)) as Box<dyn ValueReader>)
            .collect())
    }

    fn current_url(&self) -> Result<String, ScrapeError> {
        self.log(ReaderCall::CurrentUrl);
        Ok(self.url.clone())
    }

    fn navigate_to(&mut self, _url: &str) -> Result<(), ScrapeError> {
        Err(ScrapeError::Navigation(
            "scoped element readers cannot navigate".to_string(),
        ))
    }

    fn navigate_back(&mut self) -> Result<(), ScrapeError> {
        Err(ScrapeError::Navigation(
            "scoped element readers cannot navigate".to_string(),
        ))
    }
}
