use argus_core::{ScrapeError, ValueReader};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::loader::PageLoader;

/// Value reader over parsed HTML pages, with CSS selectors as locations.
///
/// Holds the current page and a navigation history stack. `navigate_to`
/// resolves relative URLs against the current page and loads the target
/// through the configured [`PageLoader`]; `navigate_back` pops the stack.
pub struct HtmlReader<L: PageLoader> {
    loader: L,
    current: Page,
    history: Vec<Page>,
}

struct Page {
    url: Url,
    html: Html,
}

impl<L: PageLoader> HtmlReader<L> {
    /// Load `start_url` through `loader` and position the reader on it.
    pub fn open(loader: L, start_url: &str) -> Result<Self, ScrapeError> {
        let url = Url::parse(start_url)
            .map_err(|e| ScrapeError::Navigation(format!("invalid start url '{start_url}': {e}")))?;
        let body = loader.load(url.as_str())?;
        tracing::debug!(url = %url, "loaded start page");
        Ok(Self {
            loader,
            current: Page {
                url,
                html: Html::parse_document(&body),
            },
            history: Vec::new(),
        })
    }
}

impl HtmlReader<crate::loader::StaticPages> {
    /// Reader over one fixed page, for tests and fixtures.
    pub fn single(url: &str, html: &str) -> Result<Self, ScrapeError> {
        Self::open(crate::loader::StaticPages::new().page(url, html), url)
    }
}

fn parse_selector(location: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(location).map_err(|e| ScrapeError::Location {
        location: location.to_string(),
        message: e.to_string(),
    })
}

fn missing(location: &str) -> ScrapeError {
    ScrapeError::MissingElement {
        location: location.to_string(),
    }
}

/// Joined text of an element's text nodes with whitespace runs collapsed,
/// since markup indentation is noise to descriptors.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_element<'a>(html: &'a Html, location: &str) -> Result<ElementRef<'a>, ScrapeError> {
    let selector = parse_selector(location)?;
    html.select(&selector).next().ok_or_else(|| missing(location))
}

fn read_text(html: &Html, location: &str) -> Result<String, ScrapeError> {
    first_element(html, location).map(text_of)
}

fn read_texts(html: &Html, location: &str) -> Result<Vec<String>, ScrapeError> {
    let selector = parse_selector(location)?;
    let collected: Vec<String> = html.select(&selector).map(text_of).collect();
    if collected.is_empty() {
        return Err(missing(location));
    }
    Ok(collected)
}

fn read_attr(html: &Html, location: &str, name: &str) -> Result<String, ScrapeError> {
    let element = first_element(html, location)?;
    element
        .value()
        .attr(name)
        .map(str::to_string)
        .ok_or_else(|| missing(&format!("{location}@{name}")))
}

fn read_attrs(html: &Html, location: &str, name: &str) -> Result<Vec<String>, ScrapeError> {
    let selector = parse_selector(location)?;
    let mut out = Vec::new();
    for element in html.select(&selector) {
        match element.value().attr(name) {
            Some(v) => out.push(v.to_string()),
            None => return Err(missing(&format!("{location}@{name}"))),
        }
    }
    if out.is_empty() {
        return Err(missing(location));
    }
    Ok(out)
}

fn fragment_of(element: ElementRef<'_>, url: &Url) -> FragmentReader {
    FragmentReader {
        url: url.to_string(),
        html: Html::parse_fragment(&element.html()),
    }
}

impl<L: PageLoader> ValueReader for HtmlReader<L> {
    fn element_text(&self, location: &str) -> Result<String, ScrapeError> {
        read_text(&self.current.html, location)
    }

    fn element_texts(&self, location: &str) -> Result<Vec<String>, ScrapeError> {
        read_texts(&self.current.html, location)
    }

    fn attribute(&self, location: &str, name: &str) -> Result<String, ScrapeError> {
        read_attr(&self.current.html, location, name)
    }

    fn attributes(&self, location: &str, name: &str) -> Result<Vec<String>, ScrapeError> {
        read_attrs(&self.current.html, location, name)
    }

    fn element(&self, location: &str) -> Result<Box<dyn ValueReader>, ScrapeError> {
        let element = first_element(&self.current.html, location)?;
        Ok(Box::new(fragment_of(element, &self.current.url)))
    }

    fn elements(&self, location: &str) -> Result<Vec<Box<dyn ValueReader>>, ScrapeError> {
        let selector = parse_selector(location)?;
        let readers: Vec<Box<dyn ValueReader>> = self
            .current
            .html
            .select(&selector)
            .map(|el| Box::new(fragment_of(el, &self.current.url)) as Box<dyn ValueReader>)
            .collect();
        if readers.is_empty() {
            return Err(missing(location));
        }
        Ok(readers)
    }

    fn current_url(&self) -> Result<String, ScrapeError> {
        Ok(self.current.url.to_string())
    }

    fn navigate_to(&mut self, url: &str) -> Result<(), ScrapeError> {
        let resolved = self
            .current
            .url
            .join(url)
            .map_err(|e| ScrapeError::Navigation(format!("cannot resolve '{url}': {e}")))?;
        tracing::info!(url = %resolved, "navigating");
        let body = self.loader.load(resolved.as_str())?;
        self.history.push(std::mem::replace(
            &mut self.current,
            Page {
                url: resolved,
                html: Html::parse_document(&body),
            },
        ));
        Ok(())
    }

    fn navigate_back(&mut self) -> Result<(), ScrapeError> {
        match self.history.pop() {
            Some(previous) => {
                tracing::info!(url = %previous.url, "navigating back");
                self.current = previous;
                Ok(())
            }
            None => Err(ScrapeError::Navigation("history is empty".to_string())),
        }
    }
}

/// Reader scoped to one element's sub-tree. Carries the owning page's URL
/// and refuses navigation.
pub struct FragmentReader {
    url: String,
    html: Html,
}

impl ValueReader for FragmentReader {
    fn element_text(&self, location: &str) -> Result<String, ScrapeError> {
        read_text(&self.html, location)
    }

    fn element_texts(&self, location: &str) -> Result<Vec<String>, ScrapeError> {
        read_texts(&self.html, location)
    }

    fn attribute(&self, location: &str, name: &str) -> Result<String, ScrapeError> {
        read_attr(&self.html, location, name)
    }

    fn attributes(&self, location: &str, name: &str) -> Result<Vec<String>, ScrapeError> {
        read_attrs(&self.html, location, name)
    }

    fn element(&self, location: &str) -> Result<Box<dyn ValueReader>, ScrapeError> {
        let element = first_element(&self.html, location)?;
        Ok(Box::new(FragmentReader {
            url: self.url.clone(),
            html: Html::parse_fragment(&element.html()),
        }))
    }

    fn elements(&self, location: &str) -> Result<Vec<Box<dyn ValueReader>>, ScrapeError> {
        let selector = parse_selector(location)?;
        let readers: Vec<Box<dyn ValueReader>> = self
            .html
            .select(&selector)
            .map(|el| {
                Box::new(FragmentReader {
                    url: self.url.clone(),
                    html: Html::parse_fragment(&el.html()),
                }) as Box<dyn ValueReader>
            })
            .collect();
        if readers.is_empty() {
            return Err(missing(location));
        }
        Ok(readers)
    }

    fn current_url(&self) -> Result<String, ScrapeError> {
        Ok(self.url.clone())
    }

    fn navigate_to(&mut self, _url: &str) -> Result<(), ScrapeError> {
        Err(ScrapeError::Navigation(
            "element-scoped readers cannot navigate".to_string(),
        ))
    }

    fn navigate_back(&mut self) -> Result<(), ScrapeError> {
        Err(ScrapeError::Navigation(
            "element-scoped readers cannot navigate".to_string(),
        ))
    }
}
