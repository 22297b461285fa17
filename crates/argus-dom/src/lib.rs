//! HTML-backed value reader for the Argus scraping engine.
//!
//! [`HtmlReader`] implements [`argus_core::ValueReader`] over pages parsed
//! with `scraper`, using CSS selectors as locations. Pages come from a
//! [`PageLoader`]: an in-memory set of fixtures ([`StaticPages`]) or plain
//! HTTP ([`HttpLoader`]). This is enough to exercise descriptors end to
//! end against real markup without driving a browser.

pub mod html;
pub mod loader;

pub use html::HtmlReader;
pub use loader::{HttpLoader, PageLoader, StaticPages};
