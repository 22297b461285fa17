//! Declarative page-to-entity scraping.
//!
//! Describe once, per plain data type, how each field is populated from a
//! live page: which location to read, how to pick among alternative
//! sources, how to transform the raw text, and how to convert it into the
//! field's type — including recursively populating nested types and
//! collections, and dereferencing URLs found on the page. The engine then
//! builds fully populated instances from any [`ValueReader`].
//!
//! ```
//! use argus_core::{Entity, TypeDescriptor, DefinitionError, value, scrape_entity};
//! use argus_core::testutil::{MockPage, MockReader};
//!
//! #[derive(Debug, Default)]
//! struct Quote {
//!     text: String,
//! }
//!
//! impl Entity for Quote {
//!     fn descriptor() -> Result<TypeDescriptor<Self>, DefinitionError> {
//!         TypeDescriptor::builder("Quote")
//!             .field("text", |e: &mut Quote| &mut e.text)
//!             .extract(value(".quote"))
//!             .parsed()
//!             .build()
//!     }
//! }
//!
//! let mut reader = MockReader::single(MockPage::new().with_text(".quote", "So it goes."));
//! let quote: Quote = scrape_entity(&mut reader).unwrap();
//! assert_eq!(quote.text, "So it goes.");
//! ```

pub mod condition;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod registry;
pub mod scrape;
pub mod testutil;
pub mod traits;
pub mod transform;

pub use condition::{Condition, Match, matches};
pub use config::ScrapeConfig;
pub use descriptor::{
    Candidate, CollectionBuilder, FieldBuilder, FieldDescriptor, TypeDescriptor,
    TypeDescriptorBuilder,
};
pub use error::{DefinitionError, ScrapeError};
pub use extract::{
    Extractor, RawValue, current_url, element, elements, from_url, from_url_attr, value,
    value_attr, values, values_attr,
};
pub use scrape::{Scraper, scrape_entity};
pub use traits::{Entity, FromScraped, TransformFn, ValueMapper, ValueReader};
pub use transform::Transformer;
