//! Extractors: produce a raw value from a named source on the current page.

use crate::error::ScrapeError;
use crate::traits::ValueReader;

/// The untransformed, unconverted output of an [`Extractor`].
///
/// `Url` values mark a dereference target: the string is a URL that the
/// field evaluator will navigate to before nested extraction. Element
/// values are readers scoped to the matched element's sub-tree.
pub enum RawValue {
    Text(String),
    TextList(Vec<String>),
    Element(Box<dyn ValueReader>),
    ElementList(Vec<Box<dyn ValueReader>>),
    Url(String),
    UrlList(Vec<String>),
}

impl std::fmt::Debug for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawValue({})", self.kind())
    }
}

impl RawValue {
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Text(_) => "text",
            RawValue::TextList(_) => "text-list",
            RawValue::Element(_) => "element",
            RawValue::ElementList(_) => "element-list",
            RawValue::Url(_) => "url",
            RawValue::UrlList(_) => "url-list",
        }
    }

    pub(crate) fn into_text(self) -> Result<String, ScrapeError> {
        match self {
            RawValue::Text(s) | RawValue::Url(s) => Ok(s),
            other => Err(ScrapeError::Internal(format!(
                "expected a single text value, got {}",
                other.kind()
            ))),
        }
    }

    pub(crate) fn into_texts(self) -> Result<Vec<String>, ScrapeError> {
        match self {
            RawValue::TextList(v) | RawValue::UrlList(v) => Ok(v),
            other => Err(ScrapeError::Internal(format!(
                "expected a list of text values, got {}",
                other.kind()
            ))),
        }
    }
}

/// Where and how a field's raw value is read from the page.
///
/// A closed set: descriptor building picks exactly one strategy per
/// candidate. `FromUrlList` never appears in the builder DSL — collection
/// fields normalize `FromUrl` into it at descriptor build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    /// Text (or a named attribute) of the first element at a location.
    Value {
        location: String,
        attribute: Option<String>,
    },
    /// Texts (or a named attribute) of every element at a location.
    ValueList {
        location: String,
        attribute: Option<String>,
    },
    /// Reader scoped to the first element at a location.
    Element { location: String },
    /// Readers scoped to every element at a location.
    ElementList { location: String },
    /// The reader's current page URL.
    CurrentUrl,
    /// A URL read from the page, to be dereferenced for nested extraction.
    FromUrl {
        location: String,
        attribute: Option<String>,
    },
    /// One dereference target per element at a location.
    FromUrlList {
        location: String,
        attribute: Option<String>,
    },
}

impl Extractor {
    /// Run this extractor against the reader.
    ///
    /// Missing locations surface the reader's missing-element error;
    /// extraction never silently yields an empty value.
    pub fn extract(&self, reader: &mut dyn ValueReader) -> Result<RawValue, ScrapeError> {
        match self {
            Extractor::Value {
                location,
                attribute,
            } => match attribute {
                Some(name) => reader.attribute(location, name).map(RawValue::Text),
                None => reader.element_text(location).map(RawValue::Text),
            },
            Extractor::ValueList {
                location,
                attribute,
            } => match attribute {
                Some(name) => reader.attributes(location, name).map(RawValue::TextList),
                None => reader.element_texts(location).map(RawValue::TextList),
            },
            Extractor::Element { location } => reader.element(location).map(RawValue::Element),
            Extractor::ElementList { location } => {
                reader.elements(location).map(RawValue::ElementList)
            }
            Extractor::CurrentUrl => reader.current_url().map(RawValue::Text),
            Extractor::FromUrl {
                location,
                attribute,
            } => match attribute {
                Some(name) => reader.attribute(location, name).map(RawValue::Url),
                None => reader.element_text(location).map(RawValue::Url),
            },
            Extractor::FromUrlList {
                location,
                attribute,
            } => match attribute {
                Some(name) => reader.attributes(location, name).map(RawValue::UrlList),
                None => reader.element_texts(location).map(RawValue::UrlList),
            },
        }
    }

    /// Short name used in definition-error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Extractor::Value { .. } => "value",
            Extractor::ValueList { .. } => "value-list",
            Extractor::Element { .. } => "element",
            Extractor::ElementList { .. } => "element-list",
            Extractor::CurrentUrl => "current-url",
            Extractor::FromUrl { .. } => "from-url",
            Extractor::FromUrlList { .. } => "from-url-list",
        }
    }

    pub(crate) fn is_element(&self) -> bool {
        matches!(
            self,
            Extractor::Element { .. } | Extractor::ElementList { .. }
        )
    }
}

/// Text of the first element at `location`.
pub fn value(location: impl Into<String>) -> Extractor {
    Extractor::Value {
        location: location.into(),
        attribute: None,
    }
}

/// Named attribute of the first element at `location`.
pub fn value_attr(location: impl Into<String>, attribute: impl Into<String>) -> Extractor {
    Extractor::Value {
        location: location.into(),
        attribute: Some(attribute.into()),
    }
}

/// Texts of every element at `location`.
pub fn values(location: impl Into<String>) -> Extractor {
    Extractor::ValueList {
        location: location.into(),
        attribute: None,
    }
}

/// Named attribute of every element at `location`.
pub fn values_attr(location: impl Into<String>, attribute: impl Into<String>) -> Extractor {
    Extractor::ValueList {
        location: location.into(),
        attribute: Some(attribute.into()),
    }
}

/// Reader scoped to the first element at `location` (for nested entities).
pub fn element(location: impl Into<String>) -> Extractor {
    Extractor::Element {
        location: location.into(),
    }
}

/// Readers scoped to every element at `location`.
pub fn elements(location: impl Into<String>) -> Extractor {
    Extractor::ElementList {
        location: location.into(),
    }
}

/// The current page URL.
pub fn current_url() -> Extractor {
    Extractor::CurrentUrl
}

/// Dereference the URL found in the text of `location`.
pub fn from_url(location: impl Into<String>) -> Extractor {
    Extractor::FromUrl {
        location: location.into(),
        attribute: None,
    }
}

/// Dereference the URL found in the named attribute of `location`.
pub fn from_url_attr(location: impl Into<String>, attribute: impl Into<String>) -> Extractor {
    Extractor::FromUrl {
        location: location.into(),
        attribute: Some(attribute.into()),
    }
}

/// Run `f` on the dereferenced page, then return to the current one.
///
/// The back-navigation runs on the error path as well, so the browsing
/// session is restored no matter how the nested work ends. There is one
/// shared session: callers must not interleave other navigation between
/// the two halves of the bracket.
pub(crate) fn with_dereference<R>(
    reader: &mut dyn ValueReader,
    url: &str,
    f: impl FnOnce(&mut dyn ValueReader) -> Result<R, ScrapeError>,
) -> Result<R, ScrapeError> {
    tracing::debug!(url, "dereferencing");
    reader.navigate_to(url)?;
    let result = f(reader);
    let back = reader.navigate_back();
    match (result, back) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(back_err)) => {
            tracing::warn!(url, error = %back_err, "return navigation failed after error");
            Err(e)
        }
        (Ok(_), Err(back_err)) => Err(back_err),
    }
}
