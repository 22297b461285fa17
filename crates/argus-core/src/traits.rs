use crate::descriptor::TypeDescriptor;
use crate::error::{DefinitionError, ScrapeError};

/// Read and navigation operations over the current page, supplied by the
/// browser-automation collaborator.
///
/// All lookup methods fail with [`ScrapeError::MissingElement`] when the
/// location resolves to nothing, so callers can tell "not on this page"
/// apart from transport and navigation failures.
///
/// Element handles are themselves readers, scoped to the element's
/// sub-tree. Scoped readers refuse navigation.
pub trait ValueReader {
    /// Text content of the first element at `location`.
    fn element_text(&self, location: &str) -> Result<String, ScrapeError>;

    /// Text content of every element at `location`.
    fn element_texts(&self, location: &str) -> Result<Vec<String>, ScrapeError>;

    /// Named attribute of the first element at `location`.
    fn attribute(&self, location: &str, name: &str) -> Result<String, ScrapeError>;

    /// Named attribute of every element at `location`.
    fn attributes(&self, location: &str, name: &str) -> Result<Vec<String>, ScrapeError>;

    /// Reader scoped to the first element at `location`.
    fn element(&self, location: &str) -> Result<Box<dyn ValueReader>, ScrapeError>;

    /// Readers scoped to every element at `location`, in document order.
    fn elements(&self, location: &str) -> Result<Vec<Box<dyn ValueReader>>, ScrapeError>;

    /// URL of the page this reader is looking at.
    fn current_url(&self) -> Result<String, ScrapeError>;

    /// Navigate the shared browsing session to `url`.
    fn navigate_to(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Return to the previous page in the session history.
    fn navigate_back(&mut self) -> Result<(), ScrapeError>;
}

/// A type that can be populated from a page by the scraping engine.
///
/// `descriptor()` declares, once, how each field is extracted; the result
/// is cached per type for the process lifetime, so it must be pure.
/// `Default` provides the zero-value instance fields start from.
pub trait Entity: Default + Sized + 'static {
    fn descriptor() -> Result<TypeDescriptor<Self>, DefinitionError>;
}

/// User-supplied pure string transform with declared parameters.
///
/// Implemented for any matching `Fn`, so plain functions work directly:
///
/// ```
/// use argus_core::error::ScrapeError;
///
/// fn shout(value: &str, _params: &[String]) -> Result<String, ScrapeError> {
///     Ok(value.to_uppercase())
/// }
/// ```
pub trait TransformFn: Send + Sync {
    fn apply(&self, value: &str, params: &[String]) -> Result<String, ScrapeError>;
}

impl<F> TransformFn for F
where
    F: Fn(&str, &[String]) -> Result<String, ScrapeError> + Send + Sync,
{
    fn apply(&self, value: &str, params: &[String]) -> Result<String, ScrapeError> {
        self(value, params)
    }
}

/// User-supplied conversion from a transformed string into the field's
/// target type. Receives the reader too, for context-dependent conversion
/// (e.g. resolving a relative URL against the current page).
pub trait ValueMapper<T>: Send + Sync {
    fn map(&self, value: &str, reader: &dyn ValueReader) -> Result<T, ScrapeError>;
}

impl<T, F> ValueMapper<T> for F
where
    F: Fn(&str, &dyn ValueReader) -> Result<T, ScrapeError> + Send + Sync,
{
    fn map(&self, value: &str, reader: &dyn ValueReader) -> Result<T, ScrapeError> {
        self(value, reader)
    }
}

/// Textual parse into a field's target type — the identity conversion for
/// strings and the standard parse for primitives and URLs.
///
/// Numeric, boolean, and URL parsing trim surrounding whitespace first,
/// since extracted page text routinely carries it.
pub trait FromScraped: Sized {
    fn from_scraped(value: &str) -> Result<Self, ScrapeError>;
}

impl FromScraped for String {
    fn from_scraped(value: &str) -> Result<Self, ScrapeError> {
        Ok(value.to_string())
    }
}

macro_rules! impl_from_scraped_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromScraped for $ty {
                fn from_scraped(value: &str) -> Result<Self, ScrapeError> {
                    value.trim().parse().map_err(|e| ScrapeError::Parse {
                        value: value.to_string(),
                        target: stringify!($ty),
                        message: format!("{e}"),
                    })
                }
            }
        )*
    };
}

impl_from_scraped_parse!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool);

impl FromScraped for url::Url {
    fn from_scraped(value: &str) -> Result<Self, ScrapeError> {
        url::Url::parse(value.trim()).map_err(|e| ScrapeError::Parse {
            value: value.to_string(),
            target: "Url",
            message: format!("{e}"),
        })
    }
}
