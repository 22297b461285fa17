use thiserror::Error;

/// A malformed or contradictory field descriptor, detected while a type's
/// descriptor is being constructed — before any page is touched.
///
/// `Clone` so the descriptor registry can re-raise the same failure to
/// every caller that requests the broken type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid descriptor for {entity}.{field}: {reason}")]
pub struct DefinitionError {
    pub entity: String,
    pub field: String,
    pub reason: String,
}

impl DefinitionError {
    pub fn new(
        entity: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error types for the scraping engine.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Descriptor construction failed. Fatal for the type, independent of
    /// any particular page.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// A page location resolved to nothing. Distinct from navigation and
    /// transport failures.
    #[error("missing element at '{location}'")]
    MissingElement { location: String },

    /// A location expression could not be understood by the reader.
    #[error("invalid location '{location}': {message}")]
    Location { location: String, message: String },

    /// Navigating to a URL (or back) failed.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Textual parse into the field's target type failed.
    #[error("cannot parse '{value}' as {target}: {message}")]
    Parse {
        value: String,
        target: &'static str,
        message: String,
    },

    /// A user-supplied transform function failed.
    #[error("transform failed: {0}")]
    Transform(String),

    /// A user-supplied value mapper failed.
    #[error("value mapping failed: {0}")]
    Mapping(String),

    /// Nested entity construction exceeded the configured depth limit.
    #[error("entity nesting exceeds depth limit {limit}")]
    DepthExceeded { limit: usize },

    /// Engine invariant violated (a raw value reached a sink that cannot
    /// accept it). Descriptor validation is supposed to make this
    /// unreachable.
    #[error("internal error: {0}")]
    Internal(String),

    /// Context wrapper: the field and entity type a failure occurred in.
    /// Every error escaping a build is wrapped in at least one of these.
    #[error("scraping {entity}.{field}: {source}")]
    Field {
        entity: String,
        field: String,
        #[source]
        source: Box<ScrapeError>,
    },
}

impl ScrapeError {
    /// Wrap an error with the entity/field it occurred in.
    pub fn field(entity: impl Into<String>, field: impl Into<String>, source: ScrapeError) -> Self {
        ScrapeError::Field {
            entity: entity.into(),
            field: field.into(),
            source: Box::new(source),
        }
    }

    /// Returns true if the underlying failure is a definition error,
    /// looking through any field-context wrappers.
    pub fn is_definition(&self) -> bool {
        match self {
            ScrapeError::Definition(_) => true,
            ScrapeError::Field { source, .. } => source.is_definition(),
            _ => false,
        }
    }

    /// Strip the field-context wrappers and return the underlying failure.
    pub fn root_cause(&self) -> &ScrapeError {
        match self {
            ScrapeError::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The innermost `(entity, field)` pair a failure was recorded against,
    /// if any. For nested entity failures this names the deepest field.
    pub fn offending_field(&self) -> Option<(&str, &str)> {
        match self {
            ScrapeError::Field {
                entity,
                field,
                source,
            } => source
                .offending_field()
                .or(Some((entity.as_str(), field.as_str()))),
            _ => None,
        }
    }
}
