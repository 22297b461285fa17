//! Entity construction: walks a type's field descriptors against a
//! value-reader and produces a fully populated instance.
//!
//! Evaluation within one build is strictly sequential — field order
//! matters because a dereferencing field must have returned to the entry
//! page before its siblings are evaluated. Independent builds with
//! independent readers may run on parallel threads.

use crate::config::ScrapeConfig;
use crate::descriptor::{Candidate, FieldDescriptor, FieldKind, TypeDescriptor};
use crate::error::ScrapeError;
use crate::extract::{Extractor, with_dereference};
use crate::registry;
use crate::traits::{Entity, ValueReader};

/// The scraping engine. Holds configuration only; descriptors come from
/// the process-wide registry, so construction is cheap.
pub struct Scraper {
    config: ScrapeConfig,
}

impl Scraper {
    pub fn new() -> Self {
        Self {
            config: ScrapeConfig::default(),
        }
    }

    pub fn with_config(config: ScrapeConfig) -> Self {
        Self { config }
    }

    /// Build a fully populated `E` from the reader's current page.
    ///
    /// Either returns a complete instance or fails with a single error
    /// identifying the offending field and type. Fields whose conditions
    /// all fail keep their zero value; that is not an error.
    pub fn scrape<E: Entity>(&self, reader: &mut dyn ValueReader) -> Result<E, ScrapeError> {
        let descriptor = registry::descriptor_of::<E>()?;
        let ctx = ScrapeContext {
            depth: 0,
            max_depth: self.config.max_depth,
        };
        build_with(&descriptor, reader, &ctx)
    }
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an `E` from the reader's current page with default configuration.
pub fn scrape_entity<E: Entity>(reader: &mut dyn ValueReader) -> Result<E, ScrapeError> {
    Scraper::new().scrape(reader)
}

/// Per-invocation state threaded through nested construction.
pub struct ScrapeContext {
    depth: usize,
    max_depth: usize,
}

impl ScrapeContext {
    fn descend(&self) -> Result<ScrapeContext, ScrapeError> {
        if self.depth + 1 > self.max_depth {
            return Err(ScrapeError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(ScrapeContext {
            depth: self.depth + 1,
            max_depth: self.max_depth,
        })
    }

    /// Run `f` against the dereferenced page, restoring the session after.
    pub(crate) fn dereference<R>(
        &self,
        reader: &mut dyn ValueReader,
        url: &str,
        f: impl FnOnce(&mut dyn ValueReader, &ScrapeContext) -> Result<R, ScrapeError>,
    ) -> Result<R, ScrapeError> {
        with_dereference(reader, url, |sub| f(sub, self))
    }
}

/// Recursive entry point used by entity sinks.
pub(crate) fn scrape_nested<E: Entity>(
    reader: &mut dyn ValueReader,
    ctx: &ScrapeContext,
) -> Result<E, ScrapeError> {
    let descriptor = registry::descriptor_of::<E>()?;
    let ctx = ctx.descend()?;
    build_with(&descriptor, reader, &ctx)
}

fn build_with<E: Entity>(
    descriptor: &TypeDescriptor<E>,
    reader: &mut dyn ValueReader,
    ctx: &ScrapeContext,
) -> Result<E, ScrapeError> {
    tracing::debug!(
        entity = descriptor.type_name(),
        depth = ctx.depth,
        "building entity"
    );
    let mut instance = E::default();
    for field in descriptor.fields() {
        evaluate_field(field, &mut instance, reader, ctx)
            .map_err(|e| ScrapeError::field(descriptor.type_name(), field.name(), e))?;
    }
    Ok(instance)
}

/// Evaluate one field: resolve which candidate applies, extract,
/// transform, convert, assign. Exactly one candidate's extractor runs; if
/// no condition holds, nothing runs and the zero value stays.
fn evaluate_field<E>(
    field: &FieldDescriptor<E>,
    instance: &mut E,
    reader: &mut dyn ValueReader,
    ctx: &ScrapeContext,
) -> Result<(), ScrapeError> {
    match &field.kind {
        FieldKind::Constant { assign } => {
            assign(instance);
            Ok(())
        }
        FieldKind::Scraped {
            candidates,
            transformer,
            sink,
        } => {
            let Some(extractor) = first_match(candidates, reader)? else {
                tracing::trace!(field = field.name(), "no candidate matched, keeping zero value");
                return Ok(());
            };
            let raw = extractor.extract(reader)?;
            let raw = match transformer {
                Some(t) => t.apply(raw)?,
                None => raw,
            };
            sink(instance, raw, reader, ctx)
        }
    }
}

/// First candidate whose condition holds, in declaration order. Scanning
/// stops at the first match; later conditions are not evaluated.
fn first_match<'a>(
    candidates: &'a [Candidate],
    reader: &mut dyn ValueReader,
) -> Result<Option<&'a Extractor>, ScrapeError> {
    for candidate in candidates {
        if candidate.condition().holds(reader)? {
            return Ok(Some(candidate.extractor()));
        }
    }
    Ok(None)
}
