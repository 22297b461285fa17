//! The declarative field descriptor model: per-type metadata describing how
//! each field is extracted, transformed, converted, and assigned.
//!
//! Descriptors are declared once per entity type with the fluent builder,
//! validated eagerly, and cached for the process lifetime (see
//! [`crate::registry`]). After construction they are immutable and safe to
//! share across concurrent scrape invocations.

use std::sync::Arc;

use regex::Regex;

use crate::condition::{Condition, Match};
use crate::error::{DefinitionError, ScrapeError};
use crate::extract::{Extractor, RawValue};
use crate::scrape::{ScrapeContext, scrape_nested};
use crate::traits::{Entity, FromScraped, TransformFn, ValueMapper, ValueReader};
use crate::transform::{Transformer, select_transformer};

/// Ordered field descriptors for one entity type. Immutable once built.
pub struct TypeDescriptor<E> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<E>>,
}

impl<E: 'static> TypeDescriptor<E> {
    pub fn builder(type_name: &'static str) -> TypeDescriptorBuilder<E> {
        TypeDescriptorBuilder {
            type_name,
            fields: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<E> std::fmt::Debug for TypeDescriptor<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field(
                "fields",
                &self.fields.iter().map(|fd| fd.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<E> TypeDescriptor<E> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor<E>] {
        &self.fields
    }
}

/// A (condition, extractor) pair. A field may declare several; they are
/// evaluated in declaration order and the first whose condition holds wins.
pub struct Candidate {
    pub(crate) condition: Condition,
    pub(crate) extractor: Extractor,
}

impl Candidate {
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }
}

/// Conversion + assignment into the entity, type-erased so descriptors for
/// different field types live in one list. Built once per field.
pub(crate) type SinkFn<E> = Box<
    dyn Fn(&mut E, RawValue, &mut dyn ValueReader, &ScrapeContext) -> Result<(), ScrapeError>
        + Send
        + Sync,
>;

/// Exactly one of: a constant that bypasses extraction, or a candidate
/// list with its transformer and sink. The builder enforces the
/// either-or at descriptor build time.
pub(crate) enum FieldKind<E> {
    Constant {
        assign: Box<dyn Fn(&mut E) + Send + Sync>,
    },
    Scraped {
        candidates: Vec<Candidate>,
        transformer: Option<Transformer>,
        sink: SinkFn<E>,
    },
}

/// How one field of an entity is populated.
pub struct FieldDescriptor<E> {
    name: &'static str,
    pub(crate) kind: FieldKind<E>,
}

impl<E> FieldDescriptor<E> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, FieldKind::Constant { .. })
    }

    pub fn candidates(&self) -> &[Candidate] {
        match &self.kind {
            FieldKind::Scraped { candidates, .. } => candidates,
            FieldKind::Constant { .. } => &[],
        }
    }

    pub fn transformer(&self) -> Option<&Transformer> {
        match &self.kind {
            FieldKind::Scraped { transformer, .. } => transformer.as_ref(),
            FieldKind::Constant { .. } => None,
        }
    }
}

pub struct TypeDescriptorBuilder<E> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<E>>,
    errors: Vec<DefinitionError>,
}

impl<E: 'static> TypeDescriptorBuilder<E> {
    /// Start describing a scalar field. `access` is a plain accessor to
    /// the field being populated, e.g. `|e: &mut Listing| &mut e.title`.
    pub fn field<T: 'static>(
        self,
        name: &'static str,
        access: fn(&mut E) -> &mut T,
    ) -> FieldBuilder<E, T> {
        FieldBuilder {
            owner: self,
            name,
            access,
            candidates: Vec::new(),
            capture: None,
            func: None,
        }
    }

    /// Start describing a `Vec<T>` field populated element-wise.
    pub fn collection<T: 'static>(
        self,
        name: &'static str,
        access: fn(&mut E) -> &mut Vec<T>,
    ) -> CollectionBuilder<E, T> {
        CollectionBuilder {
            owner: self,
            name,
            access,
            candidates: Vec::new(),
            capture: None,
            func: None,
        }
    }

    /// Validate and freeze the descriptor. The first inconsistency found
    /// is returned; a failed build is never cached.
    pub fn build(mut self) -> Result<TypeDescriptor<E>, DefinitionError> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                self.errors.insert(
                    0,
                    DefinitionError::new(self.type_name, field.name, "field declared twice"),
                );
                break;
            }
        }
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(TypeDescriptor {
                type_name: self.type_name,
                fields: self.fields,
            }),
        }
    }
}

/// One extractor candidate as written, before conditions are compiled.
struct CandidateSpec {
    condition: Option<Match>,
    extractor: Extractor,
}

/// Builder for a scalar field.
pub struct FieldBuilder<E, T> {
    owner: TypeDescriptorBuilder<E>,
    name: &'static str,
    access: fn(&mut E) -> &mut T,
    candidates: Vec<CandidateSpec>,
    capture: Option<(String, usize)>,
    func: Option<(Arc<dyn TransformFn>, Vec<String>)>,
}

impl<E: 'static, T: 'static> FieldBuilder<E, T> {
    /// Unconditional extractor candidate (its condition always holds).
    pub fn extract(mut self, extractor: Extractor) -> Self {
        self.candidates.push(CandidateSpec {
            condition: None,
            extractor,
        });
        self
    }

    /// Conditional candidate: used only when `probe` matches, and only if
    /// no earlier candidate matched first.
    pub fn when(mut self, probe: Match, extractor: Extractor) -> Self {
        self.candidates.push(CandidateSpec {
            condition: Some(probe),
            extractor,
        });
        self
    }

    /// Keep capture group 1 of `pattern` from the raw string.
    pub fn capture(self, pattern: impl Into<String>) -> Self {
        self.capture_group(pattern, 1)
    }

    /// Keep the given capture group of `pattern` from the raw string.
    pub fn capture_group(mut self, pattern: impl Into<String>, group: usize) -> Self {
        self.capture = Some((pattern.into(), group));
        self
    }

    /// Apply a user transform function with the given parameters.
    pub fn transform(mut self, func: impl TransformFn + 'static, params: Vec<String>) -> Self {
        self.func = Some((Arc::new(func), params));
        self
    }

    /// The field is a literal: extraction is bypassed entirely and the
    /// reader is never consulted.
    pub fn constant(self, value: T) -> TypeDescriptorBuilder<E>
    where
        T: Clone + Send + Sync,
    {
        let mut owner = self.owner;
        if let Some(err) = constant_conflicts(
            owner.type_name,
            self.name,
            !self.candidates.is_empty(),
            self.capture.is_some() || self.func.is_some(),
        ) {
            owner.errors.push(err);
            return owner;
        }
        let access = self.access;
        owner.fields.push(FieldDescriptor {
            name: self.name,
            kind: FieldKind::Constant {
                assign: Box::new(move |e| *access(e) = value.clone()),
            },
        });
        owner
    }

    /// Convert with the standard textual parse for `T`.
    pub fn parsed(self) -> TypeDescriptorBuilder<E>
    where
        T: FromScraped,
    {
        let access = self.access;
        self.finish(
            scalar_text_source,
            "a scalar text field",
            Box::new(move |e, raw, _reader, _ctx| {
                let text = raw.into_text()?;
                *access(e) = T::from_scraped(&text)?;
                Ok(())
            }),
        )
    }

    /// Convert with a user-supplied mapper.
    pub fn mapped(self, mapper: impl ValueMapper<T> + 'static) -> TypeDescriptorBuilder<E> {
        let access = self.access;
        let mapper: Arc<dyn ValueMapper<T>> = Arc::new(mapper);
        self.finish(
            scalar_text_source,
            "a scalar text field",
            Box::new(move |e, raw, reader, _ctx| {
                let text = raw.into_text()?;
                *access(e) = mapper.map(&text, &*reader)?;
                Ok(())
            }),
        )
    }

    /// The field is itself an entity, built recursively from an element
    /// sub-tree or a dereferenced page.
    pub fn entity(self) -> TypeDescriptorBuilder<E>
    where
        T: Entity,
    {
        let access = self.access;
        self.finish(
            scalar_entity_source,
            "an entity field",
            Box::new(move |e, raw, reader, ctx| {
                match raw {
                    RawValue::Element(mut scoped) => {
                        *access(e) = scrape_nested::<T>(scoped.as_mut(), ctx)?;
                    }
                    RawValue::Url(url) => {
                        *access(e) = ctx.dereference(reader, &url, |sub, ctx| {
                            scrape_nested::<T>(sub, ctx)
                        })?;
                    }
                    other => {
                        return Err(ScrapeError::Internal(format!(
                            "entity field received {}",
                            other.kind()
                        )));
                    }
                }
                Ok(())
            }),
        )
    }

    fn finish(
        self,
        allowed: fn(&Extractor) -> bool,
        expectation: &'static str,
        sink: SinkFn<E>,
    ) -> TypeDescriptorBuilder<E> {
        let mut owner = self.owner;
        compile_field(
            &mut owner,
            self.name,
            self.candidates,
            self.capture,
            self.func,
            false,
            allowed,
            expectation,
            sink,
        );
        owner
    }
}

/// Builder for a `Vec<T>` field.
pub struct CollectionBuilder<E, T> {
    owner: TypeDescriptorBuilder<E>,
    name: &'static str,
    access: fn(&mut E) -> &mut Vec<T>,
    candidates: Vec<CandidateSpec>,
    capture: Option<(String, usize)>,
    func: Option<(Arc<dyn TransformFn>, Vec<String>)>,
}

impl<E: 'static, T: 'static> CollectionBuilder<E, T> {
    pub fn extract(mut self, extractor: Extractor) -> Self {
        self.candidates.push(CandidateSpec {
            condition: None,
            extractor,
        });
        self
    }

    pub fn when(mut self, probe: Match, extractor: Extractor) -> Self {
        self.candidates.push(CandidateSpec {
            condition: Some(probe),
            extractor,
        });
        self
    }

    pub fn capture(self, pattern: impl Into<String>) -> Self {
        self.capture_group(pattern, 1)
    }

    pub fn capture_group(mut self, pattern: impl Into<String>, group: usize) -> Self {
        self.capture = Some((pattern.into(), group));
        self
    }

    pub fn transform(mut self, func: impl TransformFn + 'static, params: Vec<String>) -> Self {
        self.func = Some((Arc::new(func), params));
        self
    }

    pub fn constant(self, value: Vec<T>) -> TypeDescriptorBuilder<E>
    where
        T: Clone + Send + Sync,
    {
        let mut owner = self.owner;
        if let Some(err) = constant_conflicts(
            owner.type_name,
            self.name,
            !self.candidates.is_empty(),
            self.capture.is_some() || self.func.is_some(),
        ) {
            owner.errors.push(err);
            return owner;
        }
        let access = self.access;
        owner.fields.push(FieldDescriptor {
            name: self.name,
            kind: FieldKind::Constant {
                assign: Box::new(move |e| *access(e) = value.clone()),
            },
        });
        owner
    }

    /// Parse every extracted string into a `T`, preserving source order.
    pub fn parsed(self) -> TypeDescriptorBuilder<E>
    where
        T: FromScraped,
    {
        let access = self.access;
        self.finish(
            list_text_source,
            "a collection of text values",
            Box::new(move |e, raw, _reader, _ctx| {
                let texts = raw.into_texts()?;
                let mut out = Vec::with_capacity(texts.len());
                for text in &texts {
                    out.push(T::from_scraped(text)?);
                }
                *access(e) = out;
                Ok(())
            }),
        )
    }

    /// Map every extracted string with a user-supplied mapper.
    pub fn mapped(self, mapper: impl ValueMapper<T> + 'static) -> TypeDescriptorBuilder<E> {
        let access = self.access;
        let mapper: Arc<dyn ValueMapper<T>> = Arc::new(mapper);
        self.finish(
            list_text_source,
            "a collection of text values",
            Box::new(move |e, raw, reader, _ctx| {
                let texts = raw.into_texts()?;
                let mut out = Vec::with_capacity(texts.len());
                for text in &texts {
                    out.push(mapper.map(text, &*reader)?);
                }
                *access(e) = out;
                Ok(())
            }),
        )
    }

    /// Build one entity per element or per dereferenced URL, in source
    /// order. URL cycles run strictly sequentially, never overlapping.
    pub fn entities(mut self) -> TypeDescriptorBuilder<E>
    where
        T: Entity,
    {
        // A from-url source on a collection field means one dereference
        // target per matched element.
        for spec in &mut self.candidates {
            if let Extractor::FromUrl {
                location,
                attribute,
            } = spec.extractor.clone()
            {
                spec.extractor = Extractor::FromUrlList {
                    location,
                    attribute,
                };
            }
        }
        let access = self.access;
        self.finish(
            list_entity_source,
            "a collection of entities",
            Box::new(move |e, raw, reader, ctx| {
                match raw {
                    RawValue::ElementList(scoped) => {
                        let mut out = Vec::with_capacity(scoped.len());
                        for mut sub in scoped {
                            out.push(scrape_nested::<T>(sub.as_mut(), ctx)?);
                        }
                        *access(e) = out;
                    }
                    RawValue::UrlList(urls) => {
                        let mut out = Vec::with_capacity(urls.len());
                        for url in &urls {
                            out.push(ctx.dereference(reader, url, |sub, ctx| {
                                scrape_nested::<T>(sub, ctx)
                            })?);
                        }
                        *access(e) = out;
                    }
                    other => {
                        return Err(ScrapeError::Internal(format!(
                            "entity collection received {}",
                            other.kind()
                        )));
                    }
                }
                Ok(())
            }),
        )
    }

    fn finish(
        self,
        allowed: fn(&Extractor) -> bool,
        expectation: &'static str,
        sink: SinkFn<E>,
    ) -> TypeDescriptorBuilder<E> {
        let mut owner = self.owner;
        compile_field(
            &mut owner,
            self.name,
            self.candidates,
            self.capture,
            self.func,
            true,
            allowed,
            expectation,
            sink,
        );
        owner
    }
}

fn scalar_text_source(x: &Extractor) -> bool {
    matches!(x, Extractor::Value { .. } | Extractor::CurrentUrl)
}

fn scalar_entity_source(x: &Extractor) -> bool {
    matches!(x, Extractor::Element { .. } | Extractor::FromUrl { .. })
}

fn list_text_source(x: &Extractor) -> bool {
    matches!(x, Extractor::ValueList { .. })
}

fn list_entity_source(x: &Extractor) -> bool {
    matches!(x, Extractor::ElementList { .. } | Extractor::FromUrlList { .. })
}

fn constant_conflicts(
    entity: &str,
    field: &str,
    has_candidates: bool,
    has_transform: bool,
) -> Option<DefinitionError> {
    if has_candidates {
        return Some(DefinitionError::new(
            entity,
            field,
            "field declares both a constant and extractor candidates",
        ));
    }
    if has_transform {
        return Some(DefinitionError::new(
            entity,
            field,
            "constant field cannot carry transformers",
        ));
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn compile_field<E: 'static>(
    owner: &mut TypeDescriptorBuilder<E>,
    name: &'static str,
    specs: Vec<CandidateSpec>,
    capture: Option<(String, usize)>,
    func: Option<(Arc<dyn TransformFn>, Vec<String>)>,
    per_element: bool,
    allowed: fn(&Extractor) -> bool,
    expectation: &'static str,
    sink: SinkFn<E>,
) {
    let entity = owner.type_name;
    if specs.is_empty() {
        owner.errors.push(DefinitionError::new(
            entity,
            name,
            "field declares no extractor candidates",
        ));
        return;
    }
    if let Some(bad) = specs.iter().find(|s| !allowed(&s.extractor)) {
        owner.errors.push(DefinitionError::new(
            entity,
            name,
            format!(
                "{} extractor cannot populate {expectation}",
                bad.extractor.name()
            ),
        ));
        return;
    }
    if (capture.is_some() || func.is_some()) && specs.iter().any(|s| s.extractor.is_element()) {
        owner.errors.push(DefinitionError::new(
            entity,
            name,
            "transformers cannot apply to element extractors",
        ));
        return;
    }

    let transformer = match compile_transformer(entity, name, capture, func, per_element) {
        Ok(t) => t,
        Err(e) => {
            owner.errors.push(e);
            return;
        }
    };

    let mut candidates = Vec::with_capacity(specs.len());
    for spec in specs {
        let condition = match spec.condition {
            None => Condition::Always,
            Some(probe) => match probe.compile(entity, name) {
                Ok(c) => c,
                Err(e) => {
                    owner.errors.push(e);
                    return;
                }
            },
        };
        candidates.push(Candidate {
            condition,
            extractor: spec.extractor,
        });
    }

    owner.fields.push(FieldDescriptor {
        name,
        kind: FieldKind::Scraped {
            candidates,
            transformer,
            sink,
        },
    });
}

fn compile_transformer(
    entity: &str,
    field: &str,
    capture: Option<(String, usize)>,
    func: Option<(Arc<dyn TransformFn>, Vec<String>)>,
    per_element: bool,
) -> Result<Option<Transformer>, DefinitionError> {
    let capture = match capture {
        Some((pattern, group)) => {
            let regex = Regex::new(&pattern).map_err(|e| {
                DefinitionError::new(
                    entity,
                    field,
                    format!("invalid capture pattern '{pattern}': {e}"),
                )
            })?;
            if group >= regex.captures_len() {
                return Err(DefinitionError::new(
                    entity,
                    field,
                    format!("capture group {group} out of range for pattern '{pattern}'"),
                ));
            }
            Some((regex, group))
        }
        None => None,
    };
    Ok(select_transformer(capture, func, per_element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::matches;
    use crate::extract::{element, elements, from_url, value, values};
    use crate::transform::Transformer;

    #[derive(Default)]
    struct Sample {
        name: String,
        count: u32,
        tags: Vec<String>,
    }

    #[derive(Default)]
    struct Inner {
        label: String,
    }

    impl Entity for Inner {
        fn descriptor() -> Result<TypeDescriptor<Self>, DefinitionError> {
            TypeDescriptor::builder("Inner")
                .field("label", |e: &mut Inner| &mut e.label)
                .extract(value(".label"))
                .parsed()
                .build()
        }
    }

    #[derive(Default)]
    struct Outer {
        inner: Inner,
    }

    fn upper(value: &str, _params: &[String]) -> Result<String, ScrapeError> {
        Ok(value.to_uppercase())
    }

    #[test]
    fn test_build_keeps_declaration_order() {
        let desc = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .extract(value(".name"))
            .parsed()
            .field("count", |e: &mut Sample| &mut e.count)
            .extract(value(".count"))
            .parsed()
            .collection("tags", |e: &mut Sample| &mut e.tags)
            .extract(values(".tag"))
            .parsed()
            .build()
            .unwrap();
        let names: Vec<_> = desc.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["name", "count", "tags"]);
        assert_eq!(desc.type_name(), "Sample");
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let err = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .extract(value(".a"))
            .parsed()
            .field("name", |e: &mut Sample| &mut e.name)
            .extract(value(".b"))
            .parsed()
            .build()
            .unwrap_err();
        assert!(err.reason.contains("declared twice"));
    }

    #[test]
    fn test_field_without_extractor_is_rejected() {
        let err = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .parsed()
            .build()
            .unwrap_err();
        assert!(err.reason.contains("no extractor"));
    }

    #[test]
    fn test_constant_with_candidates_is_rejected() {
        let err = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .extract(value(".name"))
            .constant("fixed".to_string())
            .build()
            .unwrap_err();
        assert!(err.reason.contains("both a constant and extractor"));
    }

    #[test]
    fn test_constant_with_transformer_is_rejected() {
        let err = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .capture("(a)")
            .constant("fixed".to_string())
            .build()
            .unwrap_err();
        assert!(err.reason.contains("constant field cannot carry"));
    }

    #[test]
    fn test_invalid_capture_pattern_is_rejected() {
        let err = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .extract(value(".name"))
            .capture("[broken")
            .parsed()
            .build()
            .unwrap_err();
        assert!(err.reason.contains("invalid capture pattern"));
        assert_eq!(err.entity, "Sample");
        assert_eq!(err.field, "name");
    }

    #[test]
    fn test_capture_group_out_of_range_is_rejected() {
        let err = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .extract(value(".name"))
            .capture_group(r"(\w+)", 2)
            .parsed()
            .build()
            .unwrap_err();
        assert!(err.reason.contains("out of range"));
    }

    #[test]
    fn test_list_extractor_on_scalar_field_is_rejected() {
        let err = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .extract(values(".name"))
            .parsed()
            .build()
            .unwrap_err();
        assert!(err.reason.contains("value-list extractor cannot populate"));
    }

    #[test]
    fn test_scalar_extractor_on_collection_is_rejected() {
        let err = TypeDescriptor::builder("Sample")
            .collection("tags", |e: &mut Sample| &mut e.tags)
            .extract(value(".tag"))
            .parsed()
            .build()
            .unwrap_err();
        assert!(err.reason.contains("value extractor cannot populate"));
    }

    #[test]
    fn test_from_url_requires_entity_terminal() {
        let err = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .extract(from_url("a.detail"))
            .parsed()
            .build()
            .unwrap_err();
        assert!(err.reason.contains("from-url extractor cannot populate"));
    }

    #[test]
    fn test_transformer_on_element_extractor_is_rejected() {
        let err = TypeDescriptor::builder("Outer")
            .field("inner", |e: &mut Outer| &mut e.inner)
            .extract(element(".card"))
            .transform(upper, vec![])
            .entity()
            .build()
            .unwrap_err();
        assert!(err.reason.contains("element extractors"));
    }

    #[test]
    fn test_bad_condition_pattern_names_the_field() {
        let err = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .when(matches(value(".probe"), "[oops"), value(".name"))
            .parsed()
            .build()
            .unwrap_err();
        assert_eq!(err.field, "name");
        assert!(err.reason.contains("invalid condition pattern"));
    }

    #[test]
    fn test_scalar_transformer_selection() {
        let desc = TypeDescriptor::builder("Sample")
            .field("name", |e: &mut Sample| &mut e.name)
            .extract(value(".name"))
            .capture(r"(\w+)")
            .transform(upper, vec![])
            .parsed()
            .build()
            .unwrap();
        assert!(matches!(
            desc.fields()[0].transformer(),
            Some(Transformer::Chain(_))
        ));
    }

    #[test]
    fn test_collection_transformer_is_per_element() {
        let desc = TypeDescriptor::builder("Sample")
            .collection("tags", |e: &mut Sample| &mut e.tags)
            .extract(values(".tag"))
            .capture(r"(\w+)")
            .parsed()
            .build()
            .unwrap();
        assert!(matches!(
            desc.fields()[0].transformer(),
            Some(Transformer::ForEach(_))
        ));
    }

    #[test]
    fn test_collection_from_url_becomes_list_form() {
        #[derive(Default)]
        struct Owner {
            items: Vec<Inner>,
        }
        let desc = TypeDescriptor::builder("Owner")
            .collection("items", |e: &mut Owner| &mut e.items)
            .extract(from_url("a.item"))
            .entities()
            .build()
            .unwrap();
        assert!(matches!(
            desc.fields()[0].candidates()[0].extractor(),
            Extractor::FromUrlList { .. }
        ));
    }

    #[test]
    fn test_entity_collection_accepts_elements() {
        #[derive(Default)]
        struct Owner {
            items: Vec<Inner>,
        }
        let desc = TypeDescriptor::builder("Owner")
            .collection("items", |e: &mut Owner| &mut e.items)
            .extract(elements(".card"))
            .entities()
            .build()
            .unwrap();
        assert_eq!(desc.fields().len(), 1);
        assert!(!desc.fields()[0].is_constant());
    }
}
