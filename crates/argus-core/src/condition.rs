//! Conditions: predicates that gate which extractor candidate applies.

use regex::Regex;

use crate::error::{DefinitionError, ScrapeError};
use crate::extract::{Extractor, RawValue, with_dereference};
use crate::traits::ValueReader;

/// Predicate over the current reader state.
///
/// `Matches` runs a probe extractor first and searches its string value
/// for the pattern (a find, not a full match). Probes that navigate
/// restore the session before the predicate returns.
#[derive(Debug)]
pub enum Condition {
    Always,
    Matches { probe: Box<Extractor>, pattern: Regex },
}

impl Condition {
    pub fn holds(&self, reader: &mut dyn ValueReader) -> Result<bool, ScrapeError> {
        match self {
            Condition::Always => Ok(true),
            Condition::Matches { probe, pattern } => {
                let raw = match probe.extract(reader) {
                    // A probe whose location is absent means "not this
                    // candidate", so presence probes work. Anything else
                    // is a real failure and propagates.
                    Err(ScrapeError::MissingElement { .. }) => return Ok(false),
                    Err(e) => return Err(e),
                    Ok(raw) => raw,
                };
                match raw {
                    RawValue::Text(s) => Ok(pattern.is_match(&s)),
                    // A list-valued probe matches if any element matches.
                    RawValue::TextList(list) | RawValue::UrlList(list) => {
                        Ok(list.iter().any(|s| pattern.is_match(s)))
                    }
                    // A from-url probe dereferences and matches against the
                    // target page's URL after redirects, restoring the
                    // session before returning.
                    RawValue::Url(u) => {
                        let target = with_dereference(reader, &u, |sub| sub.current_url())?;
                        Ok(pattern.is_match(&target))
                    }
                    other => Err(ScrapeError::Internal(format!(
                        "condition probe produced {}",
                        other.kind()
                    ))),
                }
            }
        }
    }
}

/// An uncompiled regex-match condition, as written in a descriptor.
/// The pattern is compiled (and the probe validated) at descriptor build.
pub struct Match {
    pub(crate) probe: Extractor,
    pub(crate) pattern: String,
}

/// Condition that holds when `probe`'s string value matches `pattern`.
pub fn matches(probe: Extractor, pattern: impl Into<String>) -> Match {
    Match {
        probe,
        pattern: pattern.into(),
    }
}

impl Match {
    pub(crate) fn compile(self, entity: &str, field: &str) -> Result<Condition, DefinitionError> {
        if self.probe.is_element() {
            return Err(DefinitionError::new(
                entity,
                field,
                format!(
                    "condition probe must extract text, not {} elements",
                    self.probe.name()
                ),
            ));
        }
        let pattern = Regex::new(&self.pattern).map_err(|e| {
            DefinitionError::new(
                entity,
                field,
                format!("invalid condition pattern '{}': {e}", self.pattern),
            )
        })?;
        Ok(Condition::Matches {
            probe: Box::new(self.probe),
            pattern,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{from_url_attr, value, values};
    use crate::testutil::{MockPage, MockReader, ReaderCall};

    fn compiled(m: Match) -> Condition {
        m.compile("Test", "field").unwrap()
    }

    #[test]
    fn test_always_ignores_reader() {
        let mut r = MockReader::single(MockPage::new());
        assert!(Condition::Always.holds(&mut r).unwrap());
        assert!(r.calls().is_empty());
    }

    #[test]
    fn test_matches_searches_probe_text() {
        let mut r = MockReader::single(MockPage::new().with_text(".badge", "On Sale Today"));
        let cond = compiled(matches(value(".badge"), "Sale"));
        assert!(cond.holds(&mut r).unwrap());

        let cond = compiled(matches(value(".badge"), "Sold Out"));
        assert!(!cond.holds(&mut r).unwrap());
    }

    #[test]
    fn test_missing_probe_means_false() {
        let mut r = MockReader::single(MockPage::new());
        let cond = compiled(matches(value(".absent"), ".*"));
        assert!(!cond.holds(&mut r).unwrap());
    }

    #[test]
    fn test_list_probe_matches_any_element() {
        let mut r =
            MockReader::single(MockPage::new().with_texts(".tag", ["used", "refurbished"]));
        let cond = compiled(matches(values(".tag"), "^refurb"));
        assert!(cond.holds(&mut r).unwrap());

        let cond = compiled(matches(values(".tag"), "^new$"));
        assert!(!cond.holds(&mut r).unwrap());
    }

    #[test]
    fn test_from_url_probe_navigates_and_restores() {
        let mut r = MockReader::with_pages(
            "https://shop.test/item",
            [
                (
                    "https://shop.test/item",
                    MockPage::new().with_attr("a.seller", "href", "https://shop.test/seller/9"),
                ),
                ("https://shop.test/seller/9", MockPage::new()),
            ],
        );
        let cond = compiled(matches(from_url_attr("a.seller", "href"), r"/seller/\d+$"));
        assert!(cond.holds(&mut r).unwrap());
        assert_eq!(r.current_page_url(), "https://shop.test/item");
        assert_eq!(
            r.navigations(),
            vec![
                ReaderCall::NavigateTo("https://shop.test/seller/9".into()),
                ReaderCall::NavigateBack,
            ]
        );
    }

    #[test]
    fn test_element_probe_is_a_definition_error() {
        let err = matches(crate::extract::element(".card"), ".*")
            .compile("Test", "field")
            .unwrap_err();
        assert!(err.reason.contains("probe must extract text"));
    }

    #[test]
    fn test_bad_pattern_is_a_definition_error() {
        let err = matches(value(".x"), "[unclosed")
            .compile("Test", "field")
            .unwrap_err();
        assert!(err.reason.contains("invalid condition pattern"));
    }
}
