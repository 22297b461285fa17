//! Transformers: map a raw string (or each element of a raw list) into a
//! transformed string before conversion.

use std::sync::Arc;

use regex::Regex;

use crate::error::ScrapeError;
use crate::extract::RawValue;
use crate::traits::TransformFn;

/// String-to-string transformation applied between extraction and
/// conversion.
///
/// Textual raw values (including dereference URLs) are transformed;
/// element values pass through untouched. `ForEach` marks element-wise
/// application over list values and is what collection fields wrap their
/// transformer in.
pub enum Transformer {
    /// Extract one capture group; if the pattern does not match, the input
    /// is returned unchanged rather than dropped.
    RegexGroup { pattern: Regex, group: usize },
    /// A user-supplied transform with its declared parameters.
    Function {
        func: Arc<dyn TransformFn>,
        params: Vec<String>,
    },
    /// Left-to-right composition: each stage feeds the next.
    Chain(Vec<Transformer>),
    /// Apply the inner transformer to each element of a list value.
    ForEach(Box<Transformer>),
}

impl Transformer {
    pub fn apply(&self, raw: RawValue) -> Result<RawValue, ScrapeError> {
        match raw {
            RawValue::Text(s) => self.transform_str(&s).map(RawValue::Text),
            // Preserve url-ness: a transformed dereference target is still
            // a dereference target.
            RawValue::Url(s) => self.transform_str(&s).map(RawValue::Url),
            RawValue::TextList(list) => self.transform_list(list).map(RawValue::TextList),
            RawValue::UrlList(list) => self.transform_list(list).map(RawValue::UrlList),
            element => Ok(element),
        }
    }

    fn transform_list(&self, list: Vec<String>) -> Result<Vec<String>, ScrapeError> {
        let inner: &Transformer = match self {
            Transformer::ForEach(inner) => inner,
            other => other,
        };
        list.iter().map(|s| inner.transform_str(s)).collect()
    }

    fn transform_str(&self, value: &str) -> Result<String, ScrapeError> {
        match self {
            Transformer::RegexGroup { pattern, group } => match pattern.captures(value) {
                Some(caps) => Ok(caps
                    .get(*group)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| value.to_string())),
                None => Ok(value.to_string()),
            },
            Transformer::Function { func, params } => func.apply(value, params),
            Transformer::Chain(stages) => stages
                .iter()
                .try_fold(value.to_string(), |acc, stage| stage.transform_str(&acc)),
            Transformer::ForEach(inner) => inner.transform_str(value),
        }
    }
}

/// Derive the transformer for a field from its descriptor combination.
///
/// Precedence: capture + function compose into a chain (capture first),
/// either alone is used as-is, neither means no transformer. Collection
/// fields wrap the result for element-wise application.
pub(crate) fn select_transformer(
    capture: Option<(Regex, usize)>,
    func: Option<(Arc<dyn TransformFn>, Vec<String>)>,
    per_element: bool,
) -> Option<Transformer> {
    let base = match (capture, func) {
        (Some((pattern, group)), Some((func, params))) => Some(Transformer::Chain(vec![
            Transformer::RegexGroup { pattern, group },
            Transformer::Function { func, params },
        ])),
        (Some((pattern, group)), None) => Some(Transformer::RegexGroup { pattern, group }),
        (None, Some((func, params))) => Some(Transformer::Function { func, params }),
        (None, None) => None,
    };
    base.map(|t| {
        if per_element {
            Transformer::ForEach(Box::new(t))
        } else {
            t
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(value: &str, _params: &[String]) -> Result<String, ScrapeError> {
        Ok(value.to_uppercase())
    }

    fn regex(pattern: &str) -> (Regex, usize) {
        (Regex::new(pattern).unwrap(), 1)
    }

    fn func() -> (Arc<dyn TransformFn>, Vec<String>) {
        (Arc::new(upper), vec![])
    }

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    fn unwrap_text(raw: RawValue) -> String {
        match raw {
            RawValue::Text(s) => s,
            other => panic!("expected text, got {}", other.kind()),
        }
    }

    // The selection table: {function?, capture?} x {scalar, collection}.

    #[test]
    fn test_select_neither_is_none() {
        assert!(select_transformer(None, None, false).is_none());
        assert!(select_transformer(None, None, true).is_none());
    }

    #[test]
    fn test_select_capture_only() {
        let t = select_transformer(Some(regex("(a)")), None, false).unwrap();
        assert!(matches!(t, Transformer::RegexGroup { .. }));
    }

    #[test]
    fn test_select_function_only() {
        let t = select_transformer(None, Some(func()), false).unwrap();
        assert!(matches!(t, Transformer::Function { .. }));
    }

    #[test]
    fn test_select_both_chains_capture_first() {
        let t = select_transformer(Some(regex(r"(\w+)")), Some(func()), false).unwrap();
        let Transformer::Chain(stages) = &t else {
            panic!("expected chain");
        };
        assert_eq!(stages.len(), 2);
        assert!(matches!(stages[0], Transformer::RegexGroup { .. }));
        assert!(matches!(stages[1], Transformer::Function { .. }));
        // "String Data" -> capture "String" -> upper "STRING"
        assert_eq!(unwrap_text(t.apply(text("String Data")).unwrap()), "STRING");
    }

    #[test]
    fn test_select_collection_wraps_for_each() {
        let t = select_transformer(Some(regex("(a)")), None, true).unwrap();
        let Transformer::ForEach(inner) = &t else {
            panic!("expected for-each");
        };
        assert!(matches!(**inner, Transformer::RegexGroup { .. }));

        let t = select_transformer(Some(regex(r"(\w+)")), Some(func()), true).unwrap();
        let Transformer::ForEach(inner) = &t else {
            panic!("expected for-each");
        };
        assert!(matches!(**inner, Transformer::Chain(_)));
    }

    #[test]
    fn test_regex_group_extracts_capture() {
        let t = Transformer::RegexGroup {
            pattern: Regex::new(r"\$([0-9.]+)").unwrap(),
            group: 1,
        };
        assert_eq!(unwrap_text(t.apply(text("price: $12.50")).unwrap()), "12.50");
    }

    #[test]
    fn test_regex_group_no_match_passes_through() {
        let t = Transformer::RegexGroup {
            pattern: Regex::new(r"\$([0-9.]+)").unwrap(),
            group: 1,
        };
        assert_eq!(
            unwrap_text(t.apply(text("call for price")).unwrap()),
            "call for price"
        );
    }

    #[test]
    fn test_function_receives_params() {
        fn suffix(value: &str, params: &[String]) -> Result<String, ScrapeError> {
            Ok(format!("{value}{}", params.join("")))
        }
        let t = Transformer::Function {
            func: Arc::new(suffix),
            params: vec!["!".to_string()],
        };
        assert_eq!(unwrap_text(t.apply(text("hi")).unwrap()), "hi!");
    }

    #[test]
    fn test_chain_runs_left_to_right() {
        fn reverse(value: &str, _params: &[String]) -> Result<String, ScrapeError> {
            Ok(value.chars().rev().collect())
        }
        let t = Transformer::Chain(vec![
            Transformer::Function {
                func: Arc::new(upper),
                params: vec![],
            },
            Transformer::Function {
                func: Arc::new(reverse),
                params: vec![],
            },
        ]);
        assert_eq!(unwrap_text(t.apply(text("abc")).unwrap()), "CBA");
    }

    #[test]
    fn test_for_each_transforms_every_element() {
        let t = Transformer::ForEach(Box::new(Transformer::Function {
            func: Arc::new(upper),
            params: vec![],
        }));
        let raw = RawValue::TextList(vec!["a".into(), "b".into()]);
        match t.apply(raw).unwrap() {
            RawValue::TextList(v) => assert_eq!(v, vec!["A", "B"]),
            other => panic!("expected text list, got {}", other.kind()),
        }
    }

    #[test]
    fn test_url_values_stay_urls() {
        let t = Transformer::Function {
            func: Arc::new(upper),
            params: vec![],
        };
        match t.apply(RawValue::Url("https://x.test/a".into())).unwrap() {
            RawValue::Url(u) => assert_eq!(u, "HTTPS://X.TEST/A"),
            other => panic!("expected url, got {}", other.kind()),
        }
    }
}
