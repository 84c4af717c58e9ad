//! `{{name}}` variable substitution.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("variable token pattern is valid")
    })
}

/// Replace every `{{ name }}` whose name is in `vars`; unknown names are left
/// exactly as written.
pub fn substitute(text: &str, vars: &BTreeMap<String, String>) -> String {
    if vars.is_empty() || !text.contains("{{") {
        return text.to_string();
    }
    token_pattern()
        .replace_all(text, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names referenced by `{{ name }}` tokens in `text`, in order of appearance.
pub fn referenced_variables(text: &str) -> Vec<String> {
    token_pattern()
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_replaces_known_tokens() {
        assert_eq!(
            substitute("Bearer {{token}}", &vars(&[("token", "abc123")])),
            "Bearer abc123"
        );
    }

    #[test]
    fn test_empty_mapping_leaves_text_alone() {
        assert_eq!(substitute("Bearer {{token}}", &vars(&[])), "Bearer {{token}}");
    }

    #[test]
    fn test_tolerates_inner_whitespace_and_repeats() {
        let v = vars(&[("host", "api.internal"), ("port", "443")]);
        assert_eq!(
            substitute("{{ host }}:{{port}} / {{host}}", &v),
            "api.internal:443 / api.internal"
        );
    }

    #[test]
    fn test_unknown_tokens_are_untouched() {
        let v = vars(&[("a", "1")]);
        assert_eq!(substitute("{{a}}-{{ b }}", &v), "1-{{ b }}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let v = vars(&[("a", "{{b}}"), ("b", "x")]);
        assert_eq!(substitute("{{a}}", &v), "{{b}}");
    }

    #[test]
    fn test_replacement_is_literal() {
        let v = vars(&[("price", "$1")]);
        assert_eq!(substitute("cost {{price}}", &v), "cost $1");
    }

    #[test]
    fn test_lists_referenced_names() {
        assert_eq!(
            referenced_variables("{{ a }} and {{b.c}} but not {b}"),
            vec!["a", "b.c"]
        );
    }
}
