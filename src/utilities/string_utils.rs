//! String helpers shared by the validators and emitters.
//!
//! Key derivation, Python-style casing transforms, and the `{placeholder}`
//! scanner used to discover crew input variables.

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").unwrap());

/// Derive the YAML / source identifier for a role or task name.
///
/// Lowercases the input and replaces every space with an underscore, so
/// `"Senior Researcher"` becomes `senior_researcher`. No other characters are
/// touched.
pub fn normalize_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Title-case every word, where a word starts after any non-alphabetic character.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out
}

/// Class name for a snake_case project or tool name: `research_crew` → `ResearchCrew`.
pub fn class_name(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

/// Human readable title for a project name: `research_crew` → `Research Crew`.
pub fn display_title(name: &str) -> String {
    title_case(&name.replace('_', " "))
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Render `value` as a single-quoted Python string literal.
pub fn py_quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Collect `{name}` placeholders from `text` in order of appearance.
///
/// The scan tracks brace depth in a single pass. A span is accepted only if
/// it contains no nested braces and its content is an identifier (letters,
/// digits, `_`, `-`, not starting with a digit). Nested, unterminated and
/// non-identifier spans are skipped.
pub fn scan_placeholders(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut nested = false;

    for (i, c) in text.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    start = i + c.len_utf8();
                    nested = false;
                } else {
                    nested = true;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let span = &text[start..i];
                    if !nested && PLACEHOLDER_NAME.is_match(span) {
                        names.push(span.to_string());
                    } else {
                        log::debug!("skipping malformed placeholder span {{{}}}", span);
                    }
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        log::debug!("skipping unterminated placeholder starting at byte {}", start);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Senior Researcher"), "senior_researcher");
        assert_eq!(normalize_key("research_task"), "research_task");
        assert_eq!(normalize_key("Data  Analyst"), "data__analyst");
    }

    #[test]
    fn test_class_name() {
        assert_eq!(class_name("test_crew_1_4_1"), "TestCrew141");
        assert_eq!(class_name("research"), "Research");
        assert_eq!(class_name("mY_proJect"), "MyProject");
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("market_research_crew"), "Market Research Crew");
        assert_eq!(display_title("crew2go"), "Crew2Go");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("OPENAI"), "Openai");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_py_quote_escapes() {
        assert_eq!(py_quote("report.md"), "'report.md'");
        assert_eq!(py_quote("it's"), "'it\\'s'");
    }

    #[test]
    fn test_scan_placeholders_simple() {
        let names = scan_placeholders("Research {topic} for {audience} in {year}");
        assert_eq!(names, vec!["topic", "audience", "year"]);
    }

    #[test]
    fn test_scan_placeholders_skips_nested() {
        let names = scan_placeholders("Use {{escaped}} and {outer {inner}} then {ok}");
        assert_eq!(names, vec!["ok"]);
    }

    #[test]
    fn test_scan_placeholders_skips_malformed() {
        assert!(scan_placeholders("JSON like {\"key\": 1}").is_empty());
        assert!(scan_placeholders("empty {} and spaced { topic }").is_empty());
        assert!(scan_placeholders("unterminated {topic").is_empty());
        assert_eq!(scan_placeholders("stray } then {topic}"), vec!["topic"]);
    }

    #[test]
    fn test_truncate_chars_unicode() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
    }
}
