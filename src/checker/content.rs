use std::sync::LazyLock;

use indexmap::IndexSet;
use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use crate::config::{ContentMatcher, ContentRule, RuleSpec};
use crate::fetch::{FetchError, FileContent, Fetcher};

use super::{Category, Evaluator, Verdict};

/// Maximum characters of actual content quoted in a diagnostic.
pub const EXCERPT_CHARS: usize = 200;

/// Bytes of context shown before the first difference of an exact match.
const DIFF_CONTEXT_BYTES: usize = 40;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("Invalid regex"));

/// Fetches files and matches their text against content rules.
///
/// Each distinct `(path, ref)` is fetched once, even if several rules target it.
pub struct ContentEvaluator<'a> {
    fetcher: &'a dyn Fetcher,
}

impl<'a> ContentEvaluator<'a> {
    #[must_use]
    pub const fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self { fetcher }
    }
}

impl Evaluator for ContentEvaluator<'_> {
    fn category(&self) -> Category {
        Category::Content
    }

    fn evaluate(&self, spec: &RuleSpec) -> Vec<Verdict> {
        let keys: IndexSet<(&str, Option<&str>)> = spec
            .content
            .iter()
            .map(|rule| (rule.path.as_str(), rule.git_ref.as_deref()))
            .collect();

        let fetched: Vec<Result<FileContent, FetchError>> = keys
            .iter()
            .collect::<Vec<_>>()
            .par_iter()
            .map(|(path, git_ref)| self.fetcher.get_file_content(path, *git_ref))
            .collect();
        debug!(files = fetched.len(), rules = spec.content.len(), "content fetched");

        spec.content
            .iter()
            .map(|rule| {
                let key = (rule.path.as_str(), rule.git_ref.as_deref());
                keys.get_index_of(&key).map_or_else(
                    || Verdict::error(&rule.id, Category::Content, "content was not fetched"),
                    |index| evaluate_content(rule, &fetched[index]),
                )
            })
            .collect()
    }
}

/// Verdict for one rule given the fetch result for its file.
///
/// Pure: the same input always yields the same verdict.
#[must_use]
pub fn evaluate_content(rule: &ContentRule, fetched: &Result<FileContent, FetchError>) -> Verdict {
    let path = &rule.path;
    let bytes = match fetched {
        Ok(FileContent::Present(bytes)) => bytes,
        Ok(FileContent::Missing) => {
            return Verdict::error(
                &rule.id,
                Category::Content,
                format!("cannot check content: file not found: {path}"),
            );
        }
        Err(e) => {
            return Verdict::error(
                &rule.id,
                Category::Content,
                format!("cannot check content of {path}: {e}"),
            );
        }
    };

    match std::str::from_utf8(bytes) {
        Ok(text) => match_text(rule, text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(e) => Verdict::error(
            &rule.id,
            Category::Content,
            format!(
                "cannot check content of {path}: not valid UTF-8 (invalid byte at offset {})",
                e.valid_up_to()
            ),
        ),
    }
}

fn match_text(rule: &ContentRule, text: &str) -> Verdict {
    let path = &rule.path;
    let kind = rule.matcher.kind();
    let failed = |what: String| {
        Verdict::fail(
            &rule.id,
            Category::Content,
            format!("{kind} check failed for {path}: {what}"),
        )
    };

    match &rule.matcher {
        ContentMatcher::Exact(expected) => {
            let actual = normalize(text);
            let expected = normalize(expected);
            if actual == expected {
                return Verdict::pass(
                    &rule.id,
                    Category::Content,
                    format!("{path} matches exactly"),
                );
            }
            let diff = first_difference(&expected, &actual);
            let start = diff.offset.saturating_sub(DIFF_CONTEXT_BYTES);
            failed(format!(
                "content differs at line {}, column {}",
                diff.line, diff.column
            ))
            .with_evidence(excerpt_from(&expected, start), excerpt_from(&actual, start))
        }
        ContentMatcher::Contains(needle) => {
            if text.contains(needle.as_str()) {
                Verdict::pass(&rule.id, Category::Content, format!("{path} contains {needle:?}"))
            } else {
                failed(format!("substring {needle:?} not found"))
                    .with_evidence(needle.clone(), excerpt(text))
            }
        }
        ContentMatcher::Pattern(re) => match re.find(text) {
            Some(m) => Verdict::pass(
                &rule.id,
                Category::Content,
                format!(
                    "{path} matches /{}/ at line {}",
                    re.as_str(),
                    line_of(text, m.start())
                ),
            ),
            None => failed(format!("pattern /{}/ has no match", re.as_str()))
                .with_evidence(re.as_str(), excerpt(text)),
        },
        ContentMatcher::Stat { target, expected } => {
            let lines: Vec<&str> = text.lines().filter(|l| l.contains(target.as_str())).collect();
            if lines.iter().any(|l| first_number(l) == Some(expected.as_str())) {
                return Verdict::pass(
                    &rule.id,
                    Category::Content,
                    format!("{path}: {target} = {expected}"),
                );
            }
            if lines.is_empty() {
                failed(format!("no line mentions {target:?}"))
                    .with_evidence(format!("{target}: {expected}"), excerpt(text))
            } else {
                failed(format!("{target} is not {expected}"))
                    .with_evidence(format!("{target}: {expected}"), excerpt(&lines.join("\n")))
            }
        }
    }
}

/// Strip trailing whitespace from every line and trailing blank lines.
fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

fn first_number(line: &str) -> Option<&str> {
    NUMBER.find(line).map(|m| m.as_str())
}

fn line_of(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].matches('\n').count() + 1
}

struct Difference {
    /// Byte offset of the first differing char. Identical in both strings,
    /// since everything before it is equal.
    offset: usize,
    line: usize,
    column: usize,
}

fn first_difference(expected: &str, actual: &str) -> Difference {
    let mut line = 1;
    let mut column = 1;
    let mut expected_chars = expected.chars();

    for (offset, ch) in actual.char_indices() {
        if expected_chars.next() != Some(ch) {
            return Difference {
                offset,
                line,
                column,
            };
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    Difference {
        offset: actual.len(),
        line,
        column,
    }
}

/// At most [`EXCERPT_CHARS`] characters from the start of `text`.
#[must_use]
pub fn excerpt(text: &str) -> String {
    excerpt_from(text, 0)
}

/// At most [`EXCERPT_CHARS`] characters starting at (or just before) `byte_offset`.
/// Elided text on either side is marked with `…`.
fn excerpt_from(text: &str, byte_offset: usize) -> String {
    let start = (0..=byte_offset.min(text.len()))
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let tail = &text[start..];

    let mut out = String::new();
    if start > 0 {
        out.push('…');
    }
    out.extend(tail.chars().take(EXCERPT_CHARS));
    if tail.chars().nth(EXCERPT_CHARS).is_some() {
        out.push('…');
    }
    out
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;
