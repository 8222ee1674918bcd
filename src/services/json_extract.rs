use serde_json::Value;

use crate::errors::{AppError, AppResult};

/// Pulls the first JSON value out of free-form model output.
///
/// Candidates are balanced `[...]`/`{...}` spans found left to right; brackets
/// inside string literals are ignored. The first candidate that parses wins.
/// With no candidate at all the raw text is returned in `JsonNotFound`; if
/// every candidate fails to parse, the first one is returned in `MalformedJson`.
pub fn extract_json(text: &str) -> AppResult<Value> {
    let mut first_failure: Option<(&str, serde_json::Error)> = None;

    for candidate in balanced_spans(text) {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => return Ok(value),
            Err(err) => {
                log::warn!("Discarding unparseable JSON candidate: {}", err);
                if first_failure.is_none() {
                    first_failure = Some((candidate, err));
                }
            }
        }
    }

    match first_failure {
        Some((extracted, err)) => Err(AppError::MalformedJson {
            extracted: extracted.to_string(),
            reason: err.to_string(),
        }),
        None => Err(AppError::JsonNotFound {
            raw: text.to_string(),
        }),
    }
}

/// Every top-level balanced bracket span of `text`, left to right.
///
/// Scanning resumes after each span, so the inside of a span that fails to
/// parse is never offered as a candidate of its own. A bracket that is still
/// open at the end of the text ends the scan.
pub fn balanced_spans(text: &str) -> impl Iterator<Item = &str> {
    let bytes = text.as_bytes();
    let mut next = 0;

    std::iter::from_fn(move || {
        while next < bytes.len() {
            let start = next;
            if bytes[start] != b'[' && bytes[start] != b'{' {
                next += 1;
                continue;
            }
            match scan_span(&bytes[start..]) {
                Span::Closed(len) => {
                    next = start + len;
                    return Some(&text[start..start + len]);
                }
                Span::Mismatched => next = start + 1,
                Span::Unclosed => next = bytes.len(),
            }
        }
        None
    })
}

enum Span {
    Closed(usize),
    Mismatched,
    Unclosed,
}

/// Classifies the span opening at `bytes[0]`.
fn scan_span(bytes: &[u8]) -> Span {
    let mut expected_closers: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' => expected_closers.push(b']'),
            b'{' => expected_closers.push(b'}'),
            b']' | b'}' => {
                if expected_closers.pop() != Some(byte) {
                    return Span::Mismatched;
                }
                if expected_closers.is_empty() {
                    return Span::Closed(i + 1);
                }
            }
            _ => {}
        }
    }

    Span::Unclosed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const QUIZ: &str = r#"[{"question":"Q","choices":["a","b","c","d"],"correct_answer":1}]"#;

    #[test]
    fn extracts_bare_array() {
        let value = extract_json(QUIZ).expect("should extract");
        assert_eq!(value[0]["correct_answer"], 1);
    }

    #[test]
    fn prose_around_the_array_is_ignored() {
        let noisy = format!("Sure! Here is your quiz:\n\n{}\n\nGood luck!", QUIZ);

        assert_eq!(
            extract_json(&noisy).expect("should extract"),
            extract_json(QUIZ).expect("should extract")
        );
    }

    #[test]
    fn nested_arrays_are_not_truncated() {
        let text = r#"result: {"a": [[1, 2], [3]], "b": {"c": "]"}} trailing ] noise"#;

        let value = extract_json(text).expect("should extract");
        assert_eq!(value, json!({ "a": [[1, 2], [3]], "b": { "c": "]" } }));
    }

    #[test]
    fn brackets_inside_strings_and_escapes_are_ignored() {
        let text = r#"[{"question":"Which is \"[x]\"?","choices":["{","}","[","]"],"correct_answer":0}]"#;

        let value = extract_json(text).expect("should extract");
        assert_eq!(value[0]["choices"][1], "}");
    }

    #[test]
    fn no_brackets_reports_raw_text_unmodified() {
        let raw = "I cannot produce a quiz about that topic.";

        match extract_json(raw) {
            Err(AppError::JsonNotFound { raw: returned }) => assert_eq!(returned, raw),
            other => panic!("expected JsonNotFound, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_span_reports_the_extracted_text() {
        let raw = "Here: [{question: 'Q'}] done";

        match extract_json(raw) {
            Err(AppError::MalformedJson { extracted, .. }) => {
                assert_eq!(extracted, "[{question: 'Q'}]")
            }
            other => panic!("expected MalformedJson, got {:?}", other),
        }
    }

    #[test]
    fn later_valid_candidate_wins_over_earlier_invalid_one() {
        let text = r#"Use {placeholders} like this: [1, 2]"#;

        assert_eq!(extract_json(text).expect("should extract"), json!([1, 2]));
    }

    #[test]
    fn invalid_array_is_reported_whole_instead_of_its_first_element() {
        let text = r#"[{"question":"Q1","choices":["a","b","c","d"],"correct_answer":1},{"question":"Q2","choices":["a","b","c","d"],"correct_answer":2},]"#;

        match extract_json(text) {
            Err(AppError::MalformedJson { extracted, .. }) => assert_eq!(extracted, text),
            other => panic!("expected MalformedJson, got {:?}", other),
        }
    }

    #[test]
    fn spans_inside_a_closed_span_are_skipped() {
        let spans: Vec<&str> = balanced_spans(r#"[{"a": 1}, {"b": 2},] then {"c": 3}"#).collect();

        assert_eq!(spans, vec![r#"[{"a": 1}, {"b": 2},]"#, r#"{"c": 3}"#]);
    }

    #[test]
    fn mismatched_closer_falls_back_to_inner_spans() {
        let value = extract_json(r#"[ {"a": 1} }"#).expect("should extract");
        assert_eq!(value, json!({ "a": 1 }));
    }

    #[test]
    fn unclosed_bracket_ends_the_scan() {
        let text = format!("{}{}", "[".repeat(10_000), r#" {"a": 1"#);

        assert_eq!(balanced_spans(&text).count(), 0);
        assert!(matches!(extract_json(&text), Err(AppError::JsonNotFound { .. })));
    }

    #[test]
    fn unclosed_bracket_is_not_a_candidate() {
        assert_eq!(balanced_spans("[1, 2").count(), 0);
        assert_eq!(
            balanced_spans("x [1] y {\"a\": 2}").collect::<Vec<_>>(),
            vec!["[1]", "{\"a\": 2}"]
        );
    }
}
