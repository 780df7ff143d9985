//! # Fund Listing Parser
//!
//! The Eastmoney bulk listing is a JavaScript source fragment, not JSON:
//!
//! ```text
//! var r = [["000001","HXCZHH","华夏成长混合","混合型-灵活","HUAXIACHENGZHANGHUNHE"],...];
//! ```
//!
//! so it is tokenised by hand. `listing_body` strips the outer array,
//! `extract_arrays` cuts the record literals out of it and `parse_record`
//! splits one record into its quoted fields.

use thiserror::Error;

/// Number of fields in one listing record.
pub const RECORD_ARITY: usize = 5;

/// A listing record that could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record did not split into exactly `expected` fields.
    #[error("expected {expected} fields, found {found}")]
    Arity {
        /// The required field count.
        expected: usize,
        /// The field count actually present.
        found: usize,
    },
}

/// The retained fields of one listing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundRecord {
    /// Field 0, the fund code.
    pub code: String,
    /// Field 2, the display name.
    pub name: String,
    /// Field 3, the category label.
    pub category: String,
}

/// Returns the inner text of every `[...]` literal in `text`, left to right.
///
/// Two cursors walk the input once: `start` stops on a `[`, `end` runs from
/// there to the next `]`, the text strictly between them is emitted and
/// `start` resumes just past `end`. Nested brackets are not supported: for
/// `[[a],[b]]` the first slice is `[a`. Text without brackets, or with a
/// trailing unmatched `[`, contributes nothing.
pub fn extract_arrays(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut result = Vec::new();
    let mut start = 0;

    while start < bytes.len() {
        if bytes[start] != b'[' {
            start += 1;
            continue;
        }

        let mut end = start + 1;
        while end < bytes.len() && bytes[end] != b']' {
            end += 1;
        }
        if end == bytes.len() {
            break;
        }

        // Brackets are ASCII, so both offsets sit on char boundaries.
        result.push(&text[start + 1..end]);
        start = end + 1;
    }

    result
}

/// Splits one record literal on commas and keeps code, name and category.
///
/// Each field loses at most one leading and one trailing `"`. Any field
/// count other than `RECORD_ARITY` is rejected.
pub fn parse_record(raw: &str) -> Result<FundRecord, RecordError> {
    let fields: Vec<&str> = raw.split(',').map(unquote).collect();
    if fields.len() != RECORD_ARITY {
        return Err(RecordError::Arity {
            expected: RECORD_ARITY,
            found: fields.len(),
        });
    }

    Ok(FundRecord {
        code: fields[0].to_string(),
        name: fields[2].to_string(),
        category: fields[3].to_string(),
    })
}

/// Locates the outer listing array and returns its contents without the
/// enclosing brackets.
///
/// Matches what the greedy pattern `\[.*\]` finds: on the first line holding
/// a `[` followed later by a `]`, everything from that `[` to the last `]`.
pub fn listing_body(text: &str) -> Option<&str> {
    text.lines().find_map(|line| {
        let open = line.find('[')?;
        let close = line.rfind(']')?;
        (close > open).then(|| &line[open + 1..close])
    })
}

fn unquote(field: &str) -> &str {
    let field = field.strip_prefix('"').unwrap_or(field);
    field.strip_suffix('"').unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_single_record() {
        let input = r#"["000001","HXCZHH","华夏成长","混合型","0"]"#;
        let arrays = extract_arrays(input);
        assert_eq!(arrays, vec![r#""000001","HXCZHH","华夏成长","混合型","0""#]);

        let record = parse_record(arrays[0]).unwrap();
        assert_eq!(record.code, "000001");
        assert_eq!(record.name, "华夏成长");
        assert_eq!(record.category, "混合型");
    }

    #[test]
    fn test_extracts_every_pair_in_order() {
        let input = "x[a,b] , [c]y[]z[d,e,f]";
        assert_eq!(extract_arrays(input), vec!["a,b", "c", "", "d,e,f"]);
    }

    #[test]
    fn test_no_brackets_yields_nothing() {
        assert!(extract_arrays("").is_empty());
        assert!(extract_arrays("var r = null;").is_empty());
    }

    #[test]
    fn test_unmatched_trailing_bracket_is_ignored() {
        assert_eq!(extract_arrays("[a][b"), vec!["a"]);
    }

    #[test]
    fn test_nested_brackets_are_not_unwrapped() {
        assert_eq!(extract_arrays("[[a],[b]]"), vec!["[a", "b"]);
    }

    #[test]
    fn test_record_with_wrong_arity_fails() {
        let err = parse_record(r#""000001","HXCZHH","华夏成长","混合型""#).unwrap_err();
        assert_eq!(
            err,
            RecordError::Arity {
                expected: 5,
                found: 4
            }
        );

        let err = parse_record(r#""1","2","3","4","5","6""#).unwrap_err();
        assert_eq!(
            err,
            RecordError::Arity {
                expected: 5,
                found: 6
            }
        );
    }

    #[test]
    fn test_only_one_quote_layer_is_removed() {
        let record = parse_record(r#""000001",x,""双引号"",混合型,"#).unwrap();
        assert_eq!(record.code, "000001");
        assert_eq!(record.name, r#""双引号""#);
        assert_eq!(record.category, "混合型");
    }

    #[test]
    fn test_listing_body_strips_outer_array() {
        let body = "\u{feff}var r = [[\"000001\",\"a\",\"b\",\"c\",\"d\"],[\"000003\",\"e\",\"f\",\"g\",\"h\"]];";
        let inner = listing_body(body).unwrap();
        assert!(inner.starts_with("[\"000001\""));
        assert!(inner.ends_with("\"h\"]"));
        assert_eq!(extract_arrays(inner).len(), 2);
    }

    #[test]
    fn test_listing_body_requires_brackets() {
        assert_eq!(listing_body("var r = ;"), None);
        assert_eq!(listing_body("] then ["), None);
    }
}
