//! Positional placeholder helpers for fixed statements.

use crate::error::{DbError, DbResult};
use std::fmt::Write;

/// Highest placeholder number the extended query protocol can carry (`Bind` counts
/// parameters in an `int16`).
pub const MAX_PLACEHOLDER: usize = u16::MAX as usize;

/// Render a parenthesized group of `len` placeholders numbered from `start`.
///
/// `expand_placeholder_group(3, 3)` is `($3, $4, $5)`. Numbering is one-based and
/// gapless; `start` is normally one past the highest placeholder already in the
/// statement (see [`highest_placeholder`]).
pub fn expand_placeholder_group(start: usize, len: usize) -> DbResult<String> {
    if start == 0 {
        return Err(DbError::validation("placeholder numbering starts at $1"));
    }
    if len == 0 {
        return Err(DbError::validation(
            "placeholder group needs at least one placeholder",
        ));
    }

    let last = start
        .checked_add(len - 1)
        .filter(|&last| last <= MAX_PLACEHOLDER)
        .ok_or_else(|| {
            DbError::Validation(format!(
                "placeholder group of {len} starting at ${start} exceeds ${MAX_PLACEHOLDER}"
            ))
        })?;

    let mut out = String::with_capacity(2 + len * 8);
    out.push('(');
    for n in start..=last {
        if n > start {
            out.push_str(", ");
        }
        let _ = write!(&mut out, "${n}");
    }
    out.push(')');
    Ok(out)
}

/// Highest `$n` placeholder number used in `sql`, or 0 if there is none.
///
/// Placeholders inside quoted strings, quoted identifiers and comments are ignored.
pub fn highest_placeholder(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut max = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        // Doubled quote is an escaped quote.
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 1;
            }
            b'$' => {
                let digits_start = i + 1;
                let mut j = digits_start;
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
                if j > digits_start {
                    if let Ok(n) = sql[digits_start..j].parse::<usize>() {
                        max = max.max(n);
                    }
                    i = j;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_of_one_keeps_start() {
        assert_eq!(expand_placeholder_group(1, 1).unwrap(), "($1)");
    }

    #[test]
    fn group_is_sequential_without_gaps() {
        for len in 1..=40 {
            let group = expand_placeholder_group(1, len).unwrap();
            let inner = group.trim_start_matches('(').trim_end_matches(')');
            let numbers: Vec<usize> = inner
                .split(", ")
                .map(|p| p.trim_start_matches('$').parse().unwrap())
                .collect();
            assert_eq!(numbers, (1..=len).collect::<Vec<_>>());
        }
    }

    #[test]
    fn group_continues_after_offset() {
        assert_eq!(expand_placeholder_group(3, 3).unwrap(), "($3, $4, $5)");
    }

    #[test]
    fn group_rejects_empty_and_zero_start() {
        assert!(expand_placeholder_group(1, 0).is_err());
        assert!(expand_placeholder_group(0, 2).is_err());
    }

    #[test]
    fn group_past_protocol_limit_is_rejected() {
        for (start, len) in [
            (usize::MAX, 1),
            (usize::MAX - 1, 3),
            (1, usize::MAX),
            (MAX_PLACEHOLDER, 2),
        ] {
            let err = expand_placeholder_group(start, len).unwrap_err();
            assert!(matches!(err, DbError::Validation(_)), "({start}, {len}): {err:?}");
        }

        let edge = expand_placeholder_group(MAX_PLACEHOLDER - 1, 2).unwrap();
        assert_eq!(edge, "($65534, $65535)");
    }

    #[test]
    fn highest_placeholder_scans_statement() {
        assert_eq!(highest_placeholder("SELECT 1"), 0);
        assert_eq!(
            highest_placeholder("UPDATE account SET display_name = $1 WHERE id = $2"),
            2
        );
        assert_eq!(highest_placeholder("SELECT $10, $2"), 10);
    }

    #[test]
    fn highest_placeholder_ignores_literals_and_comments() {
        let sql = "-- uses $9\nSELECT '$7', \"$8\" /* $6 */ FROM account WHERE id = $1";
        assert_eq!(highest_placeholder(sql), 1);
        assert_eq!(highest_placeholder("SELECT 'it''s $4' WHERE a = $2"), 2);
    }
}
