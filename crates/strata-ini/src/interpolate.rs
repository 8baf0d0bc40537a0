//! Basic `%(name)s` interpolation applied when values are read.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%\(([^)]+)\)s").expect("Invalid interpolation regex"));

const MAX_DEPTH: usize = 10;

/// Expand `value` (read from `section`/`key`), resolving references with `lookup`.
///
/// `lookup` receives lowercased key names and sees the section's own entries
/// layered over the defaults.
pub(crate) fn expand<'a>(
    section: &str,
    key: &str,
    value: &str,
    lookup: &impl Fn(&str) -> Option<&'a str>,
) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    expand_into(&mut out, section, key, value, lookup, 1)?;
    Ok(out)
}

fn expand_into<'a>(
    out: &mut String,
    section: &str,
    key: &str,
    mut rest: &str,
    lookup: &impl Fn(&str) -> Option<&'a str>,
    depth: usize,
) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::InterpolationDepth {
            section: section.to_string(),
            key: key.to_string(),
        });
    }

    while !rest.is_empty() {
        let Some(position) = rest.find('%') else {
            out.push_str(rest);
            return Ok(());
        };
        out.push_str(&rest[..position]);
        rest = &rest[position..];

        match rest.as_bytes().get(1) {
            Some(b'%') => {
                out.push('%');
                rest = &rest[2..];
            }
            Some(b'(') => {
                let caps = REFERENCE
                    .captures(rest)
                    .ok_or_else(|| Error::InterpolationSyntax {
                        section: section.to_string(),
                        key: key.to_string(),
                        message: "bad interpolation variable reference".to_string(),
                    })?;
                let reference = caps[1].to_lowercase();
                rest = &rest[caps[0].len()..];

                let substituted =
                    lookup(&reference).ok_or_else(|| Error::InterpolationMissingOption {
                        section: section.to_string(),
                        key: key.to_string(),
                        reference: reference.clone(),
                    })?;
                if substituted.contains('%') {
                    expand_into(out, section, key, substituted, lookup, depth + 1)?;
                } else {
                    out.push_str(substituted);
                }
            }
            _ => {
                return Err(Error::InterpolationSyntax {
                    section: section.to_string(),
                    key: key.to_string(),
                    message: format!("'%' must be followed by '%' or '(', found: {rest:?}"),
                });
            }
        }
    }

    Ok(())
}
