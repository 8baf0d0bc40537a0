//! Line-oriented INI parser.
//!
//! Mirrors the standard configparser read loop: strict duplicate detection
//! (a repeated `[DEFAULT]` header reopens the defaults), full-line comments only, indentation-driven continuation lines and blank
//! lines preserved inside multi-line values.

use regex::Regex;
use std::sync::LazyLock;

use crate::document::{DEFAULT_SECTION, Entries};
use crate::error::{Error, Result};

/// Section header: everything between the leading `[` and the last `]`.
static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.+)\]").expect("Invalid section header regex"));

/// Option line: the key is everything up to the first `=` or `:`.
static OPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*[=:]\s*(.*)$").expect("Invalid option line regex"));

const COMMENT_PREFIXES: [char; 2] = ['#', ';'];

/// Output of a successful parse, values already joined.
#[derive(Debug, Default)]
pub(crate) struct Parsed {
    pub defaults: Entries,
    pub sections: Vec<(String, Entries)>,
}

/// Where the lines currently being read belong.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Defaults,
    Section(usize),
}

/// Multi-line values are accumulated line by line and joined at the end.
#[derive(Default)]
struct Pending {
    defaults: Vec<(String, Vec<String>)>,
    sections: Vec<(String, Vec<(String, Vec<String>)>)>,
}

impl Pending {
    fn entries_mut(&mut self, cursor: Cursor) -> &mut Vec<(String, Vec<String>)> {
        match cursor {
            Cursor::Defaults => &mut self.defaults,
            Cursor::Section(index) => &mut self.sections[index].1,
        }
    }

    fn section_name(&self, cursor: Cursor) -> &str {
        match cursor {
            Cursor::Defaults => DEFAULT_SECTION,
            Cursor::Section(index) => &self.sections[index].0,
        }
    }

    fn finish(self) -> Parsed {
        Parsed {
            defaults: join_entries(self.defaults),
            sections: self
                .sections
                .into_iter()
                .map(|(name, entries)| (name, join_entries(entries)))
                .collect(),
        }
    }
}

fn join_entries(entries: Vec<(String, Vec<String>)>) -> Entries {
    Entries::from_pairs(
        entries
            .into_iter()
            .map(|(key, lines)| (key, lines.join("\n").trim_end().to_string())),
    )
}

pub(crate) fn parse(text: &str) -> Result<Parsed> {
    let mut pending = Pending::default();
    let mut cursor: Option<Cursor> = None;
    let mut current_key: Option<usize> = None;
    let mut indent_level = 0usize;
    let mut bad_lines = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let stripped = line.trim();
        let is_comment = stripped.starts_with(&COMMENT_PREFIXES[..]);
        let value = if is_comment { "" } else { stripped };

        if value.is_empty() {
            // Blank lines belong to the value being continued; comments never do.
            if !is_comment
                && let (Some(active), Some(key)) = (cursor, current_key)
            {
                pending.entries_mut(active)[key].1.push(String::new());
            }
            continue;
        }

        let indent = line.len() - line.trim_start().len();
        if let (Some(active), Some(key)) = (cursor, current_key)
            && indent > indent_level
        {
            pending.entries_mut(active)[key].1.push(value.to_string());
            continue;
        }
        indent_level = indent;

        if let Some(caps) = SECTION_HEADER.captures(value) {
            let name = caps[1].to_string();
            if name != DEFAULT_SECTION
                && pending.sections.iter().any(|(existing, _)| *existing == name)
            {
                return Err(Error::DuplicateSection {
                    section: name,
                    line: line_number,
                });
            }
            cursor = if name == DEFAULT_SECTION {
                Some(Cursor::Defaults)
            } else {
                pending.sections.push((name, Vec::new()));
                Some(Cursor::Section(pending.sections.len() - 1))
            };
            current_key = None;
            continue;
        }

        let Some(active) = cursor else {
            return Err(Error::MissingSectionHeader {
                line: line_number,
                content: line.to_string(),
            });
        };

        match OPTION_LINE.captures(value) {
            Some(caps) if !caps[1].is_empty() => {
                let key = caps[1].trim_end().to_lowercase();
                let entries = pending.entries_mut(active);
                if entries.iter().any(|(existing, _)| *existing == key) {
                    return Err(Error::DuplicateOption {
                        section: pending.section_name(active).to_string(),
                        key,
                        line: line_number,
                    });
                }
                entries.push((key, vec![caps[2].trim().to_string()]));
                current_key = Some(entries.len() - 1);
            }
            _ => {
                tracing::trace!(line = line_number, "Unparseable INI line");
                bad_lines.push((line_number, line.to_string()));
                current_key = None;
            }
        }
    }

    if !bad_lines.is_empty() {
        return Err(Error::Parse { lines: bad_lines });
    }

    Ok(pending.finish())
}
