use std::fmt;
use std::path::Path;
use std::rc::Rc;

use strata_ini::IniDocument;

use super::{Lookup, ValueSource};
use crate::error::{Error, Result};
use crate::value::Value;

/// Looks options up in an INI file, searching configured sections in order.
///
/// The file is read once at construction. Within a section that exists,
/// keys missing there fall back to the file's `DEFAULT` section; sections
/// missing from the file are skipped. The option's own section is ignored.
#[derive(Debug, Clone)]
pub struct FileSectionSource {
    label: String,
    document: Rc<IniDocument>,
    sections: Vec<String>,
}

impl FileSectionSource {
    /// Read and parse `path`, searching `sections` in order.
    pub fn open<S: Into<String>>(
        path: impl AsRef<Path>,
        sections: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let sections = collect_sections(sections)?;
        let document = IniDocument::load(path)?;
        Ok(Self::build(path.display().to_string(), Rc::new(document), sections))
    }

    /// Search an already parsed document; `label` names it in diagnostics.
    pub fn from_document<S: Into<String>>(
        label: impl Into<String>,
        document: Rc<IniDocument>,
        sections: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let sections = collect_sections(sections)?;
        Ok(Self::build(label.into(), document, sections))
    }

    fn build(label: String, document: Rc<IniDocument>, sections: Vec<String>) -> Self {
        for section in &sections {
            if !document.has_section(section) && section != strata_ini::DEFAULT_SECTION {
                tracing::debug!(source = %label, section = %section, "Searched section not present in file");
            }
        }
        Self {
            label,
            document,
            sections,
        }
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn document(&self) -> &IniDocument {
        &self.document
    }
}

fn collect_sections<S: Into<String>>(sections: impl IntoIterator<Item = S>) -> Result<Vec<String>> {
    let sections: Vec<String> = sections.into_iter().map(Into::into).collect();
    if sections.is_empty() {
        return Err(Error::InvalidSource {
            message: "a file-section source needs at least one section to search".to_string(),
        });
    }
    Ok(sections)
}

impl fmt::Display for FileSectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileSectionSource({})", self.label)
    }
}

impl ValueSource for FileSectionSource {
    fn lookup(&self, name: &str, _section: Option<&str>) -> Result<Lookup> {
        for section in &self.sections {
            if let Some(value) = self.document.get(section, name)? {
                return Ok(Lookup::Found(Value::Str(value)));
            }
        }
        Ok(Lookup::NotFound(format!(
            "{self} could not find {name} in sections [{}]",
            self.sections.join(", ")
        )))
    }
}
