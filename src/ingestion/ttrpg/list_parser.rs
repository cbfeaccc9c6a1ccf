//! Delimiter List Parser
//!
//! Parses `Name º Description` lists into feature or talent records.
//! Lines without a separator continue the open entry's description. For
//! talents, a line starting with `ºº` sets the group label for the entries
//! that follow.

use super::error::{EntryError, RecordError};
use super::factory;
use super::records::Item;
use super::text::{split_entry, split_lines, GROUP_PREFIX};

/// Entries produced by a list parse.
#[derive(Debug, Default)]
pub struct ListOutput {
    pub items: Vec<Item>,
    pub errors: Vec<EntryError>,
}

impl ListOutput {
    pub fn success(&self) -> bool {
        !self.items.is_empty()
    }
}

/// An entry being accumulated across lines.
#[derive(Debug)]
struct OpenEntry {
    name: String,
    description: String,
    group: Option<String>,
}

impl OpenEntry {
    fn start(line: &str, group: Option<&str>) -> Option<Self> {
        split_entry(line).map(|(name, description)| Self {
            name: name.to_string(),
            description: description.to_string(),
            group: group.map(str::to_string),
        })
    }

    fn append(&mut self, line: &str) {
        if !self.description.is_empty() {
            self.description.push(' ');
        }
        self.description.push_str(line);
    }
}

fn flush<F>(entry: Option<OpenEntry>, label: &str, build: &F, out: &mut ListOutput)
where
    F: Fn(&OpenEntry) -> Result<Item, RecordError>,
{
    let Some(entry) = entry else { return };
    match build(&entry) {
        Ok(item) => {
            log::debug!("Parsed {} '{}'", label.to_lowercase(), item.name);
            out.items.push(item);
        }
        Err(err) => out.errors.push(EntryError::from_error(label, &err)),
    }
}

fn parse_list<F>(text: &str, label: &str, with_groups: bool, build: F) -> ListOutput
where
    F: Fn(&OpenEntry) -> Result<Item, RecordError>,
{
    let mut out = ListOutput::default();
    let mut open: Option<OpenEntry> = None;
    let mut group: Option<String> = None;

    for line in split_lines(text) {
        if with_groups && line.starts_with(GROUP_PREFIX) {
            flush(open.take(), label, &build, &mut out);
            let name = line.trim_start_matches(GROUP_PREFIX).trim();
            group = (!name.is_empty()).then(|| name.to_string());
            continue;
        }

        if let Some(entry) = OpenEntry::start(line, group.as_deref()) {
            flush(open.replace(entry), label, &build, &mut out);
        } else if let Some(entry) = open.as_mut() {
            entry.append(line);
        }
    }
    flush(open, label, &build, &mut out);

    out
}

/// Parse `Name º Description` lines into feature records.
pub fn parse_features(text: &str) -> ListOutput {
    parse_list(text, "Feature", false, |entry| {
        factory::feature(&entry.name, &entry.description)
    })
}

/// Parse a talent list, honoring `ºº Group` header lines.
pub fn parse_talents(text: &str) -> ListOutput {
    parse_list(text, "Talent", true, |entry| {
        factory::talent(&entry.name, &entry.description, entry.group.as_deref())
    })
}
