use std::fmt::Write;

use crate::highlight::Emphasis;
use crate::index::LexiconIndex;
use crate::tree::Entry;

const QUOTE_INDENT: &str = "    ";
const LOCATION_INDENT: &str = "        ";

impl LexiconIndex {
    /// Human-readable listing: headword, numbered definitions, indented
    /// quotes and further-indented citations. Entries are separated by a
    /// blank line.
    pub fn render(&self, emphasis: Emphasis) -> String {
        let mut out = String::new();
        for (i, entry) in self.iter().flat_map(|(_, entries)| entries).enumerate() {
            if i > 0 {
                out.push('\n');
            }
            render_entry(&mut out, entry, emphasis);
        }
        out
    }
}

fn render_entry(out: &mut String, entry: &Entry, emphasis: Emphasis) {
    let _ = writeln!(out, "{}", emphasis.strong(entry.headword()));
    for (n, definition) in entry.definitions().iter().enumerate() {
        if definition.text().is_empty() {
            let _ = writeln!(out, "{})", n + 1);
        } else {
            let _ = writeln!(out, "{}) {}", n + 1, definition.text());
        }
        for quote in definition.quotes().quotes() {
            if !quote.text().is_empty() {
                let _ = writeln!(out, "{QUOTE_INDENT}{}", quote.text());
            }
            for location in quote.locations() {
                let _ = writeln!(out, "{LOCATION_INDENT}{location}");
            }
        }
    }
}
