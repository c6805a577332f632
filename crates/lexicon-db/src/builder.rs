use std::sync::LazyLock;

use lexicon_types::Location;
use regex::Regex;
use tracing::{debug, info};

use crate::error::LexiconError;
use crate::highlight::{Emphasis, Highlighter};
use crate::index::{EntryId, LexiconIndex};
use crate::markup::{MarkupEvent, MarkupWalker, Sibling};
use crate::tree::{Definition, QuoteGroup};

static NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *[0-9]+\) *").expect("numbering pattern is valid"));

/// Knobs for a single build.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BuildOptions {
    /// Markup used when expanding headword shorthand inside quotes.
    pub emphasis: Emphasis,
}

/// Parse-time cursor. Content always attaches to the most recently opened
/// entry and definition.
#[derive(Debug, Default)]
struct BuilderState {
    current_entry: Option<EntryId>,
    current_definition: Option<usize>,
    pending_prefix: Option<String>,
    highlighter: Option<Highlighter>,
}

/// Drives [`LexiconIndex`]'s build mutators from a stream of markup events.
pub struct XmlToLexiconBuilder {
    index: LexiconIndex,
    state: BuilderState,
    options: BuildOptions,
}

impl XmlToLexiconBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            index: LexiconIndex::new(),
            state: BuilderState::default(),
            options,
        }
    }

    /// Walk `source` to the end and return the finished index.
    pub fn build(mut self, source: &[u8]) -> Result<LexiconIndex, LexiconError> {
        let mut walker = MarkupWalker::new(source);
        while let Some(event) = walker.next_event()? {
            self.apply(event, walker.position())?;
        }
        info!(
            "indexed {} entries under {} headwords ({} quotes)",
            self.index.entry_count(),
            self.index.headword_count(),
            self.index.quote_count()
        );
        Ok(self.index)
    }

    /// Feed a single event. `position` is only used for error reporting.
    pub fn apply(&mut self, event: MarkupEvent, position: u64) -> Result<(), LexiconError> {
        match event {
            MarkupEvent::EntryStart { key, headword } => {
                let headword = normalize_headword_text(&headword);
                let id = self.index.insert_entry(&key, &headword);
                self.state = BuilderState {
                    current_entry: Some(id),
                    highlighter: Some(Highlighter::new(&headword, self.options.emphasis)),
                    ..BuilderState::default()
                };
            }
            MarkupEvent::EntryEnd => self.state = BuilderState::default(),
            MarkupEvent::Sibling(sibling) => self.apply_sibling(sibling, position)?,
        }
        Ok(())
    }

    pub fn finish(self) -> LexiconIndex {
        self.index
    }

    fn apply_sibling(&mut self, sibling: Sibling, position: u64) -> Result<(), LexiconError> {
        match sibling {
            Sibling::DefinitionMarker(text) => {
                let Some(id) = self.state.current_entry else {
                    debug!("definition text outside of an entry near byte {position}");
                    return Ok(());
                };
                self.state.pending_prefix = None;
                let text = normalize_definition(&text);
                if text.is_empty() {
                    debug!("skipping empty definition text near byte {position}");
                    return Ok(());
                }
                if let Some(entry) = self.index.entry_mut(id) {
                    self.state.current_definition = Some(entry.push_definition(text));
                }
            }
            Sibling::Quotation {
                text,
                location,
                trailing,
            } => {
                let location = self.resolve(&location, "quotation", position)?;
                let text = format!("\"{}\"", normalize_quote(&text));
                let text = match &self.state.highlighter {
                    Some(hl) => hl.apply(&text),
                    None => text,
                };
                let prefix = self.state.pending_prefix.take();
                self.open_definition("quotation", position)?
                    .push_quote(prefix.as_deref(), &text, location);
                self.state.pending_prefix = normalize_annotation(&trailing);
            }
            Sibling::BareLocation { location, trailing } => {
                let location = self.resolve(&location, "citation", position)?;
                let prefix = self.state.pending_prefix.take();
                let group = self.open_definition("citation", position)?;
                match group.extend_last(location) {
                    Ok(()) => {
                        self.state.pending_prefix = normalize_annotation(&trailing).or(prefix);
                    }
                    Err(location) => {
                        group.push_quote(prefix.as_deref(), "", location);
                        self.state.pending_prefix = normalize_annotation(&trailing);
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolve a citation for the open entry, failing if there is none.
    fn resolve(
        &self,
        token: &str,
        kind: &'static str,
        position: u64,
    ) -> Result<Location, LexiconError> {
        let id = self
            .state
            .current_entry
            .ok_or(LexiconError::OrphanedContent { kind, position })?;
        Location::parse(token).map_err(|source| LexiconError::Location {
            key: self
                .index
                .entry(id)
                .map(|e| e.key().to_string())
                .unwrap_or_default(),
            source,
        })
    }

    /// Quote group of the current definition, opening an untitled one if the
    /// entry has none yet.
    fn open_definition(
        &mut self,
        kind: &'static str,
        position: u64,
    ) -> Result<&mut QuoteGroup, LexiconError> {
        let entry = self
            .state
            .current_entry
            .and_then(|id| self.index.entry_mut(id))
            .ok_or(LexiconError::OrphanedContent { kind, position })?;
        let def = match self.state.current_definition {
            Some(def) => def,
            None => {
                let def = entry.push_definition(String::new());
                self.state.current_definition = Some(def);
                def
            }
        };
        entry
            .definition_mut(def)
            .map(Definition::quotes_mut)
            .ok_or(LexiconError::OrphanedContent { kind, position })
    }
}

fn normalize_headword_text(raw: &str) -> String {
    raw.trim().trim_matches(',').trim().to_string()
}

fn normalize_quote(raw: &str) -> String {
    collapse_whitespace(raw.trim().trim_matches(','))
}

/// Strip sense numbering such as `2) ` and the punctuation that separates
/// the text from the headword and from the quotes.
fn normalize_definition(raw: &str) -> String {
    let unnumbered = NUMBERING.replace_all(raw, " ");
    collapse_whitespace(&unnumbered)
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | ',' | ';'))
        .to_string()
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Connective text between citations (`also`, `compare`), or `None` when
/// only punctuation is left.
fn normalize_annotation(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';'));
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
