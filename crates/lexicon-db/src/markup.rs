//! Streaming walk over the lexicon markup.
//!
//! Only `*/text/body/div1/entryFree` blocks are interpreted. Inside an entry
//! each direct child becomes a [`Sibling`] once its trailing text is known,
//! i.e. when the next child starts or the entry closes. Inline children such
//! as `<hi>` are folded into the surrounding trailing text.

use std::collections::VecDeque;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::LexiconError;

const ENTRY_DEPTH: usize = 5;
const CHILD_DEPTH: usize = 6;

/// One structural child of an entry, with its raw (unnormalized) text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Sibling {
    /// `orth` or `lb`: the trailing text opens a new definition.
    DefinitionMarker(String),
    /// `cit`: a quote with its citation.
    Quotation {
        text: String,
        location: String,
        trailing: String,
    },
    /// `bibl` on its own: another citation for the previous quote.
    BareLocation { location: String, trailing: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MarkupEvent {
    EntryStart { key: String, headword: String },
    Sibling(Sibling),
    EntryEnd,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ChildKind {
    Orth,
    Break,
    Cit,
    Bibl,
    Inline,
}

impl ChildKind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "orth" => ChildKind::Orth,
            "lb" => ChildKind::Break,
            "cit" => ChildKind::Cit,
            "bibl" => ChildKind::Bibl,
            _ => ChildKind::Inline,
        }
    }
}

#[derive(Debug)]
struct Capture {
    kind: ChildKind,
    text: String,
    quote: String,
    bibl: String,
}

impl Capture {
    fn new(kind: ChildKind) -> Self {
        Self {
            kind,
            text: String::new(),
            quote: String::new(),
            bibl: String::new(),
        }
    }

    fn into_sibling(self, trailing: String) -> Option<Sibling> {
        match self.kind {
            ChildKind::Orth | ChildKind::Break => Some(Sibling::DefinitionMarker(trailing)),
            ChildKind::Cit => Some(Sibling::Quotation {
                text: self.quote,
                location: self.bibl,
                trailing,
            }),
            ChildKind::Bibl => Some(Sibling::BareLocation {
                location: self.text,
                trailing,
            }),
            ChildKind::Inline => None,
        }
    }
}

#[derive(Debug)]
struct OpenEntry {
    key: String,
    has_headword: bool,
    pending: Option<(Capture, String)>,
}

/// Pull-based walker yielding [`MarkupEvent`]s in document order.
pub struct MarkupWalker<'a> {
    reader: Reader<&'a [u8]>,
    stack: Vec<String>,
    entry: Option<OpenEntry>,
    child: Option<Capture>,
    stray: Option<Capture>,
    queue: VecDeque<MarkupEvent>,
    saw_root: bool,
    saw_body: bool,
    done: bool,
}

impl<'a> MarkupWalker<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            reader: Reader::from_reader(source),
            stack: Vec::new(),
            entry: None,
            child: None,
            stray: None,
            queue: VecDeque::new(),
            saw_root: false,
            saw_body: false,
            done: false,
        }
    }

    /// Byte offset of the reader, for error messages.
    pub fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    pub fn next_event(&mut self) -> Result<Option<MarkupEvent>, LexiconError> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(Some(event));
            }
            if self.done {
                return Ok(None);
            }
            self.step()?;
        }
    }

    fn step(&mut self) -> Result<(), LexiconError> {
        let event = match self.reader.read_event() {
            Ok(event) => event,
            Err(err) => return Err(self.format_error(err)),
        };
        match event {
            Event::Start(e) => self.start(&e)?,
            Event::Empty(e) => {
                self.start(&e)?;
                self.end()?;
            }
            Event::End(_) => self.end()?,
            Event::Text(t) => {
                let text = t.unescape().map_err(|err| self.format_error(err))?;
                self.text(&text);
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t).into_owned();
                self.text(&text);
            }
            Event::Eof => self.finish()?,
            _ => {}
        }
        Ok(())
    }

    fn in_body(&self) -> bool {
        self.stack.len() >= 3 && self.stack[1] == "text" && self.stack[2] == "body"
    }

    fn start(&mut self, e: &BytesStart<'_>) -> Result<(), LexiconError> {
        let tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        self.saw_root = true;
        self.stack.push(tag.clone());
        let depth = self.stack.len();
        let tag = tag.as_str();

        if depth == 3 && self.in_body() {
            self.saw_body = true;
        } else if depth == ENTRY_DEPTH && self.in_body() && self.stack[3] == "div1" {
            match tag {
                "entryFree" => {
                    let key = self.entry_key(e)?;
                    self.entry = Some(OpenEntry {
                        key,
                        has_headword: false,
                        pending: None,
                    });
                }
                "cit" | "bibl" => self.stray = Some(Capture::new(ChildKind::from_tag(tag))),
                _ => {}
            }
        } else if depth == CHILD_DEPTH && self.entry.is_some() {
            let kind = ChildKind::from_tag(tag);
            if kind == ChildKind::Inline {
                debug!("folding <{tag}> into surrounding text");
            } else {
                self.flush_pending();
            }
            self.child = Some(Capture::new(kind));
        }
        Ok(())
    }

    fn entry_key(&self, e: &BytesStart<'_>) -> Result<String, LexiconError> {
        let attr = e
            .try_get_attribute("key")
            .map_err(|err| self.format_error(err))?
            .ok_or_else(|| {
                LexiconError::source_format(format!(
                    "<entryFree> without a key attribute at byte {}",
                    self.position()
                ))
            })?;
        let value = attr.unescape_value().map_err(|err| self.format_error(err))?;
        Ok(value.trim().to_lowercase())
    }

    fn text(&mut self, text: &str) {
        let depth = self.stack.len();
        if let Some(child) = self.child.as_mut() {
            match child.kind {
                ChildKind::Inline => {
                    if let Some((_, tail)) = self.entry.as_mut().and_then(|e| e.pending.as_mut()) {
                        tail.push_str(text);
                    }
                }
                _ => capture_text(child, &self.stack[CHILD_DEPTH..], text),
            }
        } else if let Some(stray) = self.stray.as_mut() {
            capture_text(stray, &self.stack[ENTRY_DEPTH..], text);
        } else if depth == ENTRY_DEPTH
            && let Some((_, tail)) = self.entry.as_mut().and_then(|e| e.pending.as_mut())
        {
            tail.push_str(text);
        }
    }

    fn end(&mut self) -> Result<(), LexiconError> {
        let depth = self.stack.len();
        if depth == CHILD_DEPTH
            && let Some(child) = self.child.take()
        {
            self.close_child(child);
        } else if depth == ENTRY_DEPTH && self.entry.is_some() {
            self.flush_pending();
            if let Some(entry) = self.entry.take()
                && !entry.has_headword
            {
                return Err(LexiconError::source_format(format!(
                    "entry `{}` has no <orth> headword",
                    entry.key
                )));
            }
            self.queue.push_back(MarkupEvent::EntryEnd);
        } else if depth == ENTRY_DEPTH
            && let Some(stray) = self.stray.take()
            && let Some(sibling) = stray.into_sibling(String::new())
        {
            self.queue.push_back(MarkupEvent::Sibling(sibling));
        }
        self.stack.pop();
        Ok(())
    }

    fn close_child(&mut self, child: Capture) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        match child.kind {
            ChildKind::Inline => {}
            ChildKind::Orth if !entry.has_headword => {
                entry.has_headword = true;
                self.queue.push_back(MarkupEvent::EntryStart {
                    key: entry.key.clone(),
                    headword: child.text.clone(),
                });
                entry.pending = Some((child, String::new()));
            }
            _ => entry.pending = Some((child, String::new())),
        }
    }

    fn flush_pending(&mut self) {
        let pending = self.entry.as_mut().and_then(|e| e.pending.take());
        if let Some((capture, tail)) = pending
            && let Some(sibling) = capture.into_sibling(tail)
        {
            self.queue.push_back(MarkupEvent::Sibling(sibling));
        }
    }

    fn finish(&mut self) -> Result<(), LexiconError> {
        self.done = true;
        if let Some(open) = self.stack.last() {
            return Err(LexiconError::source_format(format!(
                "unexpected end of document inside <{open}>"
            )));
        }
        if !self.saw_root {
            return Err(LexiconError::source_format("document has no root element"));
        }
        if !self.saw_body {
            return Err(LexiconError::source_format("document has no text/body section"));
        }
        Ok(())
    }

    fn format_error(&self, err: impl std::fmt::Display) -> LexiconError {
        LexiconError::source_format(format!("at byte {}: {err}", self.position()))
    }
}

fn capture_text(capture: &mut Capture, inner: &[String], text: &str) {
    match capture.kind {
        ChildKind::Orth | ChildKind::Bibl => capture.text.push_str(text),
        ChildKind::Cit => {
            if inner.iter().any(|t| t == "quote") {
                capture.quote.push_str(text);
            } else if inner.iter().any(|t| t == "bibl") {
                capture.bibl.push_str(text);
            }
        }
        ChildKind::Break | ChildKind::Inline => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(xml: &str) -> Result<Vec<MarkupEvent>, LexiconError> {
        let mut walker = MarkupWalker::new(xml.as_bytes());
        let mut events = Vec::new();
        while let Some(event) = walker.next_event()? {
            events.push(event);
        }
        Ok(events)
    }

    fn doc(body: &str) -> String {
        format!("<TEI.2><text><body><div1>{body}</div1></body></text></TEI.2>")
    }

    #[test]
    fn emits_siblings_with_their_trailing_text() {
        let xml = doc(concat!(
            r#"<entryFree key="Agent"><orth>Agent,</orth> 1) one who acts: "#,
            r#"<cit><quote>the a. was here,</quote> <bibl>Mcb. III, 2, 15</bibl></cit> also "#,
            r#"<bibl>Hml. I, 1, 3</bibl>. <lb/>2) a <hi>deputy</hi>: "#,
            r#"<cit><quote>his a.</quote><bibl>Lr. IV, 6, 8</bibl></cit></entryFree>"#,
        ));
        let events = walk(&xml).unwrap();
        assert_eq!(
            events,
            vec![
                MarkupEvent::EntryStart {
                    key: "agent".into(),
                    headword: "Agent,".into()
                },
                MarkupEvent::Sibling(Sibling::DefinitionMarker(" 1) one who acts: ".into())),
                MarkupEvent::Sibling(Sibling::Quotation {
                    text: "the a. was here,".into(),
                    location: "Mcb. III, 2, 15".into(),
                    trailing: " also ".into(),
                }),
                MarkupEvent::Sibling(Sibling::BareLocation {
                    location: "Hml. I, 1, 3".into(),
                    trailing: ". ".into(),
                }),
                MarkupEvent::Sibling(Sibling::DefinitionMarker("2) a deputy: ".into())),
                MarkupEvent::Sibling(Sibling::Quotation {
                    text: "his a.".into(),
                    location: "Lr. IV, 6, 8".into(),
                    trailing: String::new(),
                }),
                MarkupEvent::EntryEnd,
            ]
        );
    }

    #[test]
    fn reports_stray_citations_outside_entries() {
        let xml = doc(r#"<bibl>Mcb. I, 1, 1</bibl><entryFree key="x"><orth>x</orth></entryFree>"#);
        let events = walk(&xml).unwrap();
        assert_eq!(
            events[0],
            MarkupEvent::Sibling(Sibling::BareLocation {
                location: "Mcb. I, 1, 1".into(),
                trailing: String::new(),
            })
        );
    }

    #[test]
    fn ignores_markup_outside_the_body() {
        let xml = concat!(
            r#"<TEI.2><teiHeader><entryFree key="no"><orth>no</orth></entryFree></teiHeader>"#,
            r#"<text><body><div1><entryFree key="yes"><orth>yes</orth></entryFree></div1></body></text></TEI.2>"#,
        );
        let events = walk(xml).unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], MarkupEvent::EntryStart { key, .. } if key == "yes"));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(walk(""), Err(LexiconError::SourceFormat(_))));
        assert!(matches!(
            walk("<TEI.2><text><body></body></text>"),
            Err(LexiconError::SourceFormat(_))
        ));
        assert!(matches!(
            walk("<TEI.2><text><body></div1></body></text></TEI.2>"),
            Err(LexiconError::SourceFormat(_))
        ));
        assert!(matches!(
            walk("<TEI.2><front/></TEI.2>"),
            Err(LexiconError::SourceFormat(_))
        ));
        assert!(matches!(
            walk(&doc(r#"<entryFree><orth>x</orth></entryFree>"#)),
            Err(LexiconError::SourceFormat(_))
        ));
        assert!(matches!(
            walk(&doc(r#"<entryFree key="x"></entryFree>"#)),
            Err(LexiconError::SourceFormat(_))
        ));
    }
}
