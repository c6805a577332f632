//! Load the Schmidt Shakespeare lexicon and query it by word and citation.
//!
//! The source is TEI-style XML: `text/body/div1/entryFree` blocks, each with
//! a headword (`orth`), definition breaks (`lb`), quotations (`cit` holding
//! `quote` + `bibl`) and stand-alone citations (`bibl`). A single streaming
//! pass turns that flat, order-dependent sibling sequence into a nested tree
//! of entries → definitions → quotes → citations.
//!
//! Queries never touch that tree: [`search`] returns a fresh, smaller
//! [`LexiconIndex`], or `None` if nothing matched. A word lookup returns the
//! headword's entries whole. Once a play is given the result is pruned, so
//! every entry has a definition, every definition has a quote and every
//! quote has a matching citation.
//!
//! # Example
//! ```
//! use lexicon_db::{Emphasis, SearchQuery, build, search};
//! use lexicon_types::Play;
//!
//! # fn main() -> Result<(), lexicon_db::LexiconError> {
//! let xml = r#"<TEI.2><text><body><div1>
//!   <entryFree key="yesty"><orth>Yesty,</orth> foaming:
//!     <cit><quote>the y. waves</quote> <bibl>Mcb. IV, 1, 53</bibl></cit>
//!   </entryFree>
//! </div1></body></text></TEI.2>"#;
//! let index = build(xml)?;
//!
//! let query = SearchQuery::word("yesty").in_play(Play::Macbeth);
//! let hits = search(&index, &query).expect("yesty is cited in Macbeth");
//! print!("{}", hits.render(Emphasis::Ansi));
//!
//! assert!(search(&index, &SearchQuery::word("yesty").in_play(Play::Hamlet)).is_none());
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p lexicon-db --example lookup -- <lexicon.xml> <word>`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use lexicon_types::{LineRange, MatchCriteria, Play, normalize_act};
use memmap2::Mmap;
use tracing::{debug, info};

mod builder;
mod error;
mod highlight;
mod index;
mod markup;
mod render;
mod tree;

pub use builder::{BuildOptions, XmlToLexiconBuilder};
pub use error::LexiconError;
pub use highlight::{Emphasis, Highlighter, UnknownEmphasis, highlight};
pub use index::{EntryId, LexiconIndex};
pub use markup::{MarkupEvent, MarkupWalker, Sibling};
pub use tree::{Definition, Entry, Quote, QuoteGroup};

/// Strategy for reading the lexicon file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file (fast, no copy).
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

/// Build an index from lexicon markup with default options.
pub fn build(markup: &str) -> Result<LexiconIndex, LexiconError> {
    build_with(markup, &BuildOptions::default())
}

pub fn build_with(markup: &str, options: &BuildOptions) -> Result<LexiconIndex, LexiconError> {
    XmlToLexiconBuilder::new(*options).build(markup.as_bytes())
}

impl LexiconIndex {
    /// Load a lexicon file, memory-mapping it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        Self::load_with_mode(path, LoadMode::Mmap, &BuildOptions::default())
    }

    /// Load a lexicon file choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(
        path: impl AsRef<Path>,
        mode: LoadMode,
        options: &BuildOptions,
    ) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        info!("loading lexicon from {} ({:?})", path.display(), mode);
        let builder = XmlToLexiconBuilder::new(*options);
        match mode {
            LoadMode::Mmap => {
                let file = File::open(path)?;
                let map = unsafe { Mmap::map(&file) }?;
                builder.build(&map)
            }
            LoadMode::Owned => {
                let mut buf = Vec::new();
                File::open(path)?.read_to_end(&mut buf)?;
                builder.build(&buf)
            }
        }
    }
}

/// A structured lookup: any combination of word and citation constraints.
///
/// Act, scene and line constraints only apply together with a play.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchQuery {
    pub word: Option<String>,
    pub play: Option<Play>,
    pub act: Option<String>,
    pub scene: Option<u32>,
    pub line_start: Option<u32>,
    pub line_end: Option<u32>,
}

impl SearchQuery {
    pub fn word(word: impl Into<String>) -> Self {
        Self {
            word: Some(word.into()),
            ..Self::default()
        }
    }

    pub fn play(play: Play) -> Self {
        Self {
            play: Some(play),
            ..Self::default()
        }
    }

    pub fn in_play(mut self, play: Play) -> Self {
        self.play = Some(play);
        self
    }

    pub fn act(mut self, act: impl Into<String>) -> Self {
        self.act = Some(act.into());
        self
    }

    pub fn scene(mut self, scene: u32) -> Self {
        self.scene = Some(scene);
        self
    }

    pub fn lines(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        self.line_start = start;
        self.line_end = end;
        self
    }

    /// The location predicate, if a play was given.
    pub fn criteria(&self) -> Option<MatchCriteria> {
        let Some(play) = self.play else {
            if self.act.is_some()
                || self.scene.is_some()
                || self.line_start.is_some()
                || self.line_end.is_some()
            {
                debug!("ignoring act/scene/line constraints without a play");
            }
            return None;
        };
        Some(MatchCriteria {
            play,
            act: self.act.as_deref().map(normalize_act),
            scene: self.scene,
            lines: LineRange {
                start: self.line_start,
                end: self.line_end,
            },
        })
    }
}

/// Run a query against a built index. `None` means nothing matched.
pub fn search(index: &LexiconIndex, query: &SearchQuery) -> Option<LexiconIndex> {
    let criteria = query.criteria();
    index.filter(query.word.as_deref(), criteria.as_ref())
}
