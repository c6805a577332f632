//! The nested entry model: entries own definitions, definitions own a group
//! of quotes, quotes own their citations.
//!
//! Every level exposes `filter`, which never mutates `self` and returns
//! `None` instead of an empty node. A filtered definition therefore always
//! has a quote, and a filtered entry always has a definition.

use lexicon_types::{Location, MatchCriteria};

/// An illustrative excerpt and every place it is cited.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Quote {
    text: String,
    locations: Vec<Location>,
}

impl Quote {
    pub fn new(text: impl Into<String>, location: Location) -> Self {
        Self {
            text: text.into(),
            locations: vec![location],
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Never empty.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn push_location(&mut self, location: Location) {
        self.locations.push(location);
    }

    /// Keep the matching citations; the text is carried over untouched.
    pub fn filter(&self, criteria: &MatchCriteria) -> Option<Self> {
        let locations: Vec<Location> = self
            .locations
            .iter()
            .filter(|loc| loc.matches(criteria))
            .cloned()
            .collect();
        if locations.is_empty() {
            return None;
        }
        Some(Self {
            text: self.text.clone(),
            locations,
        })
    }
}

/// Quotes under one definition, in source order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QuoteGroup {
    quotes: Vec<Quote>,
}

impl QuoteGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Append a quote. A connective prefix such as `also` is joined to the
    /// text now; it is never attached to an earlier quote.
    pub fn push_quote(&mut self, prefix: Option<&str>, text: &str, location: Location) {
        let text = match prefix {
            Some(p) if text.is_empty() => p.to_string(),
            Some(p) => format!("{p} {text}"),
            None => text.to_string(),
        };
        self.quotes.push(Quote::new(text, location));
    }

    /// Add another citation to the most recent quote. Returns the location
    /// back if the group is still empty.
    pub fn extend_last(&mut self, location: Location) -> Result<(), Location> {
        match self.quotes.last_mut() {
            Some(quote) => {
                quote.push_location(location);
                Ok(())
            }
            None => Err(location),
        }
    }

    pub fn filter(&self, criteria: &MatchCriteria) -> Option<Self> {
        let quotes: Vec<Quote> = self
            .quotes
            .iter()
            .filter_map(|q| q.filter(criteria))
            .collect();
        if quotes.is_empty() {
            None
        } else {
            Some(Self { quotes })
        }
    }
}

/// One numbered sense of a headword.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Definition {
    text: String,
    quotes: QuoteGroup,
}

impl Definition {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quotes: QuoteGroup::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn quotes(&self) -> &QuoteGroup {
        &self.quotes
    }

    pub fn quotes_mut(&mut self) -> &mut QuoteGroup {
        &mut self.quotes
    }

    pub fn filter(&self, criteria: &MatchCriteria) -> Option<Self> {
        self.quotes.filter(criteria).map(|quotes| Self {
            text: self.text.clone(),
            quotes,
        })
    }
}

/// A dictionary entry. `key` is unique in the source; `headword` may repeat.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    key: String,
    headword: String,
    definitions: Vec<Definition>,
}

impl Entry {
    pub fn new(key: impl Into<String>, headword: impl Into<String>) -> Self {
        Self {
            key: key.into().to_lowercase(),
            headword: headword.into(),
            definitions: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn headword(&self) -> &str {
        &self.headword
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Open a new definition and return its position.
    pub fn push_definition(&mut self, text: impl Into<String>) -> usize {
        self.definitions.push(Definition::new(text));
        self.definitions.len() - 1
    }

    pub fn definition_mut(&mut self, idx: usize) -> Option<&mut Definition> {
        self.definitions.get_mut(idx)
    }

    /// Whether the entry has anything to show. Entries without a single
    /// definition are left out of every result.
    pub fn has_content(&self) -> bool {
        !self.definitions.is_empty()
    }

    pub fn quote_count(&self) -> usize {
        self.definitions.iter().map(|d| d.quotes.len()).sum()
    }

    pub fn filter(&self, criteria: &MatchCriteria) -> Option<Self> {
        let definitions: Vec<Definition> = self
            .definitions
            .iter()
            .filter_map(|d| d.filter(criteria))
            .collect();
        if definitions.is_empty() {
            return None;
        }
        Some(Self {
            key: self.key.clone(),
            headword: self.headword.clone(),
            definitions,
        })
    }
}
