use std::collections::{BTreeMap, HashMap};

use lexicon_types::MatchCriteria;
use tracing::warn;

use crate::tree::Entry;

/// Handle to an entry inside one [`LexiconIndex`]. Only meaningful for the
/// index that issued it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct EntryId(usize);

/// Entries grouped by lowercase headword.
///
/// Entries are identified by their key: inserting a key twice replaces the
/// earlier entry rather than adding a second one. Headwords iterate in sorted
/// order; the order of entries sharing a headword is not part of the API.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LexiconIndex {
    entries: Vec<Entry>,
    headwords: BTreeMap<String, Vec<EntryId>>,
    keys: HashMap<String, EntryId>,
}

impl LexiconIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new entry and make it addressable immediately, before any
    /// of its content has been parsed.
    pub fn insert_entry(&mut self, key: &str, headword: &str) -> EntryId {
        let entry = Entry::new(key, headword);
        let bucket = normalize_headword(headword);

        if let Some(&id) = self.keys.get(entry.key()) {
            warn!("duplicate entry key `{}`; replacing earlier entry", entry.key());
            let old_bucket = normalize_headword(self.entries[id.0].headword());
            if old_bucket != bucket {
                self.detach(&old_bucket, id);
                self.headwords.entry(bucket).or_default().push(id);
            }
            self.entries[id.0] = entry;
            return id;
        }

        let id = EntryId(self.entries.len());
        self.keys.insert(entry.key().to_string(), id);
        self.entries.push(entry);
        self.headwords.entry(bucket).or_default().push(id);
        id
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.get_mut(id.0)
    }

    pub fn entry_by_key(&self, key: &str) -> Option<&Entry> {
        self.keys
            .get(&key.to_lowercase())
            .and_then(|id| self.entry(*id))
    }

    /// Entries filed under `word`, matched case-insensitively.
    pub fn entries_for(&self, word: &str) -> impl Iterator<Item = &Entry> + '_ {
        self.headwords
            .get(&normalize_headword(word))
            .into_iter()
            .flatten()
            .filter_map(|id| self.entry(*id))
    }

    /// Every headword bucket with its entries, in headword order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec<&Entry>)> + '_ {
        self.headwords.iter().map(|(word, ids)| {
            (
                word.as_str(),
                ids.iter().filter_map(|id| self.entry(*id)).collect(),
            )
        })
    }

    pub fn headwords(&self) -> impl Iterator<Item = &str> + '_ {
        self.headwords.keys().map(String::as_str)
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.headwords.contains_key(&normalize_headword(word))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn headword_count(&self) -> usize {
        self.headwords.len()
    }

    pub fn quote_count(&self) -> usize {
        self.entries.iter().map(Entry::quote_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prune the index down to what matches.
    ///
    /// With a `word`, only that headword's bucket is considered and an
    /// unknown word yields `None`. Without `criteria` entries pass through
    /// whole, definitions without quotes included; only entries with no
    /// definition at all are left out. The receiver is never modified;
    /// `None` stands for an empty result.
    pub fn filter(&self, word: Option<&str>, criteria: Option<&MatchCriteria>) -> Option<Self> {
        let mut result = LexiconIndex::new();
        match word {
            Some(word) => {
                let ids = self.headwords.get(&normalize_headword(word))?;
                self.filter_bucket(ids, criteria, &mut result);
            }
            None => {
                for ids in self.headwords.values() {
                    self.filter_bucket(ids, criteria, &mut result);
                }
            }
        }
        if result.is_empty() { None } else { Some(result) }
    }

    fn filter_bucket(
        &self,
        ids: &[EntryId],
        criteria: Option<&MatchCriteria>,
        out: &mut LexiconIndex,
    ) {
        for entry in ids.iter().filter_map(|id| self.entry(*id)) {
            let kept = match criteria {
                Some(criteria) => entry.filter(criteria),
                None => entry.has_content().then(|| entry.clone()),
            };
            if let Some(kept) = kept {
                out.push_entry(kept);
            }
        }
    }

    fn push_entry(&mut self, entry: Entry) {
        let id = EntryId(self.entries.len());
        self.keys.insert(entry.key().to_string(), id);
        self.headwords
            .entry(normalize_headword(entry.headword()))
            .or_default()
            .push(id);
        self.entries.push(entry);
    }

    fn detach(&mut self, bucket: &str, id: EntryId) {
        if let Some(ids) = self.headwords.get_mut(bucket) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.headwords.remove(bucket);
            }
        }
    }
}

pub(crate) fn normalize_headword(word: &str) -> String {
    word.trim().to_lowercase()
}
