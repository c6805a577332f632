//! Shared types for the Shakespeare lexicon: plays, citations and the
//! predicate used to filter them.
//!
//! Citations in the corpus are terse (`Mcb. III, 2, 15`); [`Location::parse`]
//! resolves the abbreviation against a fixed table and unpacks the remaining
//! fields by arity. [`MatchCriteria`] is the play/act/scene/line predicate the
//! index applies at every level of its entry tree.
//!
//! ```rust
//! use lexicon_types::{Location, MatchCriteria, Play};
//!
//! let loc = Location::parse("Mcb. III, 2, 15").unwrap();
//! assert_eq!(loc.play, Play::Macbeth);
//! assert!(loc.matches(&MatchCriteria::play(Play::Macbeth).with_act("III")));
//! assert_eq!(loc.to_string(), "Macbeth: III. 2. 15");
//! ```

mod location;
mod matcher;
mod play;

pub use location::{LineRange, Location, LocationError, MatchCriteria, normalize_act};
pub use play::{Genre, Play};
