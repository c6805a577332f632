use crate::play::Play;

/// Suggestions further than this many edits away are not offered.
const MAX_SUGGESTION_DISTANCE: usize = 3;

impl Play {
    /// The catalogued play whose title is nearest to `input`, compared
    /// case-insensitively. Ties go to the earlier play in [`Play::ALL`];
    /// nothing is suggested when every title is too far away.
    pub fn closest(input: &str) -> Option<Play> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let distance = |play: &Play| strsim::levenshtein(&needle, &play.name().to_lowercase());
        Play::ALL
            .into_iter()
            .min_by_key(distance)
            .filter(|play| distance(play) <= MAX_SUGGESTION_DISTANCE)
    }
}
