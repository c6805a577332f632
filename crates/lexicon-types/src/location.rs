use std::fmt;

use thiserror::Error;

use crate::play::Play;

/// Failure to turn a citation token into a [`Location`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LocationError {
    #[error("unknown play abbreviation `{abbreviation}` in citation `{token}`")]
    UnknownAbbreviation { abbreviation: String, token: String },
    #[error("malformed citation `{token}`: {reason}")]
    MalformedLocation { token: String, reason: String },
}

impl LocationError {
    fn malformed(token: &str, reason: impl Into<String>) -> Self {
        LocationError::MalformedLocation {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// A resolved citation: play, optional act and scene, and line number.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Location {
    pub play: Play,
    pub act: Option<String>,
    pub scene: Option<u32>,
    pub line: u32,
}

impl Location {
    /// Parse a citation such as `Mcb. III, 2, 15` or `H5 20`.
    ///
    /// Tokens are split on runs of commas and whitespace. Two tokens are read
    /// as `(play, line)`, three as `(play, act, line)`, four as
    /// `(play, act, scene, line)`.
    pub fn parse(token: &str) -> Result<Self, LocationError> {
        let parts: Vec<&str> = token
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        let (abbrev, act, scene, line) = match parts.as_slice() {
            [play, line] => (*play, None, None, *line),
            [play, act, line] => (*play, Some(*act), None, *line),
            [play, act, scene, line] => (*play, Some(*act), Some(*scene), *line),
            other => {
                return Err(LocationError::malformed(
                    token,
                    format!("expected 2 to 4 fields, found {}", other.len()),
                ));
            }
        };

        let play =
            Play::from_abbreviation(abbrev).ok_or_else(|| LocationError::UnknownAbbreviation {
                abbreviation: abbrev.to_string(),
                token: token.to_string(),
            })?;

        let act = act
            .map(|a| a.trim_end_matches('.').to_string())
            .filter(|a| !a.is_empty());
        let scene = scene
            .map(|s| parse_positive(token, "scene", s))
            .transpose()?;
        let line = parse_positive(token, "line", line)?;

        Ok(Self {
            play,
            act,
            scene,
            line,
        })
    }

    /// Whether this citation satisfies every constraint in `criteria`.
    pub fn matches(&self, criteria: &MatchCriteria) -> bool {
        if self.play != criteria.play {
            return false;
        }
        if let Some(act) = &criteria.act
            && self.act.as_deref().map(normalize_act).as_ref() != Some(act)
        {
            return false;
        }
        if let Some(scene) = criteria.scene
            && self.scene != Some(scene)
        {
            return false;
        }
        criteria.lines.contains(self.line)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.play)?;
        if let Some(act) = &self.act {
            write!(f, " {act}.")?;
        }
        if let Some(scene) = self.scene {
            write!(f, " {scene}.")?;
        }
        write!(f, " {}", self.line)
    }
}

fn parse_positive(token: &str, field: &str, raw: &str) -> Result<u32, LocationError> {
    let digits = raw.trim_end_matches('.');
    match digits.parse::<u32>() {
        Ok(0) => Err(LocationError::malformed(token, format!("{field} must be positive"))),
        Ok(n) => Ok(n),
        Err(_) => Err(LocationError::malformed(
            token,
            format!("{field} `{raw}` is not a number"),
        )),
    }
}

/// Canonical spelling of an act token: uppercase, no trailing period.
/// Arabic numerals are rewritten as Roman numerals so `3` and `III` compare
/// equal.
pub fn normalize_act(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('.');
    match trimmed.parse::<u32>() {
        Ok(n) if (1..40).contains(&n) => to_roman(n),
        _ => trimmed.to_ascii_uppercase(),
    }
}

fn to_roman(mut n: u32) -> String {
    const NUMERALS: [(u32, &str); 5] = [(10, "X"), (9, "IX"), (5, "V"), (4, "IV"), (1, "I")];
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Inclusive line bounds; a missing bound is open.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LineRange {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl LineRange {
    pub fn contains(&self, line: u32) -> bool {
        self.start.is_none_or(|s| line >= s) && self.end.is_none_or(|e| line <= e)
    }
}

/// Location predicate applied by every level of the entity tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchCriteria {
    pub play: Play,
    pub act: Option<String>,
    pub scene: Option<u32>,
    pub lines: LineRange,
}

impl MatchCriteria {
    pub fn play(play: Play) -> Self {
        Self {
            play,
            act: None,
            scene: None,
            lines: LineRange::default(),
        }
    }

    pub fn with_act(mut self, act: &str) -> Self {
        self.act = Some(normalize_act(act));
        self
    }

    pub fn with_scene(mut self, scene: u32) -> Self {
        self.scene = Some(scene);
        self
    }

    pub fn with_lines(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        self.lines = LineRange { start, end };
        self
    }
}
