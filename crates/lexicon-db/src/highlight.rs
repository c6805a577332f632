use std::str::FromStr;

use regex::Regex;
use thiserror::Error;

const MAGENTA: &str = "\x1b[1;35m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// How emphasized text is marked up in quotes and rendered output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Emphasis {
    /// ANSI escapes for a terminal (magenta occurrences, bold headwords).
    #[default]
    Ansi,
    /// `**word**`.
    Markdown,
    /// No markup at all.
    Plain,
}

impl Emphasis {
    /// Mark an occurrence of the headword inside a quote.
    pub fn highlight(self, text: &str) -> String {
        match self {
            Emphasis::Ansi => format!("{MAGENTA}{text}{RESET}"),
            Emphasis::Markdown => format!("**{text}**"),
            Emphasis::Plain => text.to_string(),
        }
    }

    /// Mark a headword line in rendered output.
    pub fn strong(self, text: &str) -> String {
        match self {
            Emphasis::Ansi => format!("{BOLD}{text}{RESET}"),
            Emphasis::Markdown => format!("**{text}**"),
            Emphasis::Plain => text.to_string(),
        }
    }
}

impl FromStr for Emphasis {
    type Err = UnknownEmphasis;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ansi" => Ok(Emphasis::Ansi),
            "markdown" | "md" => Ok(Emphasis::Markdown),
            "plain" | "none" => Ok(Emphasis::Plain),
            other => Err(UnknownEmphasis(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emphasis style `{0}` (expected ansi, markdown or plain)")]
pub struct UnknownEmphasis(pub String);

/// Expands the corpus shorthand for a headword inside its own quotations.
///
/// The lexicon writes `--s` for the headword's plural/possessive and the
/// headword's initial followed by a period (`a.` for *agent*) for the word
/// itself. Both are replaced by the lowercase headword, emphasized.
#[derive(Debug, Clone)]
pub struct Highlighter {
    word: String,
    emphasis: Emphasis,
    initial: Option<Regex>,
}

impl Highlighter {
    pub fn new(word: &str, emphasis: Emphasis) -> Self {
        let word = word.trim().to_lowercase();
        let initial = word.chars().next().and_then(|c| {
            let pattern = format!(
                r"(^|[^A-Za-z])(?i:{})\.([^A-Za-z]|$)",
                regex::escape(&c.to_string())
            );
            Regex::new(&pattern).ok()
        });
        Self {
            word,
            emphasis,
            initial,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        if self.word.is_empty() {
            return text.to_string();
        }
        let plural = self.emphasis.highlight(&format!("{}s", self.word));
        let result = text.replace("--s", &plural);
        match &self.initial {
            Some(re) => {
                let word = self.emphasis.highlight(&self.word);
                re.replace_all(&result, |caps: &regex::Captures<'_>| {
                    format!("{}{}{}", &caps[1], word, &caps[2])
                })
                .into_owned()
            }
            None => result,
        }
    }
}

/// One-off highlight with terminal emphasis.
pub fn highlight(word: &str, text: &str) -> String {
    Highlighter::new(word, Emphasis::Ansi).apply(text)
}
