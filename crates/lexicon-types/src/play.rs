use std::fmt;

/// Dramatic genre used to group plays in listings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Genre {
    Comedy,
    Tragedy,
    History,
}

impl Genre {
    pub const ALL: [Genre; 3] = [Genre::Comedy, Genre::Tragedy, Genre::History];

    /// Plays of this genre in catalogue order.
    pub fn plays(self) -> impl Iterator<Item = Play> {
        Play::ALL.into_iter().filter(move |p| p.genre() == self)
    }

    pub fn label(self) -> &'static str {
        match self {
            Genre::Comedy => "comedies",
            Genre::Tragedy => "tragedies",
            Genre::History => "histories",
        }
    }
}

/// A play cited by the lexicon, always in its resolved canonical form.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Play {
    AllsWell,
    AsYouLikeIt,
    ComedyOfErrors,
    LovesLaboursLost,
    MeasureForMeasure,
    MerchantOfVenice,
    MerryWives,
    MidsummerNightsDream,
    MuchAdo,
    TamingOfTheShrew,
    Tempest,
    TwelfthNight,
    TwoGentlemen,
    WintersTale,
    AntonyAndCleopatra,
    Coriolanus,
    Cymbeline,
    Hamlet,
    JuliusCaesar,
    KingLear,
    Macbeth,
    Othello,
    RomeoAndJuliet,
    TimonOfAthens,
    TitusAndronicus,
    TroilusAndCressida,
    Henry4Part1,
    Henry4Part2,
    Henry5,
    Henry6Part1,
    Henry6Part2,
    Henry6Part3,
    Henry8,
    KingJohn,
    Pericles,
    Richard2,
    Richard3,
}

/// Corpus abbreviations and the plays they stand for.
///
/// The corpus also cites `V`, `II`, `III` and `IV` as if they were plays;
/// those have no known resolution and are deliberately absent.
const ABBREVIATIONS: &[(&str, Play)] = &[
    ("Wint.", Play::WintersTale),
    ("Meas.", Play::MeasureForMeasure),
    ("LLL", Play::LovesLaboursLost),
    ("Ado", Play::MuchAdo),
    ("Tw.", Play::TwelfthNight),
    ("John", Play::KingJohn),
    ("Tp.", Play::Tempest),
    ("R2", Play::Richard2),
    ("Mids.", Play::MidsummerNightsDream),
    ("Merch.", Play::MerchantOfVenice),
    ("Lr.", Play::KingLear),
    ("H6A", Play::Henry6Part1),
    ("Rom.", Play::RomeoAndJuliet),
    ("Ant.", Play::AntonyAndCleopatra),
    ("Wiv.", Play::MerryWives),
    ("R3", Play::Richard3),
    ("Shr.", Play::TamingOfTheShrew),
    ("Ven.", Play::MerchantOfVenice),
    ("Cor.", Play::Coriolanus),
    ("Mcb.", Play::Macbeth),
    ("H4A", Play::Henry4Part1),
    ("H8", Play::Henry8),
    ("H5", Play::Henry5),
    ("H4B", Play::Henry4Part2),
    ("H6B", Play::Henry6Part2),
    ("H6C", Play::Henry6Part3),
    ("Tit.", Play::TitusAndronicus),
    ("As", Play::AsYouLikeIt),
    ("Alls", Play::AllsWell),
    ("Tim.", Play::TimonOfAthens),
    ("Hml.", Play::Hamlet),
    ("Oth.", Play::Othello),
    ("Err.", Play::ComedyOfErrors),
    ("Gent.", Play::TwoGentlemen),
    ("Cymb.", Play::Cymbeline),
    ("Gentl.", Play::TwoGentlemen),
    ("Troil.", Play::TroilusAndCressida),
];

impl Play {
    pub const ALL: [Play; 37] = [
        Play::AllsWell,
        Play::AsYouLikeIt,
        Play::ComedyOfErrors,
        Play::LovesLaboursLost,
        Play::MeasureForMeasure,
        Play::MerchantOfVenice,
        Play::MerryWives,
        Play::MidsummerNightsDream,
        Play::MuchAdo,
        Play::TamingOfTheShrew,
        Play::Tempest,
        Play::TwelfthNight,
        Play::TwoGentlemen,
        Play::WintersTale,
        Play::AntonyAndCleopatra,
        Play::Coriolanus,
        Play::Cymbeline,
        Play::Hamlet,
        Play::JuliusCaesar,
        Play::KingLear,
        Play::Macbeth,
        Play::Othello,
        Play::RomeoAndJuliet,
        Play::TimonOfAthens,
        Play::TitusAndronicus,
        Play::TroilusAndCressida,
        Play::Henry4Part1,
        Play::Henry4Part2,
        Play::Henry5,
        Play::Henry6Part1,
        Play::Henry6Part2,
        Play::Henry6Part3,
        Play::Henry8,
        Play::KingJohn,
        Play::Pericles,
        Play::Richard2,
        Play::Richard3,
    ];

    /// Canonical title as printed in citations.
    pub fn name(self) -> &'static str {
        match self {
            Play::AllsWell => "All's Well That Ends Well",
            Play::AsYouLikeIt => "As You Like It",
            Play::ComedyOfErrors => "The Comedy of Errors",
            Play::LovesLaboursLost => "Love's Labour's Lost",
            Play::MeasureForMeasure => "Measure for Measure",
            Play::MerchantOfVenice => "The Merchant of Venice",
            Play::MerryWives => "The Merry Wives of Windsor",
            Play::MidsummerNightsDream => "A Midsummer Night's Dream",
            Play::MuchAdo => "Much Ado about Nothing",
            Play::TamingOfTheShrew => "The Taming of the Shrew",
            Play::Tempest => "The Tempest",
            Play::TwelfthNight => "Twelfth Night",
            Play::TwoGentlemen => "Two Gentlemen of Verona",
            Play::WintersTale => "The Winter's Tale",
            Play::AntonyAndCleopatra => "Antony and Cleopatra",
            Play::Coriolanus => "Coriolanus",
            Play::Cymbeline => "Cymbeline",
            Play::Hamlet => "Hamlet",
            Play::JuliusCaesar => "Julius Caesar",
            Play::KingLear => "King Lear",
            Play::Macbeth => "Macbeth",
            Play::Othello => "Othello",
            Play::RomeoAndJuliet => "Romeo and Juliet",
            Play::TimonOfAthens => "Timon of Athens",
            Play::TitusAndronicus => "Titus Andronicus",
            Play::TroilusAndCressida => "Troilus and Cressida",
            Play::Henry4Part1 => "Henry IV, Part I",
            Play::Henry4Part2 => "Henry IV, Part II",
            Play::Henry5 => "Henry V",
            Play::Henry6Part1 => "Henry VI, Part I",
            Play::Henry6Part2 => "Henry VI, Part II",
            Play::Henry6Part3 => "Henry VI, Part III",
            Play::Henry8 => "Henry VIII",
            Play::KingJohn => "King John",
            Play::Pericles => "Pericles",
            Play::Richard2 => "Richard II",
            Play::Richard3 => "Richard III",
        }
    }

    pub fn genre(self) -> Genre {
        match self {
            Play::AllsWell
            | Play::AsYouLikeIt
            | Play::ComedyOfErrors
            | Play::LovesLaboursLost
            | Play::MeasureForMeasure
            | Play::MerchantOfVenice
            | Play::MerryWives
            | Play::MidsummerNightsDream
            | Play::MuchAdo
            | Play::TamingOfTheShrew
            | Play::Tempest
            | Play::TwelfthNight
            | Play::TwoGentlemen
            | Play::WintersTale => Genre::Comedy,
            Play::AntonyAndCleopatra
            | Play::Coriolanus
            | Play::Cymbeline
            | Play::Hamlet
            | Play::JuliusCaesar
            | Play::KingLear
            | Play::Macbeth
            | Play::Othello
            | Play::RomeoAndJuliet
            | Play::TimonOfAthens
            | Play::TitusAndronicus
            | Play::TroilusAndCressida => Genre::Tragedy,
            Play::Henry4Part1
            | Play::Henry4Part2
            | Play::Henry5
            | Play::Henry6Part1
            | Play::Henry6Part2
            | Play::Henry6Part3
            | Play::Henry8
            | Play::KingJohn
            | Play::Pericles
            | Play::Richard2
            | Play::Richard3 => Genre::History,
        }
    }

    /// Resolve a corpus abbreviation such as `Mcb.` or `H5`. Exact match only.
    pub fn from_abbreviation(abbrev: &str) -> Option<Self> {
        ABBREVIATIONS
            .iter()
            .find(|(a, _)| *a == abbrev)
            .map(|(_, play)| *play)
    }

    /// Look up a play by its canonical title, ignoring case and surrounding
    /// whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim();
        Play::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(needle))
    }

    /// Resolve user input that may be either a title or an abbreviation.
    pub fn resolve_query(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        Self::from_name(trimmed).or_else(|| Self::from_abbreviation(trimmed))
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
