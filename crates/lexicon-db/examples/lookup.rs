use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use lexicon_db::{BuildOptions, Emphasis, LexiconIndex, LoadMode, SearchQuery, search};
use lexicon_types::Play;

const USAGE: &str = "usage: cargo run -p lexicon-db --example lookup -- <lexicon.xml> <word> [play]";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().map(PathBuf::from).context(USAGE)?;
    let word = args.next().context(USAGE)?;
    let play = match args.next() {
        Some(name) => Some(match Play::resolve_query(&name) {
            Some(play) => play,
            None => match Play::closest(&name) {
                Some(guess) => bail!("unknown play `{name}`; did you mean {guess}?"),
                None => bail!("unknown play `{name}`"),
            },
        }),
        None => None,
    };
    if args.next().is_some() {
        bail!("too many arguments\n{USAGE}");
    }

    let options = BuildOptions {
        emphasis: Emphasis::Ansi,
    };
    let index = LexiconIndex::load_with_mode(&path, LoadMode::Mmap, &options)
        .with_context(|| format!("loading lexicon from {}", path.display()))?;

    let mut query = SearchQuery::word(word);
    query.play = play;
    match search(&index, &query) {
        Some(hits) => print!("{}", hits.render(Emphasis::Ansi)),
        None => println!("Sorry, that query did not yield any results"),
    }
    Ok(())
}
