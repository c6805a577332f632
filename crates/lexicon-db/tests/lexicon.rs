use std::path::PathBuf;

use lexicon_db::{
    BuildOptions, Emphasis, LexiconError, LexiconIndex, LoadMode, SearchQuery, build, build_with,
    search,
};
use lexicon_types::{LocationError, Play};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("small.xml")
}

fn plain() -> BuildOptions {
    BuildOptions {
        emphasis: Emphasis::Plain,
    }
}

fn load() -> LexiconIndex {
    LexiconIndex::load_with_mode(fixture_path(), LoadMode::Owned, &plain()).expect("load fixture")
}

fn doc(body: &str) -> String {
    format!("<TEI.2><text><body><div1>{body}</div1></body></text></TEI.2>")
}

fn assert_no_empty_nodes(index: &LexiconIndex) {
    for (_, entries) in index.iter() {
        for entry in entries {
            assert!(!entry.definitions().is_empty(), "{} has no definitions", entry.key());
            for definition in entry.definitions() {
                assert!(!definition.quotes().is_empty(), "{} has an empty definition", entry.key());
                for quote in definition.quotes().quotes() {
                    assert!(!quote.locations().is_empty());
                }
            }
        }
    }
}

#[test]
fn indexes_every_entry_under_its_headword() {
    let index = load();
    assert_eq!(index.entry_count(), 7);
    assert_eq!(index.headword_count(), 6);
    assert_eq!(index.quote_count(), 12);
    assert_eq!(
        index.headwords().collect::<Vec<_>>(),
        vec!["agent", "cabin", "marvellous", "pail", "saddle", "yesty"]
    );
    assert_eq!(index.entries_for("Pail").count(), 2);
    assert!(!index.contains_word("teiheader"));
}

#[test]
fn definitions_and_quotes_are_normalized() {
    let index = load();
    let agent = index.entry_by_key("Agent").expect("agent entry");
    assert_eq!(agent.headword(), "Agent");

    let definitions = agent.definitions();
    assert_eq!(definitions.len(), 2);
    assert_eq!(definitions[0].text(), "one who acts for another, a deputy");
    assert_eq!(definitions[1].text(), "that which acts, a doer");

    let first = definitions[0].quotes().quotes();
    assert_eq!(first[0].text(), "\"the agent for his master\"");
    assert_eq!(first[0].locations()[0].to_string(), "Antony and Cleopatra: II. 1. 35");
}

#[test]
fn bare_citations_extend_the_previous_quote() {
    let index = load();
    let agent = index.entry_by_key("agent").expect("agent entry");
    let quotes = agent.definitions()[1].quotes().quotes();
    assert_eq!(quotes.len(), 2);

    assert_eq!(quotes[0].text(), "\"night's black agents to their preys do rouse\"");
    let plays: Vec<Play> = quotes[0].locations().iter().map(|l| l.play).collect();
    assert_eq!(plays, vec![Play::Macbeth, Play::KingLear]);

    // the connective before the bare citation carries over to the next quote
    assert_eq!(quotes[1].text(), "also \"the agent of our cause\"");
    assert_eq!(quotes[1].locations()[0].play, Play::Henry4Part1);
}

#[test]
fn leading_bare_citation_becomes_a_textless_quote() {
    let index = load();
    let cabin = index.entry_by_key("cabin").expect("cabin entry");
    let first = cabin.definitions()[0].quotes().quotes();
    assert_eq!(first[0].text(), "\"make the cabin ready\"");
    assert!(first[1].text().starts_with("compare \"in my sea-gown"));

    let second = cabin.definitions()[1].quotes().quotes();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].text(), "");
    assert_eq!(second[0].locations().len(), 2);
    assert_eq!(second[0].locations()[0].play, Play::TitusAndronicus);
}

#[test]
fn word_search_is_case_insensitive() {
    let index = load();
    let hits = search(&index, &SearchQuery::word("SADDLE")).expect("saddle found");
    assert_eq!(hits.entry_count(), 1);
    assert_eq!(hits.quote_count(), 2);
    assert!(search(&index, &SearchQuery::word("unknown")).is_none());
}

#[test]
fn play_filter_prunes_down_to_matching_citations() {
    let index = load();
    let hits = search(&index, &SearchQuery::word("agent").in_play(Play::Macbeth)).expect("hits");
    let agent = hits.entry_by_key("agent").expect("agent kept");
    assert_eq!(agent.definitions().len(), 1);
    assert_eq!(agent.definitions()[0].text(), "that which acts, a doer");

    let quotes = agent.definitions()[0].quotes().quotes();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].locations().len(), 1);
    assert_eq!(quotes[0].locations()[0].to_string(), "Macbeth: III. 2. 53");

    let all_macbeth = search(&index, &SearchQuery::play(Play::Macbeth)).expect("hits");
    assert_eq!(all_macbeth.headwords().collect::<Vec<_>>(), vec!["agent", "yesty"]);
}

#[test]
fn act_scene_and_line_narrow_a_play() {
    let index = load();

    let late = SearchQuery::play(Play::Hamlet)
        .act("5")
        .scene(2)
        .lines(Some(190), Some(200));
    let hits = search(&index, &late).expect("yesty cites Hamlet V. 2. 199");
    assert_eq!(hits.headwords().collect::<Vec<_>>(), vec!["yesty"]);

    let early = SearchQuery::play(Play::Hamlet).act("V").lines(None, Some(20));
    let hits = search(&index, &early).expect("cabin cites Hamlet V. 2. 13");
    assert_eq!(hits.headwords().collect::<Vec<_>>(), vec!["cabin"]);

    let nothing = SearchQuery::play(Play::Hamlet).act("I");
    assert!(search(&index, &nothing).is_none());
}

#[test]
fn constraints_without_a_play_are_ignored() {
    let index = load();
    let query = SearchQuery::word("yesty").scene(99);
    let hits = search(&index, &query).expect("scene alone does not filter");
    assert_eq!(hits.quote_count(), 1);
}

#[test]
fn play_filtered_results_never_contain_empty_nodes() {
    let index = load();
    for play in Play::ALL {
        if let Some(hits) = search(&index, &SearchQuery::play(play)) {
            assert_no_empty_nodes(&hits);
        }
    }
    let hamlet = search(&index, &SearchQuery::play(Play::Hamlet)).expect("hamlet hits");
    assert!(hamlet.entry_by_key("pail2").is_none());
}

#[test]
fn word_lookup_returns_entries_whole() {
    let index = load();
    let everything = search(&index, &SearchQuery::default()).expect("non-empty lexicon");
    assert_eq!(everything.entry_count(), 7);

    let pail = search(&index, &SearchQuery::word("pail")).expect("pail found");
    assert_eq!(pail.entry_count(), 2);
    let unillustrated = pail.entry_by_key("pail2").expect("pail2 kept");
    assert_eq!(unillustrated.definitions()[0].text(), "to grow pale (?)");
    assert!(unillustrated.definitions()[0].quotes().is_empty());
}

#[test]
fn cross_reference_senses_survive_a_word_lookup() {
    let xml = doc(concat!(
        r#"<entryFree key="agent"><orth>Agent</orth>, 1) one who acts: "#,
        r#"<cit><quote>the a. for his master,</quote> <bibl>Ant. II, 1, 35</bibl></cit> "#,
        r#"<lb/>2) see Deputy.</entryFree>"#,
    ));
    let index = build_with(&xml, &plain()).expect("builds");
    let source: Vec<&str> = index
        .entry_by_key("agent")
        .expect("agent")
        .definitions()
        .iter()
        .map(|d| d.text())
        .collect();
    assert_eq!(source, vec!["one who acts", "see Deputy."]);

    let hits = search(&index, &SearchQuery::word("agent")).expect("agent found");
    assert_eq!(hits.entry_by_key("agent").expect("agent").definitions().len(), 2);

    let antony = search(&index, &SearchQuery::word("agent").in_play(Play::AntonyAndCleopatra))
        .expect("cited in Antony");
    assert_eq!(antony.entry_by_key("agent").expect("agent").definitions().len(), 1);
}

#[test]
fn filtering_twice_changes_nothing() {
    let index = load();
    let before = index.clone();
    let query = SearchQuery::play(Play::Tempest);
    let once = search(&index, &query).expect("tempest hits");
    let twice = search(&once, &query).expect("still there");
    assert_eq!(once, twice);
    assert_eq!(index, before);
}

#[test]
fn mmap_and_owned_loads_agree() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("lexicon.xml");
    std::fs::copy(fixture_path(), &path)?;

    let mapped = LexiconIndex::load_with_mode(&path, LoadMode::Mmap, &plain())?;
    let owned = LexiconIndex::load_with_mode(&path, LoadMode::Owned, &plain())?;
    assert_eq!(mapped, owned);
    assert_eq!(mapped.entry_count(), 7);
    Ok(())
}

#[test]
fn ansi_is_the_default_emphasis() -> anyhow::Result<()> {
    let index = LexiconIndex::load(fixture_path())?;
    let yesty = index.entry_by_key("yesty").expect("yesty entry");
    let text = yesty.definitions()[0].quotes().quotes()[0].text();
    assert!(text.contains("\x1b[1;35myesty\x1b[0m"));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = LexiconIndex::load(dir.path().join("absent.xml")).unwrap_err();
    assert!(matches!(err, LexiconError::Io(_)));
}

#[test]
fn unknown_abbreviation_names_the_entry() {
    let xml = doc(concat!(
        r#"<entryFree key="odd"><orth>Odd,</orth> strange: "#,
        r#"<cit><quote>an o. thing</quote> <bibl>III, 1, 2</bibl></cit></entryFree>"#,
    ));
    let err = build(&xml).unwrap_err();
    match err {
        LexiconError::Location { key, source } => {
            assert_eq!(key, "odd");
            assert!(matches!(
                source,
                LocationError::UnknownAbbreviation { ref abbreviation, .. } if abbreviation == "III"
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_citation_is_rejected() {
    let xml = doc(r#"<entryFree key="odd"><orth>Odd,</orth> <bibl>Mcb.</bibl></entryFree>"#);
    let err = build(&xml).unwrap_err();
    assert!(matches!(
        err.location_error(),
        Some(LocationError::MalformedLocation { .. })
    ));
}

#[test]
fn citation_outside_an_entry_is_orphaned() {
    let xml = doc(concat!(
        r#"<entryFree key="odd"><orth>Odd,</orth></entryFree>"#,
        r#"<cit><quote>stray</quote><bibl>Mcb. I, 1, 1</bibl></cit>"#,
    ));
    let err = build_with(&xml, &plain()).unwrap_err();
    assert!(matches!(
        err,
        LexiconError::OrphanedContent {
            kind: "quotation",
            ..
        }
    ));
}

#[test]
fn broken_markup_is_a_source_format_error() {
    assert!(matches!(
        build("<TEI.2><text><body><div1>"),
        Err(LexiconError::SourceFormat(_))
    ));
    assert!(matches!(build("just prose"), Err(LexiconError::SourceFormat(_))));
}

#[test]
fn rendering_lists_only_what_survived() {
    let index = load();
    let hits = search(&index, &SearchQuery::word("yesty")).expect("yesty");
    assert_eq!(
        hits.render(Emphasis::Plain),
        concat!(
            "Yesty\n",
            "1) foaming\n",
            "    \"though the yesty waves confound and swallow navigation up\"\n",
            "        Macbeth: IV. 1. 53\n",
            "        Hamlet: V. 2. 199\n",
        )
    );
}
