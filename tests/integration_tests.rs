use bibfolio::check::{self, ProblemKind};
use bibfolio::{Database, EntryType, Value};
use pretty_assertions::assert_eq;

#[test]
fn parses_the_papers_file() {
    let input = include_str!("fixtures/papers.bib");
    let db = Database::parse(input).unwrap();

    assert_eq!(db.entries().len(), 6);

    let keys: Vec<_> = db.entries().iter().map(bibfolio::Entry::key).collect();
    assert_eq!(
        keys,
        vec![
            "dossgollin2024flood",
            "lu2023variability",
            "dossgollin2023egu",
            "doe2025storm",
            "vandenberg2024levee",
            "dossgollin2020thesis",
        ]
    );

    let flood = &db.entries()[0];
    assert_eq!(flood.entry_type(), &EntryType::Article);
    assert_eq!(
        flood.get("author"),
        Some("Doss-Gollin, James and Keller, Klaus")
    );
    assert_eq!(flood.get("doi"), Some("10.1029/2023WR036000"));
    assert_eq!(flood.get("open"), Some("true"));

    // Bare numbers come back through get_text, not get
    let lu = &db.entries()[1];
    assert_eq!(lu.get("year"), None);
    assert_eq!(lu.get_text("year"), Some("2023".to_string()));

    let preprint = &db.entries()[4];
    assert!(matches!(preprint.entry_type(), EntryType::Custom(_)));
}

#[test]
fn library_file_expands_strings_and_months() {
    let input = include_str!("fixtures/library.bib");
    let db = Database::parse(input).unwrap();

    assert_eq!(db.entries().len(), 4);
    assert_eq!(db.strings().len(), 1);
    assert_eq!(db.preambles().len(), 1);
    assert_eq!(db.comments().len(), 1);

    let lorenz = db.find_by_key("lorenz1963deterministic").unwrap();
    assert_eq!(
        lorenz.get("journal"),
        Some("Journal of the Atmospheric Sciences")
    );

    let thesis = db.find_by_key("doe2019thesis").unwrap();
    assert_eq!(thesis.get("month"), Some("May"));
}

#[test]
fn expansion_can_stay_disabled() {
    let input = include_str!("fixtures/library.bib");
    let db = Database::parser()
        .expand_strings(false)
        .parse(input)
        .unwrap();

    let lorenz = db.find_by_key("lorenz1963deterministic").unwrap();
    assert_eq!(lorenz.field("journal").unwrap().value, Value::variable("ams"));

    let thesis = db.find_by_key("doe2019thesis").unwrap();
    assert_eq!(thesis.field("month").unwrap().value, Value::variable("may"));
}

#[test]
fn round_trip_preserves_content() {
    let input = include_str!("fixtures/papers.bib");
    let db = Database::parse(input).unwrap();

    let output = bibfolio::to_string(&db).unwrap();
    let reparsed = Database::parse(&output).unwrap();

    assert_eq!(db.entries().len(), reparsed.entries().len());
    for (before, after) in db.entries().iter().zip(reparsed.entries()) {
        assert_eq!(before.key(), after.key());
        assert_eq!(before.get_text("title"), after.get_text("title"));
        assert_eq!(before.get_text("author"), after.get_text("author"));
    }
}

#[test]
fn malformed_files_report_position() {
    let input = include_str!("fixtures/malformed.bib");
    let result = Database::parse(input);

    let err = result.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Parse error"));
    assert!(message.contains("line 3"));
    assert!(message.contains("column 1"));
}

#[test]
fn entry_types_are_case_insensitive() {
    let input = r#"
        @ARTICLE{test1, title = "Test 1"}
        @Article{test2, title = "Test 2"}
        @ArTiClE{test3, title = "Test 3"}
    "#;

    let db = Database::parse(input).unwrap();
    assert_eq!(db.entries().len(), 3);

    for entry in db.entries() {
        assert_eq!(entry.entry_type(), &EntryType::Article);
    }
}

#[test]
fn find_helpers_locate_entries() {
    let input = include_str!("fixtures/papers.bib");
    let db = Database::parse(input).unwrap();

    assert_eq!(db.find_by_type("article").len(), 2);
    assert_eq!(db.find_by_type("inproceedings").len(), 1);
    assert_eq!(db.find_by_type("online").len(), 1);

    let with_keller = db.find_by_field("author", "Keller");
    assert_eq!(with_keller.len(), 1);
    assert_eq!(with_keller[0].key(), "dossgollin2024flood");

    assert!(db.find_by_key("doe2025storm").is_some());
    assert!(db.find_by_key("nope").is_none());
}

#[test]
fn checking_the_fixture_files() {
    let papers = check::check_str(include_str!("fixtures/papers.bib"));
    assert!(papers.is_clean(), "unexpected problems: {papers}");
    assert_eq!(papers.entries_checked, 6);

    let library = check::check_str(include_str!("fixtures/library.bib"));
    assert!(library.is_clean(), "unexpected problems: {library}");

    let broken = check::check_str(include_str!("fixtures/malformed.bib"));
    assert!(broken.has_errors());
    assert!(matches!(
        broken.problems[0].kind,
        ProblemKind::Syntax { line: 3, column: 1, .. }
    ));
}
