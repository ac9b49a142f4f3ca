use chrono::NaiveDate;
use paperlens_core::{Error, Taxonomy};
use paperlens_search::{build_query, Field, Query, Term, MAX_KEYWORDS};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn kws(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn build(keywords: &[&str], category: &str) -> paperlens_core::Result<Query> {
    build_query(&kws(keywords), category, date(2024, 1, 1), date(2024, 12, 31), Taxonomy::arxiv())
}

/// Keyword clauses are the OR nodes among the top-level conjuncts.
fn keyword_clauses(q: &Query) -> Vec<&Query> {
    q.conjuncts().into_iter().filter(|c| matches!(c, Query::Or(..))).collect()
}

#[test]
fn time_series_forecasting_in_computer_science() {
    let q = build(&["time-series", "forecasting"], "Computer Science").expect("query");
    let rendered = q.render();
    eprintln!("query: {}", rendered);

    assert!(rendered.contains(r#"(ti:"time-series" OR abs:"time-series")"#));
    assert!(rendered.contains("(ti:forecasting OR abs:forecasting)"));
    assert!(rendered.ends_with("submittedDate:[202401010000 TO 202412312359]"));

    let codes = Taxonomy::arxiv().codes_for("Computer Science").expect("cs codes");
    let parts = q.conjuncts();
    assert_eq!(parts.len(), 4);
    match parts[0] {
        Query::CategoryIn(found) => {
            assert_eq!(found.len(), codes.len());
            assert!(found.iter().all(|c| c.starts_with("cs.")));
        }
        other => panic!("expected category clause first, got {:?}", other),
    }
    let cat_clause = codes.iter().map(|c| format!("cat:{}", c)).collect::<Vec<_>>().join(" OR ");
    assert!(rendered.starts_with(&format!("({}) AND ", cat_clause)));
    assert!(matches!(parts[3], Query::DateRange { .. }));
}

#[test]
fn every_keyword_gets_its_own_title_or_abstract_clause() {
    let q = build(&["planning", "neural networks", "PDDL"], "Computer Science").expect("query");
    let clauses = keyword_clauses(&q);
    assert_eq!(clauses.len(), 3);
    for clause in clauses {
        let fields: Vec<Field> = clause
            .disjuncts()
            .into_iter()
            .map(|d| match d {
                Query::FieldMatch { field, .. } => *field,
                other => panic!("unexpected disjunct {:?}", other),
            })
            .collect();
        assert_eq!(fields, vec![Field::Title, Field::Abstract]);
    }
}

#[test]
fn phrases_are_quoted_and_bare_terms_are_not() {
    let q = build(&["neural networks", "PDDL"], "Computer Science").expect("query");
    let rendered = q.render();
    assert!(rendered.contains(r#"ti:"neural networks" OR abs:"neural networks""#));
    assert!(rendered.contains("ti:PDDL OR abs:PDDL"));
    assert_eq!(Term::from_keyword("PDDL"), Term::Word("PDDL".into()));
    assert_eq!(Term::from_keyword(" neural networks "), Term::Phrase("neural networks".into()));
}

#[test]
fn embedded_quotes_are_stripped_before_quoting() {
    let q = build(&[r#""large language" models"#, r#"agent""#], "Computer Science").expect("query");
    let rendered = q.render();
    assert!(rendered.contains(r#"ti:"large language models""#));
    assert!(rendered.contains("ti:agent OR abs:agent"));
    assert!(!rendered.contains(r#""""#));
}

#[test]
fn empty_keywords_are_ignored_before_counting() {
    let q = build(&["", "  ", "\"\"", "robotics"], "Computer Science").expect("query");
    assert_eq!(keyword_clauses(&q).len(), 1);
}

#[test]
fn thirteen_keywords_are_rejected() {
    let many: Vec<String> = (0..=MAX_KEYWORDS).map(|i| format!("kw{}", i)).collect();
    let refs: Vec<&str> = many.iter().map(String::as_str).collect();
    match build(&refs, "Computer Science") {
        Err(Error::TooManyKeywords { count, max }) => {
            assert_eq!(count, 13);
            assert_eq!(max, 12);
        }
        other => panic!("expected TooManyKeywords, got {:?}", other),
    }
}

#[test]
fn each_allowed_keyword_count_yields_that_many_clauses() {
    let many: Vec<String> = (1..=MAX_KEYWORDS).map(|i| format!("kw{}", i)).collect();
    let refs: Vec<&str> = many.iter().map(String::as_str).collect();
    for n in 1..=MAX_KEYWORDS {
        let q = build(&refs[..n], "Computer Science").unwrap_or_else(|e| panic!("{} keywords: {:?}", n, e));
        assert_eq!(keyword_clauses(&q).len(), n, "{} keywords", n);
    }
}

#[test]
fn missing_keywords_are_rejected() {
    assert!(matches!(build(&[" ", ""], "Computer Science"), Err(Error::MissingKeywords)));
    assert!(matches!(build(&[], "Computer Science"), Err(Error::MissingKeywords)));
    assert!(matches!(build(&["-", "\"...\""], "Computer Science"), Err(Error::MissingKeywords)));
}

#[test]
fn punctuation_only_keywords_do_not_produce_clauses() {
    let q = build(&["-", "robotics", "--"], "Computer Science").expect("query");
    assert_eq!(keyword_clauses(&q).len(), 1);
    assert!(!q.render().contains(r#""-""#));
}

#[test]
fn phrase_whitespace_is_collapsed() {
    let q = build(&["neural\tnetworks", "graph   \n learning"], "Computer Science").expect("query");
    let rendered = q.render();
    assert!(rendered.contains(r#"ti:"neural networks" OR abs:"neural networks""#));
    assert!(rendered.contains(r#"ti:"graph learning""#));
    assert!(!rendered.contains('\t'));
    assert!(!rendered.contains('\n'));
}

#[test]
fn unknown_category_lists_available_labels() {
    match build(&["planning"], "Astrology") {
        Err(Error::InvalidCategory { category, available }) => {
            assert_eq!(category, "Astrology");
            assert_eq!(available.len(), Taxonomy::arxiv().labels().len());
            assert!(available.iter().any(|l| l == "Computer Science"));
        }
        other => panic!("expected InvalidCategory, got {:?}", other),
    }
}

#[test]
fn category_label_is_matched_after_trimming() {
    let padded = build(&["planning"], "  Computer Science ").expect("query");
    let exact = build(&["planning"], "Computer Science").expect("query");
    assert_eq!(padded, exact);
}

#[test]
fn reversed_dates_fail_before_anything_else() {
    let err = build_query(&[], "Astrology", date(2024, 2, 1), date(2024, 1, 1), Taxonomy::arxiv())
        .expect_err("reversed range");
    assert!(matches!(err, Error::InvalidDateRange { .. }));
    assert!(err.is_validation());
}

#[test]
fn single_day_range_is_allowed() {
    let day = date(2024, 3, 15);
    let q = build_query(&kws(&["agents"]), "Statistics", day, day, Taxonomy::arxiv()).expect("query");
    assert!(q.render().ends_with("submittedDate:[202403150000 TO 202403152359]"));
}
