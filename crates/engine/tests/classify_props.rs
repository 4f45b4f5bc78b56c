// Property tests for the caret classifier.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use querypad_engine::{classify, CompletionContext, CompletionEngine, DocumentMode, DomainSnapshot, CHART_KINDS};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn arb_mode() -> impl Strategy<Value = DocumentMode> {
    prop_oneof![
        Just(DocumentMode::Markup),
        Just(DocumentMode::Query),
        Just(DocumentMode::Unknown),
    ]
}

/// Text biased toward the trigger fragments so the interesting branches run.
fn arb_text() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("`".to_string()),
        Just("\n".to_string()),
        Just(" ".to_string()),
        Just("type='".to_string()),
        Just("server=\"".to_string()),
        Just(" FROM ".to_string()),
        Just("from ".to_string()),
        r"[a-zA-Zé日 ]{0,6}",
    ];
    prop::collection::vec(fragment, 0..12).prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn classify_is_idempotent(text in arb_text(), caret in 0usize..80, mode in arb_mode()) {
        prop_assert_eq!(classify(&text, caret, mode), classify(&text, caret, mode));
    }

    #[test]
    fn unknown_mode_never_triggers(text in arb_text(), caret in 0usize..80) {
        prop_assert_eq!(classify(&text, caret, DocumentMode::Unknown), CompletionContext::None);
    }

    #[test]
    fn caret_past_end_matches_end(text in arb_text(), extra in 0usize..20, mode in arb_mode()) {
        let len = text.chars().count();
        prop_assert_eq!(classify(&text, len + extra, mode), classify(&text, len, mode));
    }

    #[test]
    fn query_mode_only_offers_tables(text in arb_text(), caret in 0usize..80) {
        let context = classify(&text, caret, DocumentMode::Query);
        prop_assert!(matches!(context, CompletionContext::TableAfterFrom | CompletionContext::None));
    }
}

#[test]
fn end_to_end_tables_after_from() {
    let engine = CompletionEngine::default();
    let domain = DomainSnapshot::new().with_tables(["trades", "quotes"]);
    for text in ["SELECT * FROM ", "select * from "] {
        let result = engine.complete(text, text.len(), DocumentMode::Query, Some(&domain));
        let inserts: Vec<_> = result.candidates.iter().map(|c| c.insertion_text.as_str()).collect();
        assert_eq!(inserts, vec!["trades", "quotes"]);
    }
}

#[test]
fn end_to_end_chart_types_strip_prefix() {
    let engine = CompletionEngine::default();
    let text = "# Prices\n```sql type='";
    let result = engine.complete(text, text.chars().count(), DocumentMode::Markup, Some(&DomainSnapshot::new()));

    assert_eq!(result.context, CompletionContext::ChartTypeAttribute { prefix: "type='".into() });
    let expected: Vec<String> = CHART_KINDS
        .iter()
        .map(|k| format!("type='{}'", k.token)["type='".len()..].to_string())
        .collect();
    let actual: Vec<String> = result.candidates.into_iter().map(|c| c.insertion_text).collect();
    assert_eq!(actual, expected);
}
