//! Artifact property tests: store and expansion invariants across varied
//! inputs.
//!
//! Tests verify:
//! - `get(put(c, s))` returns exactly `c` and `s`
//! - Identical puts never share an id
//! - Unknown ids are a miss, never a panic
//! - Expansion is a no-op without tags
//! - Valid and unknown tags in one text are handled independently
//! - Expansion is single-pass and order preserving

use coordination::artifact::{
    expand, expand_references, scan, ArtifactId, ArtifactStore, ReferenceTag,
};
use coordination::events::{AnswerObserver, ArtifactMiddleware, FinalAnswerEvent};

fn sample_contents() -> Vec<String> {
    vec![
        String::new(),
        "short".to_string(),
        "multi\nline\n\ncontent with ~~~ fences ~~~".to_string(),
        "unicode: héllo wörld — ✓".to_string(),
        "x".repeat(64 * 1024),
        "contains a tag <artifact id=\"nested_1\" /> inside".to_string(),
        "quotes \" and <angle> brackets & ampersands".to_string(),
    ]
}

// ── Property: round trip ───────────────────────────────────────────

#[test]
fn prop_round_trip_preserves_content_and_summary() {
    let store = ArtifactStore::new();
    for (i, content) in sample_contents().into_iter().enumerate() {
        let summary = format!("summary {i}");
        let id = store.put(content.clone(), summary.clone());
        let artifact = store.get(&id).expect("just stored");
        assert_eq!(artifact.content, content);
        assert_eq!(artifact.summary, summary);
    }
}

// ── Property: no implicit deduplication ────────────────────────────

#[test]
fn prop_identical_puts_yield_distinct_ids() {
    let store = ArtifactStore::new();
    for content in sample_contents() {
        let a = store.put(content.clone(), "s");
        let b = store.put(content, "s");
        assert_ne!(a, b);
    }
}

// ── Property: unknown ids are a miss ───────────────────────────────

#[test]
fn prop_unknown_ids_are_not_found() {
    let store = ArtifactStore::new();
    let issued: Vec<ArtifactId> = (0..20).map(|i| store.put(format!("{i}"), "s")).collect();
    for candidate in ["art_ffffffff", "draft_k3x9", "", "art_", "ART_00000000"] {
        let id = ArtifactId::new(candidate);
        if !issued.contains(&id) {
            assert!(store.get(&id).is_none(), "unexpected hit for {candidate:?}");
            assert!(store.fetch(&id).is_err());
        }
    }
}

// ── Property: expansion without tags is identity ───────────────────

#[test]
fn prop_expansion_without_tags_is_identity() {
    let store = ArtifactStore::new();
    store.put("content", "summary");
    for text in [
        "",
        "plain answer",
        "markdown ~~~\ncode\n~~~",
        "<div>html</div>",
        "<artifact id=\"broken\"",
        "artifact id=\"a1\" />",
    ] {
        assert_eq!(expand(text, &store), text);
    }
}

// ── Property: valid and unknown tags are independent ───────────────

#[test]
fn prop_valid_and_unknown_tags_independent() {
    let store = ArtifactStore::new();
    let valid = store.put("VALID CONTENT", "valid");
    let valid_tag = ReferenceTag::new(valid.clone()).render();
    let unknown_tag = ReferenceTag::new(ArtifactId::new("art_deadbeef"))
        .with_summary("stale")
        .render();

    for text in [
        format!("{valid_tag} {unknown_tag}"),
        format!("{unknown_tag} {valid_tag}"),
        format!("before {valid_tag} middle {unknown_tag} after"),
    ] {
        let expansion = expand_references(&text, &store);
        assert!(expansion.text.contains("VALID CONTENT"));
        assert!(expansion.text.contains(&unknown_tag));
        assert!(!expansion.text.contains(&valid_tag));
        assert_eq!(expansion.report.expanded, vec![valid.clone()]);
        assert_eq!(expansion.report.unresolved.len(), 1);
    }
}

// ── Property: single pass, order preserving ────────────────────────

#[test]
fn prop_expansion_preserves_order_and_single_pass() {
    let store = ArtifactStore::new();
    let ids: Vec<ArtifactId> = (0..10).map(|i| store.put(format!("<{i}>"), "n")).collect();
    let text: String = ids
        .iter()
        .map(|id| ReferenceTag::new(id.clone()).render())
        .collect::<Vec<_>>()
        .join(",");

    let expanded = expand(&text, &store);
    let expected: Vec<String> = (0..10).map(|i| format!("<{i}>")).collect();
    assert_eq!(expanded, expected.join(","));
    assert!(scan(&expanded).is_empty());
}

#[test]
fn prop_nested_tags_survive_one_expansion() {
    let store = ArtifactStore::new();
    let inner = store.put("INNER", "inner");
    let outer = store.put(
        format!("wrapper {}", ReferenceTag::new(inner.clone()).render()),
        "outer",
    );

    let once = expand(&ReferenceTag::new(outer).render(), &store);
    assert_eq!(scan(&once).len(), 1);
    assert_eq!(scan(&once)[0].tag.id, inner);

    // A second, explicit pass resolves the next level.
    assert_eq!(expand(&once, &store), "wrapper INNER");
}

// ── Scenario: draft shown to the user ──────────────────────────────

#[test]
fn scenario_bug_draft_expanded_in_final_answer() {
    let store = ArtifactStore::new().shared();
    let id = store.put("Fix the crash in login.", "bug draft");

    let middleware = ArtifactMiddleware::new(store);
    let mut event = FinalAnswerEvent::new(format!("Here is the draft: <artifact id=\"{id}\" />"));
    middleware.on_final_answer(&mut event);

    assert_eq!(event.text, "Here is the draft: Fix the crash in login.");
}

#[test]
fn report_serializes_for_logging() {
    let store = ArtifactStore::new();
    let id = store.put("c", "s");
    let expansion = expand_references(&format!("<artifact id=\"{id}\" /> <artifact x"), &store);
    let json = serde_json::to_value(&expansion.report).unwrap();
    assert_eq!(json["expanded"][0], id.as_str());
    assert_eq!(json["malformed"], 1);
}
