//! Integration tests against the public `Engine` API.

use std::collections::BTreeSet;
use std::sync::Arc;

use textsearch::{Config, Engine, SearchError, SourceInput};

fn engine_with(entries: &[(&str, &str)]) -> Engine {
    let engine = Engine::new(Config::default());
    for (name, content) in entries {
        engine
            .add_source(name, SourceInput::Bytes(Arc::from(content.as_bytes())))
            .unwrap();
    }
    engine
}

fn offsets(n: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
    n.into_iter().collect()
}

#[test]
fn s1_scenarios() {
    let text = "test1, more2 testing3, test1-again5;end6";
    let engine = engine_with(&[("testFile", text)]);

    assert_eq!(
        engine.search("g3, test1-again5").unwrap()["testFile"],
        offsets([19])
    );
    assert_eq!(engine.search(text).unwrap()["testFile"], offsets([0]));
    assert_eq!(
        engine.search(", more2 testing3, test1-again5;end6").unwrap()["testFile"],
        offsets([5])
    );
    assert_eq!(
        engine.search("test1").unwrap()["testFile"],
        offsets([0, 23])
    );
    assert_eq!(
        engine.search("test1-again5;end6").unwrap()["testFile"],
        offsets([23])
    );
    assert_eq!(engine.search("end6").unwrap()["testFile"], offsets([36]));
    assert!(engine.search("th").unwrap().is_empty());
}

#[test]
fn s2_hash_collision_scenarios() {
    // "Ea" and "FB" collide under the Java 31x string hash.
    let text = "t 1 FB val1 and t 1 Ea val2 filler words to pad this out";
    let engine = engine_with(&[("test3", text)]);

    assert_eq!(
        engine.search("t 1 FB val1").unwrap()["test3"],
        offsets([0])
    );
    assert!(engine.search("t 1 Ea val1").unwrap().is_empty());
    assert!(engine.search("t 1 FB val2").unwrap().is_empty());
}

#[test]
fn s4_all_interior_words_miss_index() {
    let engine = engine_with(&[("corpus", "some ordinary words inside a corpus of plain text")]);
    assert!(engine
        .search("lalala noanychance tomatch")
        .unwrap()
        .is_empty());
}

#[test]
fn s5_duplicate_and_empty_source_errors() {
    let engine = engine_with(&[("dup", "some content")]);

    let err = engine.add_source("dup", SourceInput::Bytes(Arc::from(&b"other"[..])));
    assert!(matches!(err, Err(SearchError::DuplicateSource(name)) if name == "dup"));

    let err = engine.add_source("empty", SourceInput::Bytes(Arc::from(&b""[..])));
    assert!(matches!(err, Err(SearchError::EmptySource(name)) if name == "empty"));
}

#[test]
fn s6_multi_source_list_names() {
    let engine = engine_with(&[
        ("testFile1", "alpha beta gamma"),
        ("testFile2", "delta epsilon zeta"),
    ]);
    assert_eq!(
        engine.list_names(),
        BTreeSet::from(["testFile1".to_string(), "testFile2".to_string()])
    );
}

#[test]
fn p1_correctness_vs_naive_scan() {
    let text = "the quick brown fox jumps over the lazy dog the quick brown fox";
    let engine = engine_with(&[("s", text)]);

    let queries = ["the quick brown", "fox jumps over", "lazy dog the", "zzz not there"];
    for q in queries {
        let got = engine.search(q).unwrap();
        let expected: BTreeSet<usize> = naive_scan(text, q);
        if expected.is_empty() {
            assert!(!got.contains_key("s"));
        } else {
            assert_eq!(got["s"], expected, "mismatch for query {q:?}");
        }
    }
}

fn naive_scan(text: &str, pattern: &str) -> BTreeSet<usize> {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    let mut out = BTreeSet::new();
    if pattern.is_empty() || pattern.len() > text.len() {
        return out;
    }
    for i in 0..=(text.len() - pattern.len()) {
        if text[i..i + pattern.len()] == pattern[..] {
            out.insert(i);
        }
    }
    out
}

#[test]
fn p2_short_query_returns_empty_map() {
    let engine = engine_with(&[("s", "hello world")]);
    assert!(engine.search("he").unwrap().is_empty());
    assert!(engine.search("").unwrap().is_empty());
}

#[test]
fn p4_policy_independence_matrix() {
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    for load_limit in [0u64, 1000, 10_000_000] {
        for index_limit in [0u64, 1000, 10_000_000] {
            let config = Config::new(load_limit, index_limit, true);
            let engine = Engine::new(config);
            engine
                .add_source("s", SourceInput::Bytes(Arc::from(text.as_bytes())))
                .unwrap();
            let result = engine.search("delta epsilon zeta").unwrap();
            assert_eq!(result["s"], offsets([17]), "load={load_limit} index={index_limit}");
        }
    }
}

#[test]
fn p5_idempotent_repeated_search() {
    let engine = engine_with(&[("s", "alpha beta gamma delta epsilon")]);
    let first = engine.search("gamma delta epsilon").unwrap();
    let second = engine.search("gamma delta epsilon").unwrap();
    assert_eq!(first, second);
}

#[test]
fn p6_cache_invalidated_on_new_source() {
    let engine = engine_with(&[("a", "alpha beta gamma delta")]);
    let before = engine.search("beta gamma delta").unwrap();
    assert!(before.contains_key("a"));
    assert!(!before.contains_key("b"));

    engine
        .add_source("b", SourceInput::Bytes(Arc::from(b"beta gamma delta".as_slice())))
        .unwrap();
    let after = engine.search("beta gamma delta").unwrap();
    assert!(after.contains_key("b"));
}

#[test]
fn p7_monotonic_registration() {
    let engine = engine_with(&[("a", "hello")]);
    assert!(engine.add_source("a", SourceInput::Bytes(Arc::from(b"world".as_slice()))).is_err());
    assert_eq!(engine.list_names(), BTreeSet::from(["a".to_string()]));
}

#[test]
fn large_synthetic_corpus_exercises_indexed_pivot_selection() {
    // Equivalent-shape substitute for the war_and_peace.txt scenario: a
    // multi-thousand-word corpus where the query's interior words are rare,
    // forcing pivot selection to actually narrow the candidate set.
    let mut corpus = String::new();
    for i in 0..4000 {
        corpus.push_str(&format!("common{} filler{} text{} ", i % 7, i % 11, i % 13));
    }
    corpus.push_str("zephyrquartz moonlitharbor tessellated");

    let engine = engine_with(&[("big", &corpus)]);
    let result = engine.search("zephyrquartz moonlitharbor tessellated").unwrap();
    let expected_start = corpus.chars().count() - "zephyrquartz moonlitharbor tessellated".chars().count();
    assert_eq!(result["big"], offsets([expected_start]));
}

#[test]
fn get_slice_clamps_and_unknown_source_is_none() {
    let engine = engine_with(&[("s", "hello world")]);
    assert_eq!(engine.get_slice("s", 6, 100).unwrap(), "world");
    assert_eq!(engine.get_slice("s", 100, 5).unwrap(), "");
    assert!(engine.get_slice("missing", 0, 1).is_none());
}

#[test]
fn get_source_returns_raw_bytes_for_registered_source() {
    use std::io::Read;
    let engine = engine_with(&[("s", "hello world")]);
    let mut buf = String::new();
    engine.get_source("s").unwrap().read_to_string(&mut buf).unwrap();
    assert_eq!(buf, "hello world");
    assert!(engine.get_source("missing").is_none());
}

#[test]
fn reclaim_rematerializes_identical_results() {
    let engine = engine_with(&[("s", "alpha beta gamma delta epsilon")]);
    let before = engine.search("gamma delta epsilon").unwrap();
    engine.reclaim();
    let after = engine.search("gamma delta epsilon").unwrap();
    assert_eq!(before, after);
}

#[test]
fn non_indexable_source_still_searchable_via_full_scan() {
    let config = Config::new(10_000_000, 0, true);
    let engine = Engine::new(config);
    engine
        .add_source("s", SourceInput::Bytes(Arc::from(b"alpha beta gamma delta".as_slice())))
        .unwrap();
    let result = engine.search("beta gamma delta").unwrap();
    assert_eq!(result["s"], offsets([6]));
}

#[test]
fn cache_disabled_still_returns_correct_results() {
    let config = Config::new(10_000_000, 10_000_000, false);
    let engine = Engine::new(config);
    engine
        .add_source("s", SourceInput::Bytes(Arc::from(b"alpha beta gamma delta".as_slice())))
        .unwrap();
    assert_eq!(
        engine.search("beta gamma delta").unwrap()["s"],
        offsets([6])
    );
}
