//! Integration tests for the topic routing catalog.
//!
//! Exercises the full load path over in-memory and on-disk providers,
//! including concurrent first access.

use std::sync::Arc;
use std::thread;

use corpus_kernel::catalog::{
    CORE_TIERS_RESOURCE, DEPARTMENT_LIST_RESOURCE, ROLE_MAP_RESOURCE, TOPIC_BLOB_RESOURCE,
    TOPIC_INDEX_RESOURCE,
};
use corpus_kernel::{
    DirResources, InMemoryResources, ResourceProvider, TopicIndexEntry, TopicRoutingCatalog,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

const TOPIC_TEXTS: &[&str] = &[
    "Invoice discrepancy on the Harmon account",
    "Quarterly headcount planning",
    "Security badge rollout",
];

fn build_topic_files() -> (Vec<u8>, Vec<u8>) {
    let mut index = Vec::new();
    let mut blob = Vec::new();
    for text in TOPIC_TEXTS {
        let entry = TopicIndexEntry {
            offset: blob.len() as u64,
            length: text.len() as u32,
        };
        index.extend_from_slice(&entry.encode());
        blob.extend_from_slice(text.as_bytes());
    }
    (index, blob)
}

fn fixture() -> InMemoryResources {
    let (index, blob) = build_topic_files();
    InMemoryResources::new()
        .with_str(
            CORE_TIERS_RESOURCE,
            r#"{
                "send": {"internal": [0, 1], "external": [2], "both": []},
                "receive": {"internal": [0, 1], "external": [], "both": [2]}
            }"#,
        )
        .with_str(
            ROLE_MAP_RESOURCE,
            r#"[
                {"department": "Finance", "role": "Analyst", "file_id": "fin_analyst"},
                {"department": "Finance", "role": "Controller", "file_id": "fin_controller"},
                {"department": "People Ops", "role": "Recruiter", "file_id": "pops_recruiter"}
            ]"#,
        )
        .with_str(
            DEPARTMENT_LIST_RESOURCE,
            r#"[
                {"department": "Finance", "slug": "finance"},
                {"department": "People Ops", "slug": "people-ops"}
            ]"#,
        )
        .with(TOPIC_INDEX_RESOURCE, index)
        .with(TOPIC_BLOB_RESOURCE, blob)
        .with_str(
            "routing/dept_finance.json",
            r#"{"send": {"both": [0]}, "receive": {"both": [0, 1]}}"#,
        )
        .with_str(
            "routing/role_fin_analyst.json",
            r#"{"send": {"internal": [0]}, "receive": {"internal": [0]}}"#,
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// FULL LOAD PATH
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_end_to_end_routing_walk() {
    let catalog = TopicRoutingCatalog::new(fixture());

    // Role → file id → role routing → topic text, the orchestration path.
    let file_id = catalog
        .role_file_id("finance", "analyst")
        .unwrap()
        .expect("role is mapped");
    let tier = catalog
        .role_routing(&file_id)
        .unwrap()
        .expect("companion document present");
    let topic_id = i64::from(tier.send.internal[0]);
    let text = catalog.topic_text(topic_id).unwrap().expect("topic present");
    assert_eq!(text, TOPIC_TEXTS[0]);

    // Department → slug → department routing.
    let slug = catalog
        .department_slug("People Ops")
        .unwrap()
        .expect("department is mapped");
    assert_eq!(slug, "people-ops");
    // No companion document for people-ops: a soft miss.
    assert!(catalog.department_routing(&slug).unwrap().is_none());
}

#[test]
fn test_core_tiers_parse_to_audience_lists() {
    let catalog = TopicRoutingCatalog::new(fixture());
    let core = catalog.core_routing().unwrap();
    assert_eq!(core.send.internal, vec![0, 1]);
    assert_eq!(core.send.external, vec![2]);
    assert_eq!(core.receive.both, vec![2]);
}

#[test]
fn test_every_topic_round_trips_through_the_index() {
    let catalog = TopicRoutingCatalog::new(fixture());
    for (id, expected) in TOPIC_TEXTS.iter().enumerate() {
        let text = catalog.topic_text(id as i64).unwrap().unwrap();
        assert_eq!(&text, expected);
    }
    assert_eq!(catalog.topic_text(TOPIC_TEXTS.len() as i64).unwrap(), None);
}

#[test]
fn test_directory_provider_end_to_end() {
    let root = std::env::temp_dir().join(format!("corpus-kernel-it-{}", std::process::id()));
    std::fs::create_dir_all(root.join("routing")).unwrap();
    let memory = fixture();
    for name in memory.names().unwrap() {
        let bytes = memory.read(&name).unwrap().unwrap();
        std::fs::write(root.join(&name), bytes).unwrap();
    }

    let catalog = TopicRoutingCatalog::new(DirResources::new(&root));
    assert_eq!(
        catalog.topic_text(1).unwrap().as_deref(),
        Some(TOPIC_TEXTS[1])
    );
    assert!(catalog.role_routing("fin_analyst").unwrap().is_some());

    std::fs::remove_dir_all(&root).unwrap();
}

// ─────────────────────────────────────────────────────────────────────────────
// CONCURRENCY
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_concurrent_first_access_observes_one_instance() {
    let catalog = Arc::new(TopicRoutingCatalog::new(fixture()));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                // Every worker races the one-time load and the companion
                // caches; all must see identical answers.
                let text = catalog.topic_text(0).unwrap().unwrap();
                let tier = catalog.department_routing("finance").unwrap().unwrap();
                let file_id = catalog
                    .role_file_id("finance", "controller")
                    .unwrap()
                    .unwrap();
                (worker, text, tier.receive.both.clone(), file_id)
            })
        })
        .collect();

    for handle in handles {
        let (_, text, receive_both, file_id) = handle.join().unwrap();
        assert_eq!(text, TOPIC_TEXTS[0]);
        assert_eq!(receive_both, vec![0, 1]);
        assert_eq!(file_id, "fin_controller");
    }
}
