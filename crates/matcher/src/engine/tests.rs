use super::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::metrics::{set_match_metrics, MatchMetrics};
use crate::types::PolicyKind;

fn matcher(policy: PolicyKind) -> Matcher {
    Matcher::new(MatchConfig::with_policy(policy)).expect("valid config")
}

fn camera_catalog() -> Vec<Product> {
    vec![
        Product::new("p1", "Canon", Some("EOS"), "5D"),
        Product::new("p2", "Canon", Some("EOS"), "5D Mark II"),
        Product::new("p3", "Nikon", Some("Coolpix"), "S6100"),
        Product::new("p4", "Sony", Some("Cyber-shot"), "DSC-W310"),
        Product::new("p5", "Canon", Some("PowerShot"), "SX130 IS"),
        Product::new("p6", "Canon", None, "SX130"),
        Product::new("p7", "Panasonic", Some("Lumix"), "DMC-FZ100"),
    ]
}

fn camera_listings() -> Vec<Listing> {
    vec![
        Listing::new("l1", "Canon Inc.", "Canon EOS 5D Mark II Body"),
        Listing::new("l2", "Nikon", "Nikon Coolpix S6100 16MP Red"),
        Listing::new("l3", "Sony", "Sony Cyber-shot DSC-W310 Black"),
        Listing::new("l4", "Canon", "Canon PowerShot SX130 IS 12.1 MP"),
        Listing::new("l5", "Olympus", "Olympus Tough TG-310"),
        Listing::new("l6", "Panasonic", "Lumix DMC-FZ100 battery grip for Panasonic"),
        Listing::new("l7", "Canon", "Canon EOS 5D body only"),
    ]
}

fn ids(products: &[Product], slot: &ListingSlot) -> Vec<String> {
    slot.candidates
        .iter()
        .map(|id| products[id.0].id.clone())
        .collect()
}

#[test]
fn sole_loose_candidate_becomes_best() {
    let outcome = matcher(PolicyKind::Loose).run(
        vec![Product::new("p", "Canon", None, "EOS 5D")],
        vec![Listing::new("l", "Canon Inc.", "Canon EOS 5D Mark II Body")],
    );
    let slot = outcome.slot(ListingId(0));
    assert_eq!(slot.candidates, vec![ProductId(0)]);
    assert_eq!(slot.best_candidate, Some(ProductId(0)));
}

#[test]
fn longer_model_wins_under_tight() {
    let outcome = matcher(PolicyKind::Tight).run(
        vec![
            Product::new("short", "Canon", Some("EOS"), "5D"),
            Product::new("long", "Canon", Some("EOS"), "5D Mark II"),
        ],
        vec![Listing::new("l", "Canon", "Canon EOS 5D Mark II")],
    );
    let best = outcome.best_candidate(ListingId(0)).map(|p| p.id.as_str());
    assert_eq!(best, Some("long"));
    assert_eq!(outcome.slot(ListingId(0)).candidates.len(), 2);
}

#[test]
fn listing_without_any_model_stays_empty() {
    let outcome = matcher(PolicyKind::Loose).run(
        camera_catalog(),
        vec![Listing::new("l", "Olympus", "Olympus Tough TG-310")],
    );
    let slot = outcome.slot(ListingId(0));
    assert!(slot.candidates.is_empty());
    assert_eq!(slot.best_candidate, None);
}

#[test]
fn three_candidates_abstain_by_default() {
    let products = vec![
        Product::new("a", "Canon", None, "D10"),
        Product::new("b", "Canon", None, "D10 Pro"),
        Product::new("c", "Canon", None, "D10 Pro Max"),
    ];
    let listings = vec![Listing::new("l", "Canon", "Canon D10 Pro Max kit")];
    let outcome = matcher(PolicyKind::Tight).run(products, listings);
    let slot = outcome.slot(ListingId(0));
    assert_eq!(slot.candidates.len(), 3);
    assert_eq!(slot.best_candidate, None);
}

#[test]
fn raised_threshold_resolves_unique_dominant() {
    let products = vec![
        Product::new("a", "Canon", None, "D10"),
        Product::new("b", "Canon", None, "D10 Pro"),
        Product::new("c", "Canon", None, "D10 Pro Max"),
    ];
    let listings = vec![Listing::new("l", "Canon", "Canon D10 Pro Max kit")];
    let config = MatchConfig {
        max_candidates: 3,
        ..MatchConfig::with_policy(PolicyKind::Tight)
    };
    let outcome = Matcher::new(config).expect("valid").run(products, listings);
    let best = outcome.best_candidate(ListingId(0)).map(|p| p.id.as_str());
    assert_eq!(best, Some("c"));
}

#[test]
fn tie_between_two_candidates_abstains() {
    let products = vec![
        Product::new("a", "Canon", None, "EOS"),
        Product::new("b", "Canon", None, "5D"),
    ];
    let listings = vec![Listing::new("l", "Canon", "Canon EOS 5D")];
    let outcome = matcher(PolicyKind::Tight).run(products, listings);
    assert_eq!(outcome.slot(ListingId(0)).candidates.len(), 2);
    assert_eq!(outcome.slot(ListingId(0)).best_candidate, None);
}

#[test]
fn pair_ranking_ignores_candidate_order() {
    let products = vec![
        Product::new("short", "Canon", Some("EOS"), "5D"),
        Product::new("long", "Canon", Some("EOS"), "5D Mark II"),
    ];
    let listing = Listing::new("l", "Canon", "Canon EOS 5D Mark II");
    let policy = PolicyKind::Tight.policy();
    let forward = rank_pair(&listing, ProductId(0), ProductId(1), &products, policy);
    let backward = rank_pair(&listing, ProductId(1), ProductId(0), &products, policy);
    assert_eq!(forward, Some(ProductId(1)));
    assert_eq!(backward, Some(ProductId(1)));
}

#[test]
fn best_candidate_is_always_a_candidate() {
    for policy in [PolicyKind::Loose, PolicyKind::Tight] {
        let outcome = matcher(policy).run(camera_catalog(), camera_listings());
        for (_, _, slot) in outcome.iter() {
            match slot.best_candidate {
                Some(best) => {
                    assert!(slot.candidates.contains(&best));
                    assert!(slot.candidates.len() <= 2);
                }
                None => assert_ne!(slot.candidates.len(), 1),
            }
        }
    }
}

#[test]
fn candidates_follow_product_order() {
    let outcome = matcher(PolicyKind::Loose).run(camera_catalog(), camera_listings());
    let products = outcome.products();
    assert_eq!(ids(products, outcome.slot(ListingId(0))), vec!["p1", "p2"]);
    assert_eq!(ids(products, outcome.slot(ListingId(3))), vec!["p5", "p6"]);
    for (_, _, slot) in outcome.iter() {
        assert!(slot.candidates.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn tight_rejects_family_away_from_model() {
    let outcome = matcher(PolicyKind::Tight).run(camera_catalog(), camera_listings());
    // "Lumix DMC-FZ100" is adjacent, so the grip listing is still a candidate.
    assert_eq!(ids(outcome.products(), outcome.slot(ListingId(5))), vec!["p7"]);
    let outcome = matcher(PolicyKind::Tight).run(
        camera_catalog(),
        vec![Listing::new("l", "Panasonic", "Panasonic Lumix camera DMC-FZ100")],
    );
    assert!(outcome.slot(ListingId(0)).candidates.is_empty());
}

#[test]
fn index_and_scan_agree() {
    for policy in [PolicyKind::Loose, PolicyKind::Tight] {
        let indexed = matcher(policy).run(camera_catalog(), camera_listings());
        let config = MatchConfig {
            use_index: false,
            ..MatchConfig::with_policy(policy)
        };
        let scanned = Matcher::new(config)
            .expect("valid")
            .run(camera_catalog(), camera_listings());
        assert_eq!(indexed.slots(), scanned.slots());
    }
}

#[test]
fn tokenless_products_match_nothing_on_any_path() {
    let mut products = camera_catalog();
    products.push(Product::new("blank-model", "Canon", Some("EOS"), "--"));
    products.push(Product::new("blank-maker", "***", None, "5D"));
    let listings = camera_listings();
    let index = ListingIndex::build(&listings);
    for policy in [PolicyKind::Loose, PolicyKind::Tight] {
        for product in &products[7..] {
            let found = match_product(product, &listings, Some(&index), policy.policy());
            assert!(found.is_empty(), "{} matched under {policy}", product.id);
        }
        let indexed = matcher(policy).run(products.clone(), listings.clone());
        let scanned = Matcher::new(MatchConfig {
            use_index: false,
            ..MatchConfig::with_policy(policy)
        })
        .expect("valid")
        .run(products.clone(), listings.clone());
        assert_eq!(indexed.slots(), scanned.slots());
        for (_, _, slot) in indexed.iter() {
            assert!(slot.candidates.iter().all(|c| c.0 < 7));
        }
    }
}

#[test]
fn parallel_and_listing_major_agree_with_sequential() {
    let sequential = matcher(PolicyKind::Tight).run(camera_catalog(), camera_listings());
    let parallel = Matcher::new(MatchConfig {
        parallel: true,
        ..MatchConfig::default()
    })
    .expect("valid")
    .run(camera_catalog(), camera_listings());
    let listing_major = Matcher::new(MatchConfig {
        traversal: Traversal::ListingMajor,
        ..MatchConfig::default()
    })
    .expect("valid")
    .run(camera_catalog(), camera_listings());
    assert_eq!(sequential.slots(), parallel.slots());
    assert_eq!(sequential.slots(), listing_major.slots());
}

#[test]
fn unknown_token_short_circuits_index() {
    let listings = camera_listings();
    let index = ListingIndex::build(&listings);
    let product = Product::new("p", "Leica", None, "M9");
    assert_eq!(index.working_set(&product), None);
    let policy = PolicyKind::Loose.policy();
    assert!(match_product(&product, &listings, Some(&index), policy).is_empty());
}

#[test]
fn working_set_shrinks_to_smallest_bucket() {
    let listings = camera_listings();
    let index = ListingIndex::build(&listings);
    let product = Product::new("p", "Canon", None, "SX130");
    match index.working_set(&product) {
        Some(WorkingSet::Subset(ids)) => assert_eq!(ids, &[ListingId(3)]),
        other => panic!("unexpected working set: {other:?}"),
    }
}

#[test]
fn empty_inputs_produce_empty_outcome() {
    let outcome = matcher(PolicyKind::Tight).run(Vec::new(), camera_listings());
    assert!(outcome.slots().iter().all(|s| s.candidates.is_empty()));
    let outcome = matcher(PolicyKind::Tight).run(camera_catalog(), Vec::new());
    assert!(outcome.slots().is_empty());
    assert_eq!(outcome.summary().matched, 0);
}

#[test]
fn duplicates_are_dropped_before_matching() {
    let mut products = camera_catalog();
    products.push(Product::new("dup", "canon", Some("EOS"), "5-D"));
    let outcome = matcher(PolicyKind::Loose).run(products, camera_listings());
    assert_eq!(outcome.summary().products_in, 8);
    assert_eq!(outcome.summary().products_kept, 7);
    assert!(outcome.products().iter().all(|p| p.id != "dup"));
}

#[test]
fn zero_threshold_is_rejected() {
    let config = MatchConfig {
        max_candidates: 0,
        ..MatchConfig::default()
    };
    assert!(matches!(Matcher::new(config), Err(MatchError::InvalidConfig(_))));
}

#[derive(Default)]
struct RecordingMetrics {
    events: Mutex<Vec<(PolicyKind, usize, usize)>>,
}

impl MatchMetrics for RecordingMetrics {
    fn record_run(&self, _latency: Duration, summary: &RunSummary) {
        let mut events = self.events.lock().expect("lock");
        events.push((summary.policy, summary.listings, summary.resolved));
    }
}

#[test]
fn metrics_recorder_observes_runs() {
    let recorder = Arc::new(RecordingMetrics::default());
    set_match_metrics(Some(recorder.clone()));
    let outcome = matcher(PolicyKind::Loose).run(camera_catalog(), camera_listings());
    set_match_metrics(None);

    let events = recorder.events.lock().expect("lock");
    // Other tests may run concurrently against the global hook.
    assert!(events
        .iter()
        .any(|&(policy, listings, resolved)| policy == PolicyKind::Loose
            && listings == 7
            && resolved == outcome.summary().resolved));
}
