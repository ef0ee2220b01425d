//! Every traversal mode and repeated runs must agree exactly.

use listmatch::{
    read_listings, read_products, run_pipeline, write_results, MatchConfig, MatchOutcome,
    PolicyKind, Traversal,
};

fn products() -> String {
    let mut lines = Vec::new();
    for (manufacturer, family) in [("Canon", "PowerShot"), ("Nikon", "Coolpix"), ("Sony", "Alpha")] {
        for n in 0..40 {
            lines.push(format!(
                r#"{{"product_name":"{manufacturer}_{n}","manufacturer":"{manufacturer}","family":"{family}","model":"X{n}"}}"#
            ));
            lines.push(format!(
                r#"{{"product_name":"{manufacturer}_{n}_Pro","manufacturer":"{manufacturer}","model":"X{n} Pro"}}"#
            ));
        }
    }
    lines.join("\n")
}

fn listings() -> String {
    let manufacturers = ["Canon", "Nikon", "Sony", "Olympus"];
    let mut lines = Vec::new();
    for i in 0..300 {
        let manufacturer = manufacturers[i % manufacturers.len()];
        let n = (i * 7) % 45;
        let family = match manufacturer {
            "Canon" => "PowerShot",
            "Nikon" => "Coolpix",
            _ => "Alpha",
        };
        let title = match i % 5 {
            0 => format!("{manufacturer} {family} X{n} camera"),
            1 => format!("{manufacturer} X{n} Pro kit"),
            2 => format!("{family} X{n} Pro by {manufacturer}"),
            3 => format!("{manufacturer} {family} X{n} Pro"),
            _ => format!("{manufacturer} X{n} X{} bundle", n + 1),
        };
        lines.push(serde_json::json!({"title": title, "manufacturer": manufacturer}).to_string());
    }
    lines.join("\n")
}

fn run(config: &MatchConfig) -> MatchOutcome {
    let products = read_products(products().as_bytes()).unwrap();
    let listings = read_listings(listings().as_bytes()).unwrap();
    run_pipeline(products, listings, config).unwrap()
}

fn results_text(outcome: &MatchOutcome) -> String {
    let mut buf = Vec::new();
    write_results(outcome, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn repeated_runs_are_identical() {
    for policy in [PolicyKind::Loose, PolicyKind::Tight] {
        let config = MatchConfig::with_policy(policy);
        let first = run(&config);
        let second = run(&config);
        assert_eq!(first.slots(), second.slots());
        assert_eq!(results_text(&first), results_text(&second));
    }
}

#[test]
fn traversal_modes_agree() {
    for policy in [PolicyKind::Loose, PolicyKind::Tight] {
        let base = run(&MatchConfig::with_policy(policy));
        let variants = [
            MatchConfig {
                parallel: true,
                ..MatchConfig::with_policy(policy)
            },
            MatchConfig {
                traversal: Traversal::ListingMajor,
                ..MatchConfig::with_policy(policy)
            },
            MatchConfig {
                use_index: false,
                ..MatchConfig::with_policy(policy)
            },
        ];
        for config in &variants {
            let other = run(config);
            assert_eq!(base.slots(), other.slots(), "{config:?}");
            assert_eq!(
                base.summary().candidate_counts,
                other.summary().candidate_counts
            );
            assert_eq!(results_text(&base), results_text(&other));
        }
        assert!(base.summary().matched > 0);
    }
}

#[test]
fn tight_resolves_no_more_than_loose_accepts() {
    let loose = run(&MatchConfig::with_policy(PolicyKind::Loose));
    let tight = run(&MatchConfig::with_policy(PolicyKind::Tight));
    for (l, t) in loose.slots().iter().zip(tight.slots()) {
        assert!(t.candidates.iter().all(|c| l.candidates.contains(c)));
    }
}
