use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use listmatch::{tokenize, Listing, MatchConfig, Matcher, PolicyKind, Product};
use matcher::ListingIndex;

fn catalog(size: usize) -> Vec<Product> {
    let brands = ["Canon", "Nikon", "Sony", "Fujifilm", "Panasonic"];
    (0..size)
        .map(|i| {
            let brand = brands[i % brands.len()];
            let family = (i % 3 != 0).then(|| format!("Series{}", i % 7));
            Product::new(format!("p{i}"), brand, family.as_deref(), format!("M-{i}"))
        })
        .collect()
}

fn listings(size: usize, catalog_size: usize) -> Vec<Listing> {
    let brands = ["Canon", "Nikon", "Sony", "Fujifilm", "Panasonic", "Olympus"];
    (0..size)
        .map(|i| {
            let brand = brands[i % brands.len()];
            let model = (i * 31) % (catalog_size + catalog_size / 4);
            Listing::new(
                format!("l{i}"),
                brand,
                format!("{brand} Series{} M-{model} 16MP digital camera", model % 7),
            )
        })
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let title = "Canon PowerShot SX130IS 12.1 MP Digital Camera with 12x Wide Angle Optical Image Stabilized Zoom";
    c.bench_function("tokenize_title", |b| b.iter(|| tokenize(black_box(title))));
}

fn bench_index_build(c: &mut Criterion) {
    let listings = listings(20_000, 1_000);
    let mut group = c.benchmark_group("listing_index");
    group.throughput(Throughput::Elements(listings.len() as u64));
    group.bench_function("build", |b| {
        b.iter(|| ListingIndex::build(black_box(&listings)))
    });
    group.finish();
}

fn bench_match_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_run");
    group.sample_size(10);
    for (products, listing_count) in [(200, 2_000), (1_000, 20_000)] {
        let catalog = catalog(products);
        let listings = listings(listing_count, products);
        group.throughput(Throughput::Elements(listing_count as u64));
        let configs = [
            ("indexed", MatchConfig::with_policy(PolicyKind::Tight)),
            (
                "parallel",
                MatchConfig {
                    parallel: true,
                    ..MatchConfig::with_policy(PolicyKind::Tight)
                },
            ),
            (
                "scan",
                MatchConfig {
                    use_index: false,
                    ..MatchConfig::with_policy(PolicyKind::Tight)
                },
            ),
        ];
        for (name, config) in configs {
            let matcher = Matcher::new(config).expect("valid config");
            group.bench_with_input(
                BenchmarkId::new(name, format!("{products}x{listing_count}")),
                &(catalog.clone(), listings.clone()),
                |b, (catalog, listings)| b.iter(|| matcher.run(catalog.clone(), listings.clone())),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_index_build, bench_match_run);
criterion_main!(benches);
