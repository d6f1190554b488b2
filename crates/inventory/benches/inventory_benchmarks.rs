use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::Utc;
use nexus_core::ItemId;
use nexus_inventory::{
    Category, CategoryFilter, InventoryItem, InventoryStats, ItemDraft, ItemQuery, filter_items,
};

fn build_items(n: usize) -> Vec<InventoryItem> {
    let now = Utc::now();
    (0..n)
        .map(|i| {
            let draft = ItemDraft {
                name: format!("Product {i}"),
                sku: format!("SKU-{i:05}"),
                category: Category::known()[i % Category::known().len()],
                quantity: (i % 50) as u64,
                unit_price: (i % 1_000) as f64 / 10.0,
                threshold: 10,
                description: String::new(),
            };
            InventoryItem::from_draft(ItemId::new(), &draft, now).expect("valid draft")
        })
        .collect()
}

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard_stats");
    for size in [100usize, 1_000, 10_000] {
        let items = build_items(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| InventoryStats::compute(black_box(items)))
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_search");
    for size in [100usize, 1_000, 10_000] {
        let items = build_items(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("borrowed", size), &items, |b, items| {
            let query = ItemQuery::new("sku-00", CategoryFilter::Only(Category::Furniture));
            b.iter(|| query.apply(black_box(items)).len())
        });
        group.bench_with_input(BenchmarkId::new("owned", size), &items, |b, items| {
            b.iter(|| filter_items(black_box(items), "product 9", CategoryFilter::All).len())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stats, bench_search);
criterion_main!(benches);
