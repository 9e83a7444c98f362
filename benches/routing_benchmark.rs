use creditline_engine::graph::credit_graph::{CreditGraph, GraphConfig};
use creditline_engine::simulation::network::{generate_random_network, house_codes, NetworkConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_network(c: &mut Criterion, name: &str, house_count: usize, line_density: f64) {
    let config = NetworkConfig {
        house_count,
        line_density,
        switcher_count: house_count / 5,
        ..Default::default()
    };
    let table = generate_random_network(&config);
    let houses = house_codes(house_count);
    let source = houses[0].clone();

    c.bench_function(name, |b| {
        b.iter(|| {
            CreditGraph::build(
                black_box(source.clone()),
                houses.iter().cloned(),
                table.lines(),
                table.switchers(),
                GraphConfig::default(),
            )
        })
    });
}

fn bench_routing_10_houses(c: &mut Criterion) {
    bench_network(c, "routing_10_houses", 10, 0.4);
}

fn bench_routing_100_houses(c: &mut Criterion) {
    bench_network(c, "routing_100_houses", 100, 0.1);
}

fn bench_routing_500_houses(c: &mut Criterion) {
    bench_network(c, "routing_500_houses", 500, 0.02);
}

criterion_group!(
    benches,
    bench_routing_10_houses,
    bench_routing_100_houses,
    bench_routing_500_houses
);
criterion_main!(benches);
