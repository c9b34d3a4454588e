//! Criterion benchmarks for retireplan_core simulation
//!
//! Run with: cargo bench -p retireplan_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use retireplan_core::accumulation::run_accumulation;
use retireplan_core::config::{AccumulationConfig, SimulationBuilder, SimulationConfig};
use retireplan_core::model::ReturnModel;
use retireplan_core::optimization::{SolverConfig, solve_initial_capital};
use retireplan_core::simulation::{run_and_summarize, simulate_path};

fn create_decumulation_config(num_paths: usize, guyton_klinger: bool) -> SimulationConfig {
    let builder = SimulationBuilder::new()
        .initial_capital(1_000_000.0)
        .withdrawal_amount(40_000.0)
        .normal_returns(0.07, 0.15)
        .inflation(0.025)
        .years(30)
        .paths(num_paths)
        .seed(42);
    let builder = if guyton_klinger {
        builder.guyton_klinger()
    } else {
        builder.fixed_policy()
    };
    builder.build().expect("benchmark config is valid")
}

fn bench_single_path(c: &mut Criterion) {
    let config = create_decumulation_config(1, true);
    let sampler = config.returns.sampler().expect("valid return model");
    let mut rng = SmallRng::seed_from_u64(42);

    c.bench_function("single_path_30yr_gk", |b| {
        b.iter(|| simulate_path(black_box(&config), black_box(&sampler), &mut rng))
    });
}

fn bench_decumulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("decumulation");

    for num_paths in [100, 1_000, 10_000].iter() {
        for (name, gk) in [("fixed", false), ("guyton_klinger", true)] {
            let config = create_decumulation_config(*num_paths, gk);
            group.bench_with_input(BenchmarkId::new(name, num_paths), num_paths, |b, _| {
                b.iter(|| run_and_summarize(black_box(&config), None))
            });
        }
    }

    group.finish();
}

fn bench_accumulation(c: &mut Criterion) {
    let config = AccumulationConfig {
        contribution: 2_000.0,
        returns: ReturnModel::Normal {
            mean: 0.07,
            std_dev: 0.15,
        },
        target: 1_000_000.0,
        initial_principal: 50_000.0,
        max_years: 50,
        periods_per_year: 12,
        num_paths: 1_000,
        seed: Some(42),
    };

    c.bench_function("accumulation_1000_paths", |b| {
        b.iter(|| run_accumulation(black_box(&config)))
    });
}

fn bench_capital_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("capital_search");
    group.sample_size(10);

    let config = create_decumulation_config(500, false);
    let solver = SolverConfig::new(0.9, 0.0, 5_000_000.0);

    group.bench_function("fixed_500_paths", |b| {
        b.iter(|| solve_initial_capital(black_box(&config), black_box(&solver), None, None))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_path,
    bench_decumulation,
    bench_accumulation,
    bench_capital_search,
);
criterion_main!(benches);
