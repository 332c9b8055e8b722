use std::time::Instant;

use crate::simulation::integrator::advance;
use crate::simulation::scenario::Scenario;

/// Time full simulation ticks at a fixed dt over growing tick counts.
pub fn bench_tick() {
    let tick_counts = [100, 1_000, 10_000];

    for n in tick_counts {
        let mut scenario = Scenario::with_defaults();

        // Warm up: let the aggregates settle before timing.
        for _ in 0..10 {
            advance(&mut scenario, 1.0 / 60.0);
        }

        let t0 = Instant::now();
        for _ in 0..n {
            advance(&mut scenario, 1.0 / 60.0);
        }
        let elapsed = t0.elapsed().as_secs_f64();

        println!(
            "bench_tick: {:>6} ticks in {:>8.3} ms  (~{:.4} ms/tick)",
            n,
            elapsed * 1000.0,
            elapsed * 1000.0 / n as f64
        );
    }
}

/// Time the aggregator alone, without the particle stepping.
pub fn bench_aggregator() {
    let iterations = 100_000;
    let mut scenario = Scenario::with_defaults();

    let t0 = Instant::now();
    for _ in 0..iterations {
        let aggs = scenario.aggregator.update(
            &scenario.system,
            &mut scenario.ambient,
            &scenario.parameters,
            1.0 / 60.0,
        );
        std::hint::black_box(&aggs);
    }
    let elapsed = t0.elapsed().as_secs_f64();

    println!(
        "bench_aggregator: {} iterations in {:.3} ms  (~{:.4} us/iter)",
        iterations,
        elapsed * 1000.0,
        elapsed * 1_000_000.0 / iterations as f64
    );
}
