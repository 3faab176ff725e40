/// Pure Rust benchmarks for the Ewert solver.
///
/// Uses std::time::Instant for timing, a deterministic LCG PRNG for input
/// generation, and std::hint::black_box to prevent dead-code elimination.
/// Set `RUST_LOG=ewert_core=debug` to see per-loop convergence events.
use std::hint::black_box;
use std::time::{Duration, Instant};

use ewert_core::ewert::batch::{run_batch, Invocation};
use ewert_core::{
    config::SolverConfig, run_to_convergence, solve_iteration, ConstantInputs, LeafPhenology,
    LoopState, ModelOptions,
};
use tracing_subscriber::EnvFilter;

const REPEATS: usize = 7;

/// Simple LCG PRNG for deterministic input generation.
fn make_inputs(n: usize, seed: u64) -> Vec<ConstantInputs> {
    let mut state = seed;
    let mut next_f64 = || -> f64 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    (0..n)
        .map(|i| ConstantInputs {
            c_a: 380.0 + next_f64() * 40.0,
            e_a: 500.0 + next_f64() * 1500.0,
            g_bl: 1469999.0,
            g_sto_0: 20000.0,
            m: 8.12,
            d_0: 2270.0,
            o3up: next_f64() * 40.0,
            o3up_acc: next_f64() * 600.0,
            fo3_d_prev: 0.8 + next_f64() * 0.2,
            td_dd: next_f64() * 800.0,
            gamma_1: 0.06,
            gamma_2: 0.0045,
            gamma_3: 0.5,
            is_daylight: true,
            t_lse_constant: 0.33,
            phenology: LeafPhenology::default(),
            gamma: 34.277,
            gamma_star: 32.95,
            v_cmax: 60.0 + next_f64() * 80.0,
            k_c: 234.42,
            k_o: 216.75,
            j: 150.0 + next_f64() * 200.0,
            r_d: 0.32,
            e_sat_i: 2339.05,
            hr: (i % 24) as u32,
            f_sw: next_f64(),
            f_vpd: None,
        })
        .collect()
}

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn bench_solve_iteration(inputs: &[ConstantInputs], options: &ModelOptions) -> Duration {
    let seed = LoopState::seed(0.0, 20000.0);
    median_time(|| {
        for c in inputs {
            let _ = black_box(solve_iteration(c, &seed, options));
        }
    })
}

fn bench_run_to_convergence(
    inputs: &[ConstantInputs],
    options: &ModelOptions,
    solver: &SolverConfig,
) -> Duration {
    let seed = LoopState::seed(0.0, 20000.0);
    median_time(|| {
        for c in inputs {
            let _ = black_box(run_to_convergence(
                c,
                &seed,
                options,
                solver.tolerance,
                solver.max_iterations,
            ));
        }
    })
}

fn bench_batch(inputs: &[ConstantInputs], options: &ModelOptions, solver: &SolverConfig) -> Duration {
    let invocations: Vec<Invocation> = inputs
        .iter()
        .map(|&constants| Invocation {
            constants,
            initial_state: LoopState::seed(0.0, 20000.0),
            options: *options,
            solver: *solver,
        })
        .collect();
    median_time(|| {
        black_box(run_batch(&invocations));
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = ModelOptions::default();
    let solver = SolverConfig::default();
    let sizes = [1_000, 10_000, 100_000];

    println!("{:<22} | {:>8} | {:>12} | {:>12}", "bench", "n", "median", "per call");
    println!("{:-<22}-|-{:->8}-|-{:->12}-|-{:->12}", "", "", "", "");
    for &n in &sizes {
        let inputs = make_inputs(n, 42);

        // Warmup
        black_box(bench_solve_iteration(&inputs, &options));

        let rows = [
            ("solve_iteration", bench_solve_iteration(&inputs, &options)),
            (
                "run_to_convergence",
                bench_run_to_convergence(&inputs, &options, &solver),
            ),
            ("run_batch", bench_batch(&inputs, &options, &solver)),
        ];
        for (name, dur) in rows {
            println!(
                "{:<22} | {:>8} | {:>12.3?} | {:>12.3?}",
                name,
                n,
                dur,
                dur / n as u32
            );
        }
    }
}
