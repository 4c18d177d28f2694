use std::time::Instant;

use crate::configuration::config::IntegratorConfig;
use crate::path::{shapes, Path};
use crate::simulation::engine::Engine;
use crate::simulation::integrator::simulate;
use crate::simulation::params::{BallParams, RunParams};

/// Parabola used by every benchmark
fn bench_path(samples: usize) -> Option<Path> {
    let waypoints = shapes::parabola(1.362, 0.412, 21, 0.0);
    Path::from_waypoints(&waypoints, Some(samples)).ok()
}

fn bench_ball() -> Option<BallParams> {
    BallParams::new(9.81, 0.012, 0.008, 0.0004, 1.0).ok()
}

/// Path lookup cost, stateless binary search vs. cursor with a locality hint.
/// Paste output directly into a spreadsheet to graph
pub fn bench_path_query() {
    println!("samples,build_ms,search_ns,cursor_ns");

    let queries = 100_000;

    for samples in [200, 400, 800, 1600, 3200, 6400, 12800] {
        let t0 = Instant::now();
        let Some(path) = bench_path(samples) else {
            continue;
        };
        let build_ms = t0.elapsed().as_secs_f64() * 1000.0;

        // monotone sweep, like a ball rolling forward
        let length = path.total_length();
        let ds = length / queries as f64;

        let mut sink = 0.0;
        let t1 = Instant::now();
        for i in 0..queries {
            sink += path.at(i as f64 * ds).curvature.z;
        }
        let search_ns = t1.elapsed().as_secs_f64() * 1e9 / queries as f64;

        let mut cursor = path.cursor();
        let t2 = Instant::now();
        for i in 0..queries {
            sink += cursor.at(i as f64 * ds).curvature.z;
        }
        let cursor_ns = t2.elapsed().as_secs_f64() * 1e9 / queries as f64;

        // keep the loops from being optimized away
        std::hint::black_box(sink);

        println!("{},{:.3},{:.2},{:.2}", samples, build_ms, search_ns, cursor_ns);
    }
}

/// Full runs for both schemes over a range of step sizes
pub fn bench_integrator() {
    println!("dt,scheme,steps,samples,ms");

    let (Some(path), Some(ball)) = (bench_path(2000), bench_ball()) else {
        return;
    };

    for dt in [1e-3, 5e-4, 2e-4, 1e-4, 5e-5] {
        let Ok(run) = RunParams::from_duration(dt, 10.0) else {
            continue;
        };

        for integrator in [IntegratorConfig::SymplecticEuler, IntegratorConfig::ExplicitEuler] {
            let engine = Engine {
                integrator,
                ..Engine::default()
            };

            // Warm-up
            simulate(&path, &ball, &run, &engine);

            let t0 = Instant::now();
            let out = simulate(&path, &ball, &run, &engine);
            let ms = t0.elapsed().as_secs_f64() * 1000.0;

            println!("{:e},{:?},{},{},{:.3}", dt, integrator, out.steps_taken, out.trajectory.len(), ms);
        }
    }
}
