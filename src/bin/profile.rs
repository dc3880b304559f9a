use std::time::{Duration, Instant};

use mazegen::{Generation, Generator, MazeParams, maze::MAX_DIMENSION, solve_maze};

/// Generate and solve the largest maze repeatedly, stepping through every
/// animation event, and report the average time per run.
fn main() -> mazegen::Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);

    for generator in [Generator::Dfs, Generator::Prim] {
        for perfect in [true, false] {
            let params = MazeParams {
                perfect,
                generator,
                ..MazeParams::new(MAX_DIMENSION, MAX_DIMENSION, (0, 0), (MAX_DIMENSION - 1, MAX_DIMENSION - 1))
            };
            let mut total = Duration::ZERO;
            let mut events = 0;
            for _ in 0..num_iters {
                let start = Instant::now();
                let mut generation = Generation::new(&params)?;
                events += generation.by_ref().count();
                let maze = generation.finish();
                solve_maze(&maze)?;
                total += start.elapsed();
            }
            println!(
                "{:<6} perfect={:<5} {} runs, {} events/run, {:?}/run",
                generator.name(),
                perfect,
                num_iters,
                events / num_iters.max(1),
                total / num_iters.max(1) as u32
            );
        }
    }
    Ok(())
}
