use anyhow::{Context, Result};
use calltree_core::{print_timing, print_timing_stats};
use calltree_demo::workload::Descent;

const DEFAULT_ITERATIONS: usize = 100;

struct Args {
    iterations: usize,
    stats: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        iterations: DEFAULT_ITERATIONS,
        stats: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--stats" => args.stats = true,
            "-h" | "--help" => {
                eprintln!("Usage: calltree-demo [iterations] [--stats]");
                std::process::exit(0);
            }
            n => {
                args.iterations = n
                    .parse()
                    .with_context(|| format!("invalid iteration count `{n}`"))?;
            }
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let mut descent = Descent::new(8, 3);
    let err = descent.run(args.iterations)?;
    log::info!("{} iterations, final error {err:.3e}", args.iterations);

    if args.stats {
        print_timing_stats!();
    } else {
        print_timing!();
    }
    Ok(())
}
