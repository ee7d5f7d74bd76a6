//! pong_sweep: sweep the rally chain over the p × q grid.
//!
//! Writes three CSV tables for external plotting: the expected-moves
//! surface (`lin_al_solve_pong.csv`: p,q,mean) and the two players'
//! per-step winning distributions (`p1_winning.csv` / `p2_winning.csv`:
//! p,q,moves,prob).

use std::fs;
use std::io::Write;
use std::time::Instant;

use absorbing::env_config;
use absorbing::propagation::StepRecord;
use absorbing::sweep::{default_grid, sweep_pong, PongSweepResult};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut serve = 0.5;
    let mut grid = default_grid();
    let mut output_dir = env_config::output_dir();
    let mut emit_json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--serve" => {
                i += 1;
                serve = args[i].parse().expect("Invalid --serve value");
            }
            "--grid" => {
                i += 1;
                grid = args[i]
                    .split(',')
                    .map(|s| s.trim().parse::<f64>().expect("Invalid --grid value"))
                    .collect();
            }
            "--output" => {
                i += 1;
                output_dir = args[i].clone().into();
            }
            "--json" => {
                emit_json = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let num_threads = env_config::init_rayon_threads();
    println!("Rayon threads: {}", num_threads);
    println!(
        "Sweeping {} × {} grid points (serve = {})",
        grid.len(),
        grid.len(),
        serve
    );

    let t_total = Instant::now();
    let results = match sweep_pong(serve, &grid) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Sweep failed: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "  {} points analyzed in {:.2}s",
        results.len(),
        t_total.elapsed().as_secs_f64()
    );

    fs::create_dir_all(&output_dir).expect("Failed to create output directory");

    write_mean_table(&output_dir.join("lin_al_solve_pong.csv"), &results);
    write_record_table(&output_dir.join("p1_winning.csv"), &results, p1_records);
    write_record_table(&output_dir.join("p2_winning.csv"), &results, p2_records);
    if emit_json {
        let path = output_dir.join("pong_sweep.json");
        let json = serde_json::to_string_pretty(&results).expect("Failed to serialize results");
        fs::write(&path, json).expect("Failed to write JSON");
        println!("  wrote {}", path.display());
    }
    println!("Done. Output in {}", output_dir.display());
}

fn write_mean_table(path: &std::path::Path, results: &[PongSweepResult]) {
    let mut f = fs::File::create(path).expect("Failed to create CSV");
    writeln!(f, "p,q,mean").unwrap();
    for r in results {
        writeln!(f, "{},{},{}", r.p, r.q, r.expected_moves).unwrap();
    }
    println!("  wrote {}", path.display());
}

fn p1_records(r: &PongSweepResult) -> &[StepRecord] {
    &r.p1_records
}

fn p2_records(r: &PongSweepResult) -> &[StepRecord] {
    &r.p2_records
}

fn write_record_table(
    path: &std::path::Path,
    results: &[PongSweepResult],
    records: fn(&PongSweepResult) -> &[StepRecord],
) {
    let mut f = fs::File::create(path).expect("Failed to create CSV");
    writeln!(f, "p,q,moves,prob").unwrap();
    for r in results {
        for rec in records(r) {
            writeln!(f, "{},{},{},{}", r.p, r.q, rec.step, rec.mass).unwrap();
        }
    }
    println!("  wrote {}", path.display());
}

fn print_usage() {
    println!("Usage: pong_sweep [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --serve <P>     Serve probability toward player one (default 0.5)");
    println!("  --grid <CSV>    Comma-separated p/q values (default 0.1..0.9)");
    println!("  --output <DIR>  Output directory (default $ABSORBING_OUTPUT_DIR or outputs/)");
    println!("  --json          Also write the full results as pong_sweep.json");
}
