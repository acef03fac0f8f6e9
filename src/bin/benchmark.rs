use std::path::PathBuf;
use std::time::{Duration, Instant};

use quickfind::{DirectorySource, FuzzySearcher, Options, WalkDirWalker};

fn main() {
    println!("Starting benchmarks...");

    // 1. Setup paths
    let target_dir = match std::env::args().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().expect("Failed to get current directory"),
    };

    if !target_dir.is_dir() {
        eprintln!("Error: Directory {:?} not found.", target_dir);
        return;
    }

    let options = Options { start_dir: target_dir.clone(), ..Options::default() };

    // 2. Fetch benchmark, once per walker
    println!("\n=== Fetch Benchmark ===");
    let mut sequential = DirectorySource::with_walker(options.clone(), Box::new(WalkDirWalker));
    let start_time = Instant::now();
    let candidates = match sequential.fetch() {
        Ok(candidates) => candidates,
        Err(err) => {
            eprintln!("Failed to walk directory: {err}");
            return;
        }
    };
    println!("walkdir walker: {} candidates in {:.2?}", candidates.len(), start_time.elapsed());

    let mut default = DirectorySource::new(options.clone());
    let start_time = Instant::now();
    match default.fetch() {
        Ok(found) => println!("default walker: {} candidates in {:.2?}", found.len(), start_time.elapsed()),
        Err(err) => eprintln!("Failed to walk directory: {err}"),
    }

    // 3. Search benchmark
    println!("\n=== Search Benchmark ===");
    let search_terms = ["main", "lib", "mod", "test", "config", "readme", "src", "toml"];
    let searcher = FuzzySearcher::new(default.ranker());

    // Warmup
    for term in &search_terms {
        let _ = searcher.search(&candidates, term, 20);
    }

    let iterations = 20;
    let mut total_latency = Duration::new(0, 0);
    let mut query_count = 0u32;
    for _ in 0..iterations {
        for term in &search_terms {
            let start = Instant::now();
            let _ = searcher.search(&candidates, term, 20);
            total_latency += start.elapsed();
            query_count += 1;
        }
    }

    let avg_latency = total_latency / query_count;
    println!("Average Search Latency: {:.2?}", avg_latency);
    let qps = query_count as f64 / total_latency.as_secs_f64();
    println!("Throughput: {:.2} QPS", qps);
}
