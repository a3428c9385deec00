use std::sync::Arc;
use std::time::Instant;

use api_log_sink::noop_sink::NoopSink;
use api_log_sink::ApiLogger;

fn main() {
    let log = ApiLogger::new(Arc::new(NoopSink));

    let n: u64 = 10_000;
    let start = Instant::now();

    for i in 0..n {
        if let Err(e) = log.error(("default load test error", format!("iteration {}", i).as_str())) {
            eprintln!("log call rejected: {}", e);
        }
    }

    let elapsed = start.elapsed();
    println!("shorthand calls: normalized {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
