use std::sync::Arc;
use std::time::Instant;

use api_log_sink::noop_sink::NoopSink;
use api_log_sink::{ApiLog, ApiLogger};

/// Compares complete-record calls, which skip stack capture, against
/// prefixed shorthand calls.
fn main() {
    let base = ApiLogger::new(Arc::new(NoopSink));
    let prefixed = base.with_prefix("[billing] ").with_prefix("[invoices] ");

    let n: u64 = 10_000;

    let start = Instant::now();
    for i in 0..n {
        let record = ApiLog::new("complete record", format!("iteration {}", i)).with_metadata("iteration", i);
        if let Err(e) = base.info(record) {
            eprintln!("log call rejected: {}", e);
        }
    }
    let records = start.elapsed();

    let start = Instant::now();
    for _ in 0..n {
        if let Err(e) = prefixed.info("prefixed shorthand") {
            eprintln!("log call rejected: {}", e);
        }
    }
    let shorthand = start.elapsed();

    println!("complete records: {:?} for {} calls", records, n);
    println!("prefixed shorthand: {:?} for {} calls", shorthand, n);
}
