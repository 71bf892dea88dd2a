use std::io;
use std::time::Instant;

use chrono::Utc;
use event_log::{attach, data, Config, Context, FieldSelection, Http, Logger};

fn main() {
    let config = Config::new("unrolled-load").minimum_alloc(true);
    let logger = Logger::with_writers(config, Box::new(io::sink()), Box::new(io::stderr()));
    let ctx = Context::with_trace_id("load-test");

    let n: u64 = 100_000;
    let start = Instant::now();

    for _ in 0..n {
        let now = Utc::now();
        logger.event_with_fields(
            &ctx,
            "http request completed",
            &FieldSelection::COMPLETION,
            attach![
                Http::new().with_status_code(200).with_timing(Some(now), Some(Utc::now())),
                data! { "proxy_name" => "babbage" },
            ],
        );
    }

    let elapsed = start.elapsed();
    println!("unrolled renderer: logged {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
