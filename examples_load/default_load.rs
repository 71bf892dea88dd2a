use std::io;
use std::time::Instant;

use event_log::{attach, data, Config, Context, Http, Logger};

fn main() {
    let logger = Logger::with_writers(Config::new("default-load"), Box::new(io::sink()), Box::new(io::stderr()));
    let ctx = Context::with_trace_id("load-test");

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        logger.event(
            &ctx,
            "http request received",
            attach![
                Http::new().with_method("GET").with_path("/embed").with_query("x=1"),
                data! { "iteration" => i },
            ],
        );
    }

    let elapsed = start.elapsed();
    println!("machine renderer: logged {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
