mod common;

use chrono::{Duration, Utc};
use common::{Closed, SharedBuf};
use event_log::{
    attach, data, format_errors, Auth, Config, Context, FieldSelection, Http, Logger, Severity, TracedError,
};
use std::sync::Arc;
use std::thread;

fn logger(config: Config) -> (Logger, SharedBuf) {
    let out = SharedBuf::default();
    let logger = Logger::with_writers(config, Box::new(out.clone()), Box::new(Closed));
    (logger, out)
}

#[test]
fn request_received_has_no_end_or_duration() {
    for config in [Config::new("svc"), Config::new("svc").minimum_alloc(true)] {
        let (logger, out) = logger(config.strict(true));
        let http = Http::new()
            .with_status_code(0)
            .with_method("GET")
            .with_scheme("http")
            .with_host("localhost")
            .with_port(1234)
            .with_path("/a/b/c")
            .with_query("x=1&y=2")
            .with_started_at(Utc::now());

        logger.event(&Context::background(), "http request received", attach![http]);

        let line = &out.lines()[0];
        let http = line["http"].as_object().unwrap();
        assert_eq!(line["event"], "http request received");
        assert_eq!(http["status_code"], 0);
        assert_eq!(http["method"], "GET");
        assert_eq!(http["scheme"], "http");
        assert_eq!(http["host"], "localhost");
        assert_eq!(http["port"], 1234);
        assert_eq!(http["path"], "/a/b/c");
        assert_eq!(http["query"], "x=1&y=2");
        assert!(http.contains_key("started_at"));
        assert!(!http.contains_key("ended_at"));
        assert!(!http.contains_key("duration"));
    }
}

#[test]
fn completed_request_duration_is_end_minus_start() {
    let (logger, out) = logger(Config::new("svc").minimum_alloc(true));
    let start = Utc::now();
    let end = start + Duration::milliseconds(1234) + Duration::nanoseconds(5);
    let http = Http::new().with_status_code(200).with_timing(Some(start), Some(end));

    logger.event_with_fields(&Context::background(), "http request completed", &FieldSelection::COMPLETION, attach![http]);

    let line = &out.lines()[0];
    assert_eq!(line["http"]["duration"], 1_234_000_005i64);
    assert!(line.get("namespace").is_none());
}

#[test]
fn doubly_wrapped_traced_error_has_one_frame_per_level() {
    let (logger, out) = logger(Config::new("svc").strict(true));
    let base = TracedError::new("base");
    let once = TracedError::wrap(base, "wrapped once");
    let twice = TracedError::wrap(once, "wrapped twice").with_data(serde_json::json!({"attempt": 3}));

    logger.error(&Context::background(), "request failed", &twice, attach![Auth::user("janedoe")]);

    let line = &out.lines()[0];
    let errors = line["errors"].as_array().unwrap();
    let messages: Vec<_> = errors.iter().map(|e| e["message"].as_str().unwrap()).collect();
    assert_eq!(messages, ["wrapped twice", "wrapped once", "base"]);
    for entry in errors {
        let trace = entry["stack_trace"].as_array().unwrap();
        assert_eq!(trace.len(), 1);
        assert!(trace[0]["file"].as_str().unwrap().ends_with("pipeline.rs"));
    }
    let lines: Vec<_> = errors.iter().map(|e| e["stack_trace"][0]["line"].as_u64().unwrap()).collect();
    assert!(lines[2] < lines[1] && lines[1] < lines[0]);
    assert_eq!(errors[0]["data"]["attempt"], 3);
    assert!(errors[1].get("data").is_none());
    assert_eq!(line["auth"]["identity"], "janedoe");
}

#[test]
fn missing_errors_in_a_list_are_skipped() {
    let err = TracedError::new("only one");
    let errors = format_errors([None, Some(&err as &(dyn std::error::Error + 'static)), None]);
    assert_eq!(errors.len(), 1);
}

#[test]
fn machine_and_unrolled_loggers_agree() {
    let (machine, machine_out) = logger(Config::new("svc"));
    let (unrolled, unrolled_out) = logger(Config::new("svc").minimum_alloc(true));
    let ctx = Context::with_trace_id("abc-123");
    let at = Utc::now();

    for logger in [&machine, &unrolled] {
        logger.event(
            &ctx,
            "proxying request",
            attach![
                Severity::Warn,
                Http::new().with_status_code(502).with_method("POST").with_started_at(at),
                Auth::service("router"),
                data! { "destination" => "http://localhost:8080", "retries" => 2, "tags" => vec!["a", "b"] },
            ],
        );
    }

    let mut a = machine_out.lines().remove(0);
    let mut b = unrolled_out.lines().remove(0);
    for line in [&mut a, &mut b] {
        line["created_at"].take();
        line["http"]["started_at"].take();
    }
    assert_eq!(a, b);
}

#[test]
fn concurrent_events_and_destination_swaps_keep_lines_whole() {
    let first = SharedBuf::default();
    let second = SharedBuf::default();
    let logger = Arc::new(Logger::with_writers(
        Config::new("svc").minimum_alloc(true),
        Box::new(first.clone()),
        Box::new(Closed),
    ));

    let writers: Vec<_> = (0..2)
        .map(|id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let ctx = Context::background();
                for i in 0..300 {
                    logger.event(&ctx, "tick", attach![data! { "writer" => id, "i" => i, "pad" => "x".repeat(200) }]);
                }
            })
        })
        .collect();

    let swapper = {
        let logger = Arc::clone(&logger);
        let (first, second) = (first.clone(), second.clone());
        thread::spawn(move || {
            for i in 0..200 {
                let next = if i % 2 == 0 { second.clone() } else { first.clone() };
                logger.set_destination(next);
            }
        })
    };

    for handle in writers {
        handle.join().unwrap();
    }
    swapper.join().unwrap();

    let total = first.lines().len() + second.lines().len();
    assert_eq!(total, 600);
    for out in [first, second] {
        assert!(out.text().is_empty() || out.text().ends_with('\n'));
    }
}

#[test]
fn human_output_is_a_pretty_block_per_event() {
    let (logger, out) = logger(Config::new("svc").human(true).colors(false));
    let ctx = Context::background();
    logger.info(&ctx, "first", attach![]);
    logger.info(&ctx, "second", attach![]);

    let text = out.text();
    assert!(text.starts_with("{\n  \""));
    assert_eq!(text.matches("\n}\n").count(), 2);
    let blocks: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&text)
        .into_iter()
        .map(Result::unwrap)
        .collect();
    assert_eq!(blocks[1]["event"], "second");
}
