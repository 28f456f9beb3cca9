//! End-to-end run of every stage over file-backed stores.

use chrono::{Days, NaiveDate};
use signals_core::traits::SignalStore;
use signals_core::types::{Outcome, StatusLevel};
use signals_data::{CsvDropFeed, CsvSeriesStore, CsvSignalStore, Updater};
use signals_engine::ExecutionEngine;
use signals_features::FeatureBuilder;
use signals_monitor::{JsonStatusLedger, RunContext};
use signals_notify::OutboxNotifier;
use signals_report::{dispatch, render, Aggregator, Delivery, DispatchSettings};
use signals_strategies::{default_instances, StrategyRegistry};
use std::fmt::Write;
use std::fs;
use std::path::Path;

fn write_batch(inbox: &Path, symbol: &str, start: NaiveDate, rows: &[(f64, f64, f64, f64, f64)]) {
    let mut csv = String::from("date,open,high,low,close,volume\n");
    for (i, (o, h, l, c, v)) in rows.iter().enumerate() {
        let date = start + Days::new(i as u64);
        writeln!(csv, "{date},{o},{h},{l},{c},{v}").unwrap();
    }
    fs::create_dir_all(inbox).unwrap();
    fs::write(inbox.join(format!("{symbol}.csv")), csv).unwrap();
}

#[test]
fn test_update_features_execute_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let inbox = root.join("inbox");
    let today = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();

    // AAPL: 24 quiet bars, then a wide bullish bar on five times the volume
    let mut aapl = vec![(100.0, 101.0, 99.0, 100.0, 1000.0); 24];
    aapl.push((100.0, 111.0, 99.0, 110.0, 5000.0));
    write_batch(&inbox, "AAPL", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), &aapl);

    // MSFT: 14 flat bars, then a 5% gap down at the open
    let mut msft = vec![(100.0, 101.0, 99.0, 100.0, 1000.0); 14];
    msft.push((95.0, 97.0, 94.0, 96.0, 1000.0));
    write_batch(&inbox, "MSFT", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), &msft);

    let ledger = JsonStatusLedger::new(root.join("status/status.json"));
    let series = CsvSeriesStore::new(root.join("historic"), root.join("recent"));
    let signals = CsvSignalStore::new(root.join("signals"));
    let symbols: Vec<String> = ["AAPL", "MSFT", "NOPE"].iter().map(|s| s.to_string()).collect();

    // Update
    let ctx = RunContext::new("update", today, &ledger);
    let feed = CsvDropFeed::new(&inbox);
    let summary = Updater::new(&series).run(&symbols, &feed, &ctx).unwrap();
    assert_eq!(summary.updated(), 2);
    assert_eq!(summary.failed(), 1);

    // A second run over the same inbox changes nothing
    let again = Updater::new(&series).run(&symbols, &feed, &ctx).unwrap();
    assert_eq!(again.unchanged(), 2);

    // Features: neither symbol has enough history yet
    let ctx = RunContext::new("features", today, &ledger);
    let output = root.join("features/features_day.csv");
    let features = FeatureBuilder::new(&series).run(&symbols, &output, &ctx).unwrap();
    assert_eq!(features.built(), 0);
    assert_eq!(features.skipped(), 3);
    assert_eq!(features.symbols[0].message, "25 rows, fewer than 60");
    assert!(output.exists());

    // Execute
    let ctx = RunContext::new("strategy_signals", today, &ledger);
    let strategies = StrategyRegistry::new().discover(&default_instances());
    let summary = ExecutionEngine::new(&series, &signals)
        .run(&symbols, &strategies, &ctx)
        .unwrap();
    assert_eq!(summary.written(), 2);
    assert_eq!(summary.symbols[2].outcome, Outcome::Error);
    assert_eq!(signals.symbols().unwrap(), vec!["AAPL", "MSFT"]);

    // Aggregate and dispatch
    let ctx = RunContext::new("alerts", today, &ledger);
    let aggregate = Aggregator::new(&signals, &series).aggregate(&ctx).unwrap();
    let rows = aggregate.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].symbol, "AAPL");
    assert_eq!(rows[0].buy, vec!["bollinger_breakout"]);
    assert_eq!(rows[0].close.to_string(), "110.00");
    assert_eq!(rows[1].symbol, "MSFT");
    assert_eq!(rows[1].buy, vec!["gap_open"]);
    assert_eq!(rows[1].as_of, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());

    let report = render(&aggregate, today, "Heuristic signals of the day");
    let outbox = OutboxNotifier::new(root.join("outbox"));
    let settings = DispatchSettings {
        recipient: Some("desk@example.com".into()),
        html: true,
    };
    let delivery = dispatch(&report, aggregate.len(), &settings, &outbox, &ctx).unwrap();
    assert_eq!(delivery, Delivery::Sent);
    assert_eq!(fs::read_dir(root.join("outbox")).unwrap().count(), 1);

    let entries = ledger.entries().unwrap();
    assert_eq!(entries["update"].status, StatusLevel::Error);
    assert_eq!(entries["features"].status, StatusLevel::Ok);
    assert_eq!(entries["strategy_signals"].message, "2 of 3 processed successfully");
    assert_eq!(entries["alerts"].status, StatusLevel::Ok);
    assert_eq!(entries["alerts"].message, "2 symbols sent");
}
