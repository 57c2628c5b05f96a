// Integration tests for the poll-evaluate-notify cycle, driven by fake
// collaborators so many cycles can be simulated without real time or I/O.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};

use overhead::aircraft::{AircraftFrame, RawAircraft};
use overhead::cooldown::CooldownGate;
use overhead::feed::AircraftSource;
use overhead::geofence::Geofence;
use overhead::notifier::Notifier;
use overhead::observation::{ObservationLog, ObservationRecord, ObservationSink};
use overhead::watcher::Watcher;

struct FakeSource {
    aircraft: Vec<AircraftFrame>,
    fail: bool,
}

#[async_trait]
impl AircraftSource for FakeSource {
    async fn fetch(&self) -> Result<Vec<AircraftFrame>> {
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.aircraft.clone())
    }
}

#[derive(Default)]
struct FakeSink {
    records: Mutex<Vec<ObservationRecord>>,
}

#[async_trait]
impl ObservationSink for FakeSink {
    async fn append(&self, record: &ObservationRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
struct FakeNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, title: &str, message: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}

fn frame(json: &str) -> AircraftFrame {
    serde_json::from_str::<RawAircraft>(json).unwrap().into()
}

fn aarhus_fence() -> Geofence {
    Geofence {
        center: (56.1629, 10.2039),
        radius_km: 20.0,
        altitude_max_ft: 30000,
        heading_tolerance_deg: None,
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn build_watcher(
    aircraft: Vec<AircraftFrame>,
    fail_fetch: bool,
) -> (Watcher, Arc<FakeSink>, Arc<FakeNotifier>) {
    let sink = Arc::new(FakeSink::default());
    let notifier = Arc::new(FakeNotifier::default());
    let watcher = Watcher::new(
        aarhus_fence(),
        CooldownGate::new(Duration::minutes(5)),
        "Aarhus".to_string(),
        Some("http://192.168.8.31:8080/?icao=".to_string()),
        Arc::new(FakeSource {
            aircraft,
            fail: fail_fetch,
        }),
        sink.clone(),
        notifier.clone(),
    );
    (watcher, sink, notifier)
}

// Inside the fence, descending and low-and-slow
const TAGGED: &str = r#"{"hex":"4ca1d2","flight":"SAS1417 ","desc":"AIRBUS A320 NEO",
    "lat":56.1629,"lon":10.3039,"alt_baro":2000,"gs":100,"baro_rate":-300}"#;

// Inside the fence, level cruise
const UNTAGGED: &str = r#"{"hex":"45ac2f","flight":"DLH4XA","lat":56.20,"lon":10.25,
    "alt_baro":9000,"gs":280,"baro_rate":0}"#;

// Well outside the 20 km radius
const DISTANT: &str = r#"{"hex":"406b8d","lat":57.5,"lon":9.0,"alt_baro":35000}"#;

#[tokio::test]
async fn empty_feed_does_nothing() {
    let (mut watcher, sink, notifier) = build_watcher(vec![], false);

    let summary = watcher.tick(t0()).await;

    assert_eq!(summary.aircraft_seen, 0);
    assert_eq!(summary.qualified, 0);
    assert_eq!(summary.alerts_sent, 0);
    assert!(sink.records.lock().unwrap().is_empty());
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fetch_failure_is_an_empty_cycle() {
    let (mut watcher, sink, notifier) = build_watcher(vec![frame(TAGGED)], true);

    let summary = watcher.tick(t0()).await;

    assert_eq!(summary.aircraft_seen, 0);
    assert!(sink.records.lock().unwrap().is_empty());
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn tagged_qualifier_observes_and_notifies() {
    let (mut watcher, sink, notifier) = build_watcher(vec![frame(TAGGED)], false);

    let summary = watcher.tick(t0()).await;

    assert_eq!(summary.qualified, 1);
    assert_eq!(summary.alerts_sent, 1);

    let records = sink.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].flight, "SAS1417");
    assert_eq!(records[0].tags.len(), 2);

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (title, message) = &sent[0];
    assert_eq!(title, "Plane over Aarhus");
    assert!(message.contains("SAS1417 AIRBUS A320 NEO is descending, low_and_slow"));
    assert!(message.contains("2000 ft"));
    assert!(message.contains("http://192.168.8.31:8080/?icao=4ca1d2"));
}

#[tokio::test]
async fn cooldown_suppresses_repeat_alerts_but_not_observations() {
    let (mut watcher, sink, notifier) = build_watcher(vec![frame(TAGGED)], false);

    assert_eq!(watcher.tick(t0()).await.alerts_sent, 1);
    // One minute later: same aircraft, same tags, still observed
    let second = watcher.tick(t0() + Duration::minutes(1)).await;
    assert_eq!(second.qualified, 1);
    assert_eq!(second.alerts_sent, 0);
    // Past the 5 minute window the gate reopens
    let third = watcher.tick(t0() + Duration::minutes(6)).await;
    assert_eq!(third.alerts_sent, 1);

    assert_eq!(sink.records.lock().unwrap().len(), 3);
    assert_eq!(notifier.sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn untagged_qualifier_observes_without_notifying() {
    let (mut watcher, sink, notifier) = build_watcher(vec![frame(UNTAGGED)], false);

    let summary = watcher.tick(t0()).await;

    assert_eq!(summary.qualified, 1);
    assert_eq!(summary.alerts_sent, 0);

    let records = sink.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].tags.is_empty());
    assert!(notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_aircraft_are_skipped() {
    let (mut watcher, sink, _) = build_watcher(vec![frame(DISTANT), frame(UNTAGGED)], false);

    let summary = watcher.tick(t0()).await;

    assert_eq!(summary.aircraft_seen, 2);
    assert_eq!(summary.qualified, 1);
    assert_eq!(sink.records.lock().unwrap().len(), 1);
    assert_eq!(sink.records.lock().unwrap()[0].hex.as_deref(), Some("45ac2f"));
}

#[tokio::test]
async fn observation_log_appends_across_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.jsonl");

    let notifier = Arc::new(FakeNotifier::default());
    let mut watcher = Watcher::new(
        aarhus_fence(),
        CooldownGate::new(Duration::minutes(5)),
        "Aarhus".to_string(),
        None,
        Arc::new(FakeSource {
            aircraft: vec![frame(UNTAGGED)],
            fail: false,
        }),
        Arc::new(ObservationLog::new(path.clone())),
        notifier,
    );

    watcher.tick(t0()).await;
    let after_first = std::fs::read_to_string(&path).unwrap();
    watcher.tick(t0() + Duration::minutes(1)).await;
    let after_second = std::fs::read_to_string(&path).unwrap();

    // Strictly append-only: the first line survives byte for byte
    assert!(after_second.starts_with(&after_first));
    assert_eq!(after_first.lines().count(), 1);
    assert_eq!(after_second.lines().count(), 2);
    for line in after_second.lines() {
        let _: ObservationRecord = serde_json::from_str(line).unwrap();
    }
}
