use std::sync::Arc;
use std::time::Duration;

use siprtt_common::config::Config;
use siprtt_common::network::transport::Transport;
use siprtt_common::store::LocationStore;
use siprtt_core::discovery::TargetSource;
use siprtt_core::monitor::{MonitorService, PushSummary};
use siprtt_core::prober::SipProber;
use siprtt_core::scanner;

use super::support::{MemoryStore, RecordingSink, Responder, closed_port};

fn config(trunks: &[(&str, u16)], check_users: bool) -> Config {
    let mut ini = format!(
        "[global]\nlocal_ip = 127.0.0.1\nprobe_timeout_ms = 1000\ncheck_users = {check_users}\n\n[trunks]\n"
    );
    for (name, port) in trunks {
        ini.push_str(&format!("{name} = 127.0.0.1:{port}\n"));
    }
    Config::from_ini_str(&ini).unwrap()
}

fn service(
    cfg: &Config,
    store: Option<Arc<dyn LocationStore>>,
    sink: Arc<RecordingSink>,
) -> MonitorService {
    let source = TargetSource::new(cfg, store);
    MonitorService::new(cfg, source, Arc::new(SipProber::new(&cfg.probe)), sink)
}

/// The slower transport is the one reported.
#[tokio::test]
async fn slower_transport_is_selected() {
    let peer = Responder::spawn(Duration::ZERO, Duration::from_millis(80)).await;
    let cfg = config(&[("trunk1", peer.port)], false);

    let source = TargetSource::new(&cfg, None);
    let prober = Arc::new(SipProber::new(&cfg.probe));
    let metrics = scanner::run_cycle(prober, source.enumerate().await, 4).await;

    let result = &metrics["trunk1"];
    assert_eq!(result.protocol, Transport::Udp);
    assert!(result.rtt_ms >= 80.0, "rtt {} below the UDP delay", result.rtt_ms);
}

#[tokio::test]
async fn unreachable_trunk_is_absent_and_nothing_is_pushed() {
    let port = closed_port().await;
    let cfg = config(&[("dead", port)], false);
    let sink = Arc::new(RecordingSink::default());

    let (metrics, summary) = service(&cfg, None, sink.clone()).run_once().await;

    assert!(metrics.is_empty());
    assert_eq!(summary, PushSummary::default());
    assert!(sink.points.lock().unwrap().is_empty());
}

#[tokio::test]
async fn full_cycle_with_discovered_contacts() {
    let trunk = Responder::spawn(Duration::from_millis(40), Duration::ZERO).await;
    let phone = Responder::spawn(Duration::ZERO, Duration::ZERO).await;
    let dead = closed_port().await;

    let mut store = MemoryStore::default();
    store.entries.insert(
        "ul:location:1001".into(),
        format!(r#"[{{"contact":"sip:1001@127.0.0.1:{}","expires":3600}}]"#, phone.port),
    );
    store.entries.insert("ul:location:1002".into(), "{not json".into());
    store.entries.insert(
        "ul:location:1003".into(),
        r#"[{"contact":"sip:1003@phone.example.com"}]"#.into(),
    );

    let cfg = config(&[("trunk1", trunk.port), ("trunk2", dead)], true);
    let sink = Arc::new(RecordingSink::default());
    let svc = service(&cfg, Some(Arc::new(store)), sink.clone());

    let (metrics, summary) = svc.run_once().await;

    let names: Vec<&str> = metrics.keys().map(String::as_str).collect();
    assert_eq!(names, ["1001", "trunk1"]);
    assert_eq!(metrics["trunk1"].protocol, Transport::Tcp);
    assert_eq!(summary, PushSummary { written: 2, failed: 0 });

    let points = sink.points.lock().unwrap();
    let trunk_point = points.iter().find(|p| p.target == "trunk1").unwrap();
    assert_eq!(trunk_point.protocol, "tcp");
    assert_eq!(trunk_point.measurement, "sip_rtt_metrics");
    assert_eq!(trunk_point.host, "localhost");
    assert_eq!(trunk_point.source, "sip_rtt_checker");
    assert_eq!(trunk_point.rtt_ms, (trunk_point.rtt_ms * 100.0).round() / 100.0);
    assert!(points.iter().all(|p| p.timestamp_ns == points[0].timestamp_ns));
}
