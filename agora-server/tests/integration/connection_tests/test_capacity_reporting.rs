use agora_core::{CapacityReport, ServerEvent};
use agora_server::ServerConfig;

use crate::integration::{create_test_session, init_tracing, quiet_config};
use crate::utils::TestChannel;

fn capacity_reports(events: &[ServerEvent]) -> Vec<CapacityReport> {
    events
        .iter()
        .filter_map(|e| match e {
            ServerEvent::UpdateCapacity(report) => Some(*report),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_fifteenth_join_is_reported_not_refused() {
    init_tracing();

    let (session, _backend) = create_test_session(quiet_config()).await;
    let mut channels = Vec::new();
    for _ in 0..15 {
        channels.push(TestChannel::open(&session).await.expect("join"));
    }

    let first = channels[0].drain();
    let reports = capacity_reports(&first);

    assert_eq!(reports.len(), 15, "one report per join");
    assert_eq!(reports.last(), Some(&CapacityReport::new(15, 14)));
    assert!(reports.last().is_some_and(|r| r.is_over()));
    assert_eq!(session.connected(), 15);
}

#[tokio::test]
async fn test_capacity_drops_on_leave() {
    init_tracing();

    let (session, _backend) = create_test_session(quiet_config()).await;
    let mut a = TestChannel::open(&session).await.expect("open a");
    let b = TestChannel::open(&session).await.expect("open b");
    let c = TestChannel::open(&session).await.expect("open c");
    a.drain();

    b.close().await.expect("close b");
    c.close().await.expect("close c");

    assert_eq!(
        capacity_reports(&a.drain()),
        vec![CapacityReport::new(2, 14), CapacityReport::new(1, 14)]
    );
}

#[tokio::test]
async fn test_hard_cap_turns_away_extra_peer() {
    init_tracing();

    let config = ServerConfig {
        max_capacity: 2,
        enforce_capacity: true,
        ..quiet_config()
    };
    let (session, _backend) = create_test_session(config).await;
    let mut a = TestChannel::open(&session).await.expect("open a");
    let _b = TestChannel::open(&session).await.expect("open b");
    a.drain();

    let refused = TestChannel::open_refused(&session).await.expect("refusal");

    assert_eq!(refused, vec![ServerEvent::RoomFull(CapacityReport::new(2, 2))]);
    assert!(a.drain().is_empty(), "a refused join emits nothing to others");
    assert_eq!(session.connected(), 2);
}
