use std::sync::OnceLock;

use localstack_ready::{ReadinessPoller, ReadyGate};

static GATE: OnceLock<ReadyGate> = OnceLock::new();

fn live_poller() -> Option<ReadinessPoller> {
    std::env::var("LOCALSTACK_HEALTH_URL").ok()?;
    match ReadinessPoller::from_env() {
        Ok(poller) => Some(poller),
        Err(err) => panic!("invalid LOCALSTACK_* environment: {err}"),
    }
}

#[tokio::test]
async fn live_localstack_reports_ready() {
    let Some(poller) = live_poller() else {
        eprintln!("skipping live test: LOCALSTACK_HEALTH_URL is not set");
        return;
    };

    let report = GATE
        .get_or_init(ReadyGate::new)
        .wait(&poller)
        .await
        .expect("LocalStack must be ready before tests run");

    assert!(poller.criteria().is_satisfied(&report));
    assert!(poller.check_once().await);
}
