//! End-to-end lifecycle scenarios against the in-memory cluster service

use async_trait::async_trait;
use cluster_reconciler::{
    ClusterLookup, DesiredState, ObservedState, PollOperation, Reconciler, ReconcilerConfig,
    ReconcilerError, ThumbprintError, ThumbprintResolver,
};
use clusters_client::{ClusterState, MockClusterClient, MockOperation};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

const BASE_DOMAIN: &str = "example.com";
const FIRST_ID: &str = "00000000000000000001";

struct FixedResolver;

#[async_trait]
impl ThumbprintResolver for FixedResolver {
    async fn resolve(&self, _endpoint_url: &str) -> Result<String, ThumbprintError> {
        Ok("9e99a48a9960b14926bb7f3b02e22da2b0ab7280".to_string())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup() -> (MockClusterClient, Reconciler) {
    init_tracing();
    let mock = MockClusterClient::new(BASE_DOMAIN);
    let reconciler =
        Reconciler::with_resolver(mock.clone(), ReconcilerConfig::default(), Arc::new(FixedResolver))
            .unwrap();
    (mock, reconciler)
}

fn my_cluster() -> DesiredState {
    DesiredState {
        name: Some("my-cluster".to_string()),
        cloud_provider: Some("aws".to_string()),
        product: Some("rosa".to_string()),
        cloud_region: Some("us-west-1".to_string()),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_create_polls_until_ready() {
    let (mock, reconciler) = setup();
    let desired = my_cluster();
    let cancel = CancellationToken::new();

    let (result, ()) = tokio::join!(reconciler.create(&desired, &cancel), async {
        sleep(Duration::from_secs(40)).await;
        mock.set_state(FIRST_ID, ClusterState::Installing);
        sleep(Duration::from_secs(60)).await;
        mock.set_state(FIRST_ID, ClusterState::Ready);
    });

    let observed = result.unwrap();
    assert_eq!(mock.call_count(MockOperation::Create), 1);
    assert!(mock.call_count(MockOperation::Get) >= 2);
    assert_eq!(observed.state.as_deref(), Some("ready"));
    assert_eq!(observed.cloud_region.as_deref(), Some("us-west-1"));
    assert_eq!(
        observed.api_url.as_deref(),
        Some("https://api.my-cluster.example.com:6443")
    );
}

#[tokio::test]
async fn test_delete_without_polling() {
    let (mock, reconciler) = setup();
    let mut desired = my_cluster();
    desired.wait = Some(false);
    let observed = reconciler
        .create(&desired, &CancellationToken::new())
        .await
        .unwrap();
    let id = observed.id.unwrap();

    reconciler
        .delete(&id, false, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(mock.call_count(MockOperation::Delete), 1);
    assert_eq!(mock.call_count(MockOperation::Get), 0);
}

#[tokio::test(start_paused = true)]
async fn test_full_lifecycle() {
    let (mock, reconciler) = setup();
    let cancel = CancellationToken::new();

    let mut desired = my_cluster();
    desired.wait = Some(false);
    desired.compute_nodes = Some(3);
    let observed = reconciler.create(&desired, &cancel).await.unwrap();
    assert_eq!(observed.compute_nodes, Some(3));
    assert_eq!(observed.autoscaling_enabled, Some(false));

    // The caller persists observed state between runs
    let persisted = serde_json::to_string(&observed).unwrap();
    let observed: ObservedState = serde_json::from_str(&persisted).unwrap();

    desired.compute_nodes = Some(5);
    let observed = reconciler.update(&observed, &desired, &cancel).await.unwrap();
    assert_eq!(observed.compute_nodes, Some(5));

    mock.set_state(FIRST_ID, ClusterState::Ready);
    let observed = reconciler.read(&observed, &cancel).await.unwrap();
    assert_eq!(observed.state.as_deref(), Some("ready"));
    assert_eq!(observed.compute_nodes, Some(5));

    let summary = reconciler
        .lookup(&ClusterLookup::Name("my-cluster".to_string()), &cancel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.id, FIRST_ID);

    reconciler.delete(FIRST_ID, true, &cancel).await.unwrap();

    let err = reconciler.read(&observed, &cancel).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test(start_paused = true)]
async fn test_removal_poll_times_out() {
    let (mock, reconciler) = setup();
    mock.keep_on_delete(true);
    let mut desired = my_cluster();
    desired.wait = Some(false);
    reconciler
        .create(&desired, &CancellationToken::new())
        .await
        .unwrap();
    let start = Instant::now();

    let err = reconciler
        .delete(FIRST_ID, true, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReconcilerError::TimedOut {
            operation: PollOperation::Removal,
            ..
        }
    ));
    assert_eq!(start.elapsed(), Duration::from_secs(600));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_is_not_a_timeout() {
    let (_mock, reconciler) = setup();
    let desired = my_cluster();
    let cancel = CancellationToken::new();

    let (result, ()) = tokio::join!(reconciler.create(&desired, &cancel), async {
        sleep(Duration::from_secs(120)).await;
        cancel.cancel();
    });

    let err = result.unwrap_err();
    assert!(err.is_cancelled(), "unexpected {err:?}");
    assert!(!matches!(err, ReconcilerError::TimedOut { .. }));
}
