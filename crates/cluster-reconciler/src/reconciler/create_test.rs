//! Unit tests for cluster creation

#[cfg(test)]
mod tests {
    use crate::error::ReconcilerError;
    use crate::poll::PollOperation;
    use crate::test_utils::*;
    use clusters_client::*;
    use std::time::Duration;
    use tokio::time::{Instant, sleep};
    use tokio_util::sync::CancellationToken;

    const FIRST_ID: &str = "00000000000000000001";

    #[tokio::test]
    async fn test_create_without_wait() {
        let mock = MockClusterClient::new(BASE_DOMAIN);
        let reconciler = create_test_reconciler(
            mock.clone(),
            StaticThumbprintResolver::returning(THUMBPRINT),
            test_config(),
        );
        let mut desired = create_test_desired_state("my-cluster");
        desired.wait = Some(false);
        desired.aws_account_id = Some("123456789012".to_string());

        let state = reconciler
            .create(&desired, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(mock.call_count(MockOperation::Create), 1);
        assert_eq!(mock.call_count(MockOperation::Get), 0);
        assert_eq!(state.id.as_deref(), Some(FIRST_ID));
        assert_eq!(state.state.as_deref(), Some("pending"));
        assert_eq!(state.domain.as_deref(), Some("my-cluster.example.com"));
        assert_eq!(state.wait, Some(false));
        assert_eq!(state.aws_account_id.as_deref(), Some("123456789012"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_waits_until_ready() {
        init_tracing();
        let mock = MockClusterClient::new(BASE_DOMAIN);
        let reconciler = create_test_reconciler(
            mock.clone(),
            StaticThumbprintResolver::returning(THUMBPRINT),
            test_config(),
        );
        let desired = create_test_desired_state("my-cluster");
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let (result, ()) = tokio::join!(reconciler.create(&desired, &cancel), async {
            sleep(Duration::from_secs(65)).await;
            mock.set_state(FIRST_ID, ClusterState::Ready);
        });

        let state = result.unwrap();
        assert_eq!(state.state.as_deref(), Some("ready"));
        assert_eq!(mock.call_count(MockOperation::Create), 1);
        // Fetched at 0s, 30s, 60s and 90s
        assert_eq!(mock.call_count(MockOperation::Get), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(90));
    }

    #[tokio::test]
    async fn test_create_already_ready_skips_poll() {
        let mock = MockClusterClient::new(BASE_DOMAIN);
        mock.set_create_state(ClusterState::Ready);
        let reconciler = create_test_reconciler(
            mock.clone(),
            StaticThumbprintResolver::returning(THUMBPRINT),
            test_config(),
        );

        let state = reconciler
            .create(&create_test_desired_state("my-cluster"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(state.state.as_deref(), Some("ready"));
        assert_eq!(mock.call_count(MockOperation::Get), 0);
    }

    #[tokio::test]
    async fn test_invalid_desired_state_makes_no_call() {
        let mock = MockClusterClient::new(BASE_DOMAIN);
        let reconciler = create_test_reconciler(
            mock.clone(),
            StaticThumbprintResolver::returning(THUMBPRINT),
            test_config(),
        );
        let mut desired = create_test_desired_state("my-cluster");
        desired.version = Some("openshift-v4.8.2".to_string());

        let err = reconciler
            .create(&desired, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcilerError::UnsupportedVersion { .. }));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_carries_name() {
        let mock = MockClusterClient::new(BASE_DOMAIN);
        mock.fail_on(
            MockOperation::Create,
            ClusterError::Api {
                status: 400,
                message: "quota exceeded".to_string(),
            },
        );
        let reconciler = create_test_reconciler(
            mock.clone(),
            StaticThumbprintResolver::returning(THUMBPRINT),
            test_config(),
        );

        let err = reconciler
            .create(&create_test_desired_state("my-cluster"), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ReconcilerError::Create { name, source } => {
                assert_eq!(name, "my-cluster");
                assert!(matches!(source, ClusterError::Api { status: 400, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(mock.call_count(MockOperation::Get), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_ready_timeout_leaves_cluster() {
        let mock = MockClusterClient::new(BASE_DOMAIN);
        let reconciler = create_test_reconciler(
            mock.clone(),
            StaticThumbprintResolver::returning(THUMBPRINT),
            fast_config(),
        );

        let err = reconciler
            .create(&create_test_desired_state("my-cluster"), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ReconcilerError::TimedOut { id, operation, timeout } => {
                assert_eq!(id, FIRST_ID);
                assert_eq!(operation, PollOperation::Readiness);
                assert_eq!(timeout, Duration::from_secs(10));
            }
            other => panic!("unexpected {other:?}"),
        }
        // No rollback
        assert!(mock.stored_cluster(FIRST_ID).is_some());
        assert_eq!(mock.call_count(MockOperation::Delete), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_poll_failure() {
        let mock = MockClusterClient::new(BASE_DOMAIN);
        mock.fail_on(
            MockOperation::Get,
            ClusterError::Transport("connection reset".to_string()),
        );
        let reconciler = create_test_reconciler(
            mock.clone(),
            StaticThumbprintResolver::returning(THUMBPRINT),
            test_config(),
        );

        let err = reconciler
            .create(&create_test_desired_state("my-cluster"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcilerError::Poll {
                operation: PollOperation::Readiness,
                source: ClusterError::Transport(_),
                ..
            }
        ));
        assert_eq!(mock.call_count(MockOperation::Get), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_cancelled_while_waiting() {
        let mock = MockClusterClient::new(BASE_DOMAIN);
        let reconciler = create_test_reconciler(
            mock.clone(),
            StaticThumbprintResolver::returning(THUMBPRINT),
            test_config(),
        );
        let cancel = CancellationToken::new();
        let desired = create_test_desired_state("my-cluster");

        let (result, ()) = tokio::join!(reconciler.create(&desired, &cancel), async {
            sleep(Duration::from_secs(100)).await;
            cancel.cancel();
        });

        let err = result.unwrap_err();
        assert!(err.is_cancelled(), "unexpected {err:?}");
    }

    #[tokio::test]
    async fn test_create_sts_cluster_resolves_thumbprint() {
        let mock = MockClusterClient::new(BASE_DOMAIN);
        mock.set_create_state(ClusterState::Ready);
        let resolver = StaticThumbprintResolver::returning(THUMBPRINT);
        let reconciler = create_test_reconciler(mock.clone(), resolver.clone(), test_config());

        let mut desired = create_test_desired_state("sts-cluster");
        desired.sts = Some(create_test_sts_settings());

        let state = reconciler
            .create(&desired, &CancellationToken::new())
            .await
            .unwrap();

        let sts = state.sts.unwrap();
        assert_eq!(
            sts.oidc_endpoint_url.as_deref(),
            Some("oidc.example.com/00000000000000000001")
        );
        assert_eq!(sts.thumbprint.as_deref(), Some(THUMBPRINT));
        assert_eq!(sts.operator_role_prefix.as_deref(), Some("my-prefix"));
        assert_eq!(state.ccs_enabled, Some(true));
        assert_eq!(resolver.requests().len(), 1);
    }
}
