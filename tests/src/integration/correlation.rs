//! # Correlation Flows
//!
//! Request/response matching across the real transport and listener:
//!
//! 1. Concurrent requests get distinct ids and settle from their own reply
//! 2. Unknown, duplicate, foreign and malformed replies have no effect
//! 3. Timeouts reject and clean up; a zero timeout never fires
//! 4. Error replies carry message and code through to the caller

#[cfg(test)]
mod tests {
    use crate::integration::harness::Harness;
    use async_trait::async_trait;
    use game_bridge::{
        BridgeChannel, BridgeConfig, BridgeError, MessagePort, MessageSource, RouteOutcome,
        TransportError,
    };
    use serde_json::{json, Value};
    use shared_protocol::{ErrorCode, RequestId};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    fn id(n: u64) -> RequestId {
        RequestId::new(n).unwrap()
    }

    // =========================================================================
    // MATCHING
    // =========================================================================

    #[tokio::test]
    async fn test_concurrent_requests_settle_from_own_reply() {
        let harness = Harness::with_defaults();

        let mut replies = Vec::new();
        for n in 0..5 {
            replies.push(
                harness
                    .channel
                    .send_request("GET_PLAYER", Some(json!({"n": n})), Duration::ZERO)
                    .await
                    .unwrap(),
            );
        }

        let mut requests = Vec::new();
        for _ in 0..5 {
            requests.push(harness.next_request().await);
        }
        let ids: HashSet<_> = requests.iter().map(|r| r.request_id).collect();
        assert_eq!(ids.len(), 5);

        // Answer newest first, echoing the request payload.
        for request in requests.iter().rev() {
            harness
                .reply(request.request_id, json!({"echo": request.data}))
                .await;
        }

        for (n, reply) in replies.into_iter().enumerate() {
            assert_eq!(reply.await.unwrap(), Some(json!({"echo": {"n": n}})));
        }
        assert_eq!(harness.channel.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_same_action_reversed_replies() {
        let harness = Harness::with_defaults();
        let channel = harness.channel.clone();

        let first = channel
            .send_request("GET_PLAYER", None, Duration::ZERO)
            .await
            .unwrap();
        let second = channel
            .send_request("GET_PLAYER", None, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(first.request_id(), id(1));
        assert_eq!(second.request_id(), id(2));

        harness.reply(id(2), json!("B")).await;
        harness.reply(id(1), json!("A")).await;

        assert_eq!(first.await.unwrap(), Some(json!("A")));
        assert_eq!(second.await.unwrap(), Some(json!("B")));
    }

    #[tokio::test]
    async fn test_outbound_envelope_shape() {
        let harness = Harness::with_defaults();
        let _reply = harness
            .channel
            .send_request("TRACK_SCORE", Some(json!({"score": 40})), Duration::ZERO)
            .await
            .unwrap();

        let raw = harness.host.next_message().await.unwrap();
        assert_eq!(
            raw,
            json!({"source": "game-sdk", "requestId": 1, "action": "TRACK_SCORE", "data": {"score": 40}})
        );
    }

    #[tokio::test]
    async fn test_legacy_spread_reply() {
        let harness = Harness::with_defaults();
        let reply = harness
            .channel
            .send_request("GET_PLAYER", None, Duration::ZERO)
            .await
            .unwrap();

        harness
            .post(json!({"requestId": 1, "player": {"id": "p1", "name": "Player 1"}}))
            .await;

        assert_eq!(
            reply.await.unwrap(),
            Some(json!({"player": {"id": "p1", "name": "Player 1"}}))
        );
    }

    // =========================================================================
    // NOISE
    // =========================================================================

    #[tokio::test]
    async fn test_noise_has_no_effect() {
        let harness = Harness::with_defaults();
        let reply = harness
            .channel
            .send_request("PLAY", None, Duration::ZERO)
            .await
            .unwrap();

        let noise = [
            json!({"requestId": 999, "_payload": "stray"}),
            json!({"source": "game-sdk", "requestId": 1, "action": "PLAY", "data": null}),
            json!({"source": "analytics", "requestId": 1, "_payload": "x"}),
            json!({"requestId": 0, "_payload": "zero"}),
            json!({"requestId": -1, "_payload": "negative"}),
            json!({"requestId": 1.5, "_payload": "fraction"}),
            json!({"requestId": "1", "_payload": "string"}),
            json!("webpackHotUpdate"),
            json!(null),
            json!([1, 2, 3]),
        ];
        for message in noise {
            harness.post(message).await;
        }
        harness.settle().await;
        assert_eq!(harness.channel.pending_count(), 1);

        harness.reply(id(1), json!("real")).await;
        assert_eq!(reply.await.unwrap(), Some(json!("real")));
    }

    #[tokio::test]
    async fn test_duplicate_reply_is_ignored() {
        let harness = Harness::with_defaults();
        let channel = &harness.channel;

        let reply = channel
            .send_request("SIGN_RESULT", None, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(
            channel.on_message(&json!({"requestId": 1, "_payload": "first"})),
            RouteOutcome::Settled(id(1))
        );
        assert_eq!(
            channel.on_message(&json!({"requestId": 1, "_payload": "second"})),
            RouteOutcome::Unmatched(id(1))
        );
        assert_eq!(
            channel.on_message(&json!({"requestId": 1, "error": "late", "code": 1})),
            RouteOutcome::Unmatched(id(1))
        );

        assert_eq!(reply.await.unwrap(), Some(json!("first")));
        assert_eq!(channel.stats().snapshot().completed, 1);
    }

    #[tokio::test]
    async fn test_non_positive_ids_are_protocol_violations() {
        let harness = Harness::with_defaults();
        for raw in [json!(0), json!(-5), json!(2.5)] {
            let outcome = harness
                .channel
                .on_message(&json!({"requestId": raw.clone(), "_payload": 1}));
            assert!(matches!(
                outcome,
                RouteOutcome::Ignored(shared_protocol::CodecError::InvalidRequestId(v)) if v == raw
            ));
        }
    }

    // =========================================================================
    // TIMEOUTS
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_timeout_rejects_and_cleans_up() {
        let harness = Harness::with_defaults();

        let err = harness
            .channel
            .dispatch_with_timeout("GET_PLAYER", None, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "timeout");
        assert_eq!(err.code(), -1);
        assert_eq!(harness.channel.pending_count(), 0);
        assert_eq!(harness.channel.stats().snapshot().timeouts, 1);

        // A reply after the timeout finds nothing.
        assert_eq!(
            harness
                .channel
                .on_message(&json!({"requestId": 1, "_payload": "late"})),
            RouteOutcome::Unmatched(id(1))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_timeout_from_config() {
        let config = BridgeConfig::default().with_default_timeout(Duration::from_millis(250));
        let harness = Harness::new(config);

        let started = tokio::time::Instant::now();
        let err = harness.channel.dispatch("PLAY", None).await.unwrap_err();

        assert!(matches!(
            err,
            BridgeError::Timeout { after, .. } if after == Duration::from_millis(250)
        ));
        assert!(started.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_before_timeout_wins() {
        let harness = Harness::with_defaults();
        let reply = harness
            .channel
            .send_request("PLAY", None, Duration::from_secs(5))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(4)).await;
        harness.reply(id(1), json!({"token": "t"})).await;
        assert_eq!(reply.await.unwrap(), Some(json!({"token": "t"})));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(harness.channel.stats().snapshot().timeouts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_never_fires() {
        let harness = Harness::with_defaults();
        let reply = harness
            .channel
            .send_request("SHOW_SHOP", None, Duration::ZERO)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(7 * 24 * 3600)).await;
        assert_eq!(harness.channel.pending_count(), 1);
        assert_eq!(harness.channel.stats().snapshot().timers_scheduled, 0);

        harness.reply(id(1), Value::Null).await;
        assert_eq!(reply.await.unwrap(), None);
    }

    // =========================================================================
    // ERRORS
    // =========================================================================

    #[tokio::test]
    async fn test_error_reply_with_and_without_code() {
        let harness = Harness::with_defaults();
        let channel = &harness.channel;

        let coded = channel
            .send_request("BUY_TICKET", None, Duration::ZERO)
            .await
            .unwrap();
        let uncoded = channel
            .send_request("BUY_TICKET", None, Duration::ZERO)
            .await
            .unwrap();

        harness
            .post(json!({"requestId": 1, "error": "user rejected", "code": 130}))
            .await;
        harness.post(json!({"requestId": 2, "error": "boom"})).await;

        let err = coded.await.unwrap_err();
        assert_eq!(err.error_code(), Some(ErrorCode::UserReject));
        assert_eq!(err.as_remote().unwrap().message, "user rejected");

        let err = uncoded.await.unwrap_err();
        assert_eq!(err.code(), -1);
        assert_eq!(err.as_remote().unwrap().message, "boom");
    }

    #[tokio::test]
    async fn test_empty_action_is_rejected_locally() {
        let harness = Harness::with_defaults();

        let err = harness.channel.dispatch("", None).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAction));
        assert_eq!(harness.channel.pending_count(), 0);

        // Nothing was posted: the next request on the wire is id 1.
        let _reply = harness
            .channel
            .send_request("INIT", None, Duration::ZERO)
            .await
            .unwrap();
        let request = harness.next_request().await;
        assert_eq!(request.request_id, id(1));
        assert_eq!(request.action, "INIT");
    }

    struct DetachedFrame;

    #[async_trait]
    impl MessagePort for DetachedFrame {
        async fn post_message(&self, _message: Value) -> Result<(), TransportError> {
            Err(TransportError::SendFailed("frame detached".into()))
        }
    }

    #[async_trait]
    impl MessageSource for DetachedFrame {
        async fn next_message(&self) -> Result<Value, TransportError> {
            Err(TransportError::Closed)
        }
    }

    #[tokio::test]
    async fn test_send_failure_leaves_no_entry() {
        let frame = Arc::new(DetachedFrame);
        let channel = BridgeChannel::open(BridgeConfig::default(), frame.clone(), frame).unwrap();

        let err = channel
            .dispatch_with_timeout("PLAY", None, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Transport(_)));
        assert_eq!(err.code(), -1);
        assert_eq!(channel.pending_count(), 0);
    }
}
