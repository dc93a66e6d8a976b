//! # Host Flows
//!
//! The typed SDK against the demo host over the in-memory channel:
//!
//! 1. Full scripted sessions through `bridge-runtime`
//! 2. Host-side failures surfacing as typed errors on the game side
//! 3. Unroutable and foreign requests

#[cfg(test)]
mod tests {
    use crate::integration::harness::DemoSession;
    use bridge_runtime::{play_session, run_demo};
    use game_bridge::transport::memory::duplex;
    use game_bridge::{BridgeChannel, BridgeConfig, GameSdk};
    use host_responder::{ActionRegistry, HostConfig, HostResponder};
    use serde_json::json;
    use shared_protocol::types::{ItemPayload, SdkInitParams, SignPayload};
    use shared_protocol::{codes, verify_payload, Action, ErrorCode, RemoteError};
    use std::sync::Arc;
    use std::time::Duration;

    fn host_with_energy(energy: i64) -> HostConfig {
        let mut config = HostConfig::default();
        config.player.energy = energy;
        config
    }

    // =========================================================================
    // SESSIONS
    // =========================================================================

    #[tokio::test]
    async fn test_full_demo_session() {
        let report = run_demo(BridgeConfig::default(), HostConfig::default(), 3)
            .await
            .unwrap();

        assert_eq!(report.player_id, "p1");
        assert_eq!(report.tournament_id.as_deref(), Some("tour1"));
        assert_eq!(report.rounds_played, 3);
        assert_eq!(report.signatures.len(), 3);
        assert_eq!(report.stopped_early, None);
        // 25 + 50 + 75
        assert_eq!(report.total_score, 150);
        // 100 + 15 + 30 + 45
        assert_eq!(report.balance_nps, 190);
        assert_eq!(report.energy_left, 240);
    }

    #[tokio::test]
    async fn test_session_stops_when_energy_runs_out() {
        let report = run_demo(BridgeConfig::default(), host_with_energy(45), 5)
            .await
            .unwrap();

        assert_eq!(report.rounds_played, 2);
        assert_eq!(report.stopped_early.as_deref(), Some("not enough energy"));
        assert_eq!(report.energy_left, 5);
    }

    #[tokio::test]
    async fn test_session_state_lands_on_host() {
        let session = DemoSession::with_defaults();
        let sdk = GameSdk::new(session.channel.clone());

        let report = play_session(&sdk, "tests", 1).await.unwrap();
        assert_eq!(report.rounds_played, 1);

        let player = session.host.player();
        assert_eq!(player.state.unwrap().data, json!({"round": 1, "lastScore": 25}));
        assert_eq!(session.host.tracked_score("gp-1"), Some(25));
        assert!(session.host.has_exited());
    }

    // =========================================================================
    // SDK CALLS
    // =========================================================================

    #[tokio::test]
    async fn test_signed_result_verifies_with_host_key() {
        let mut host = HostConfig::default();
        host.signing_key = Some("host-secret".to_string());
        let session = DemoSession::start(BridgeConfig::default(), host);
        let sdk = GameSdk::new(session.channel.clone());

        let play = sdk.play().await.unwrap();
        let signature = sdk.sign_result(&play.game_play_id, &play.token, 80).await.unwrap();

        let payload = SignPayload {
            game_play_id: play.game_play_id.clone(),
            game_token: play.token.clone(),
            score: 80,
        };
        assert!(verify_payload(&payload, Some(b"host-secret".as_slice()), &signature).unwrap());
        assert!(!verify_payload(&payload, Some(b"other".as_slice()), &signature).unwrap());
    }

    #[tokio::test]
    async fn test_init_and_player() {
        let session = DemoSession::with_defaults();
        let sdk = GameSdk::new(session.channel.clone());

        let init = sdk
            .init(&SdkInitParams {
                client_id: "client-1".into(),
                version: None,
            })
            .await
            .unwrap();
        assert!(!init.current_timestamp.is_empty());

        let player = sdk.get_player().await.unwrap();
        assert_eq!(player.name, "Player 1");
        assert_eq!(player.energy, 300);
        assert_eq!(player.game_energy, 20);
    }

    #[tokio::test]
    async fn test_host_errors_are_typed() {
        let session = DemoSession::start(BridgeConfig::default(), host_with_energy(0));
        let sdk = GameSdk::new(session.channel.clone());

        let err = sdk.play().await.unwrap_err();
        assert_eq!(err.error_code(), Some(ErrorCode::NotEnoughEnergy));

        let err = sdk.buy_tickets().await.unwrap_err();
        assert_eq!(err.as_remote(), Some(&RemoteError::system("not supported")));

        let err = sdk
            .use_in_game_item(&ItemPayload {
                item_id: "item1".into(),
                gameplay_id: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), Some(ErrorCode::InvalidRequest));
    }

    #[tokio::test]
    async fn test_shop_purchase_flow() {
        let session = DemoSession::with_defaults();
        let sdk = GameSdk::new(session.channel.clone());

        let items = sdk.get_in_game_items().await.unwrap();
        assert_eq!(items.items.len(), 1);

        let payload = ItemPayload {
            item_id: items.items[0].id.clone(),
            gameplay_id: Some("gp-1".into()),
        };
        let bought = sdk.buy_in_game_item(&payload).await.unwrap();
        assert_eq!(bought.item.id, "item1");

        let used = sdk.use_in_game_item(&payload).await.unwrap();
        assert!(used.success);
        assert_eq!(session.host.player().balance_nps, 90);
    }

    #[tokio::test]
    async fn test_fire_and_forget_actions_resolve_empty() {
        let session = DemoSession::with_defaults();
        let sdk = GameSdk::new(session.channel.clone());

        sdk.show_leaderboard().await.unwrap();
        sdk.show_shop().await.unwrap();
        sdk.exit(true).await.unwrap();
        assert!(session.host.has_exited());
        assert_eq!(session.channel.pending_count(), 0);
    }

    // =========================================================================
    // ROUTING
    // =========================================================================

    #[tokio::test]
    async fn test_unknown_action_answered_with_system_error() {
        let session = DemoSession::with_defaults();

        let err = session
            .channel
            .dispatch("TELEPORT", Some(json!({"to": "moon"})))
            .await
            .unwrap_err();

        assert_eq!(err.code(), codes::SYSTEM_ERROR);
        assert_eq!(
            err.as_remote().map(|e| e.message.as_str()),
            Some("missing handler for action TELEPORT")
        );
    }

    #[tokio::test]
    async fn test_partial_registry_answers_missing_actions() {
        let mut registry = ActionRegistry::new();
        registry.register_fn(Action::GetPlayer, |_| {
            Ok(Some(json!({"id": "p9", "name": "Nine", "energy": 1, "gameEnergy": 1})))
        });

        let relaxed = HostConfig {
            require_all_actions: false,
            ..HostConfig::default()
        };
        let strict = HostConfig::default();
        assert!(HostResponder::from_config(&strict, registry.clone()).is_err());
        let responder = HostResponder::from_config(&relaxed, registry).unwrap();

        let (frame, host_end) = duplex(8);
        tokio::spawn(async move {
            let _ = responder.run(&host_end, &host_end).await;
        });
        let frame = Arc::new(frame);
        let channel = Arc::new(
            BridgeChannel::open(BridgeConfig::default(), frame.clone(), frame).unwrap(),
        );
        let sdk = GameSdk::new(channel);

        assert_eq!(sdk.get_player().await.unwrap().id, "p9");
        let err = sdk.show_shop().await.unwrap_err();
        assert_eq!(err.code(), codes::SYSTEM_ERROR);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mismatched_tag_is_never_answered() {
        let bridge = BridgeConfig::default()
            .with_protocol_tag("other-sdk")
            .with_default_timeout(Duration::from_secs(2));
        let session = DemoSession::start(bridge, HostConfig::default());

        let err = session.channel.dispatch("GET_PLAYER", None).await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(session.channel.pending_count(), 0);
    }
}
