//! # Reply Ordering Property
//!
//! For any number of concurrent requests and any permutation of their
//! replies, every caller receives exactly the payload addressed to its own
//! request id, and the pending table ends empty.

#[cfg(test)]
mod tests {
    use crate::integration::harness::Harness;
    use futures::future::join_all;
    use game_bridge::BridgeConfig;
    use proptest::prelude::*;
    use rand::seq::SliceRandom;
    use serde_json::json;
    use std::time::Duration;

    fn run_permutation(count: usize, order: &[usize]) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            // Room for every request, since nothing reads them until all are sent.
            let harness = Harness::new(BridgeConfig {
                channel_buffer: count + 1,
                ..BridgeConfig::default()
            });

            let mut replies = Vec::with_capacity(count);
            for _ in 0..count {
                replies.push(
                    harness
                        .channel
                        .send_request("GET_LEADERBOARD", None, Duration::from_secs(30))
                        .await
                        .unwrap(),
                );
            }

            let mut requests = Vec::with_capacity(count);
            for _ in 0..count {
                requests.push(harness.next_request().await);
            }

            for &index in order {
                let request_id = requests[index].request_id;
                harness
                    .reply(request_id, json!({"for": request_id.get()}))
                    .await;
            }

            let ids: Vec<u64> = replies.iter().map(|r| r.request_id().get()).collect();
            let results = join_all(replies).await;
            for (id, result) in ids.into_iter().zip(results) {
                assert_eq!(result.unwrap(), Some(json!({"for": id})));
            }
            assert_eq!(harness.channel.pending_count(), 0);
        });
    }

    fn count_and_order() -> impl Strategy<Value = (usize, Vec<usize>)> {
        (1usize..24).prop_flat_map(|count| {
            let identity: Vec<usize> = (0..count).collect();
            (Just(count), Just(identity).prop_shuffle())
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_any_reply_order_settles_every_caller((count, order) in count_and_order()) {
            run_permutation(count, &order);
        }
    }

    #[test]
    fn test_random_large_batch() {
        let mut order: Vec<usize> = (0..200).collect();
        order.shuffle(&mut rand::thread_rng());
        run_permutation(200, &order);
    }
}
