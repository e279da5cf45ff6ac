//! Router Module Tests
//!
//! Validates client-side routing and dispatch against real shard servers.
//!
//! ## Test Scopes
//! - **Routing**: Node normalization, determinism, node set changes, empty ring.
//! - **Dispatch**: Status propagation, network failures, per-request timeout.
//! - **End-to-End**: A three-shard cluster where each key must land only on its owner.

#[cfg(test)]
mod tests {
    use crate::config::parse_assignments;
    use crate::error::{RingError, RouteError};
    use crate::hashring::Strategy;
    use crate::router::client::normalize_node;
    use crate::router::{Router, RouterConfig};
    use crate::storage::server::Cluster;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::time::Duration;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    fn config(strategy: Strategy) -> RouterConfig {
        RouterConfig {
            strategy,
            request_timeout: Duration::from_millis(500),
            default_host: "127.0.0.1".to_string(),
        }
    }

    /// An address nothing listens on.
    async fn closed_addr() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind(SocketAddr::new(LOCALHOST, 0))
            .await
            .unwrap();
        listener.local_addr().unwrap()
    }

    // ============================================================
    // ROUTING TESTS
    // ============================================================

    #[test]
    fn test_normalize_node() {
        assert_eq!(normalize_node(":8001", "localhost"), "http://localhost:8001");
        assert_eq!(normalize_node("127.0.0.1:8001", "localhost"), "http://127.0.0.1:8001");
        assert_eq!(normalize_node("http://localhost:8001/", "x"), "http://localhost:8001");
        assert_eq!(normalize_node(" https://shard-1 ", "x"), "https://shard-1");
    }

    #[test]
    fn test_route_matches_hash_ring() {
        let router = Router::new(
            [":8001", ":8002", ":8003"],
            RouterConfig {
                strategy: Strategy::Rendezvous,
                ..RouterConfig::default()
            },
        )
        .unwrap();

        assert_eq!(router.route("1").unwrap(), "http://localhost:8001");
        assert_eq!(router.route("2").unwrap(), "http://localhost:8003");
        assert_eq!(router.route("3").unwrap(), "http://localhost:8002");
    }

    #[test]
    fn test_route_is_deterministic_across_routers() {
        for strategy in [Strategy::Ring, Strategy::Rendezvous] {
            let nodes = [":8001", ":8002", ":8003", ":8004"];
            let r1 = Router::new(nodes, config(strategy)).unwrap();
            let r2 = Router::new(nodes, config(strategy)).unwrap();

            for i in 0..200 {
                let key = i.to_string();
                assert_eq!(r1.route(&key).unwrap(), r2.route(&key).unwrap());
            }
        }
    }

    #[test]
    fn test_empty_router_reports_empty_ring() {
        let router = Router::new(Vec::<String>::new(), RouterConfig::default()).unwrap();

        assert!(matches!(
            router.route("1"),
            Err(RouteError::Ring(RingError::EmptyRing))
        ));
    }

    #[test]
    fn test_duplicate_nodes_are_rejected() {
        // Both spellings normalize to the same base URL
        let result = Router::new([":8001", "localhost:8001"], RouterConfig::default());

        assert!(matches!(
            result,
            Err(RouteError::Ring(RingError::DuplicateNode(_)))
        ));
    }

    #[test]
    fn test_add_and_remove_nodes() {
        let mut router = Router::new([":8001"], RouterConfig::default()).unwrap();
        assert_eq!(router.route("42").unwrap(), "http://localhost:8001");

        router.add_node(":8002").unwrap();
        assert_eq!(router.nodes().len(), 2);

        router.remove_node(":8001").unwrap();
        assert_eq!(router.route("42").unwrap(), "http://localhost:8002");

        assert!(matches!(
            router.remove_node(":8001"),
            Err(RouteError::Ring(RingError::NodeNotFound(_)))
        ));
    }

    // ============================================================
    // DISPATCH TESTS
    // ============================================================

    #[tokio::test]
    async fn test_dispatch_returns_server_status() {
        let cluster = Cluster::start(LOCALHOST, [0]).await.unwrap();
        let addr = cluster.addrs()[0];
        let node = format!("http://{}", addr);
        let router = Router::new([node.as_str()], config(Strategy::Ring)).unwrap();

        let status = router.dispatch(&node, "9", "Z").await.unwrap();
        assert_eq!(status, reqwest::StatusCode::NO_CONTENT);
        assert_eq!(cluster.store(addr).unwrap().get(9).unwrap(), "Z");

        // Malformed key: the server answers 404, the status is handed back as-is
        let status = router.dispatch(&node, "abc", "Z").await.unwrap();
        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reserved_characters_stay_inside_their_segment() {
        let cluster = Cluster::start(LOCALHOST, [0]).await.unwrap();
        let addr = cluster.addrs()[0];
        let node = format!("http://{}", addr);
        let router = Router::new([node.as_str()], config(Strategy::Ring)).unwrap();

        // Cut at the `?` this would be `PUT /1` and get 405
        let status = router.dispatch(&node, "1?x", "A").await.unwrap();
        assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
        assert!(cluster.store(addr).unwrap().is_empty());

        // Cut at the `#` this would read key 1
        cluster.store(addr).unwrap().set(1, "A");
        assert_eq!(router.fetch(&node, "1#x").await.unwrap(), None);
        assert_eq!(router.fetch(&node, "1").await.unwrap().as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_put_rejects_non_success_status() {
        let cluster = Cluster::start(LOCALHOST, [0]).await.unwrap();
        let node = format!("http://{}", cluster.addrs()[0]);
        let router = Router::new([node.as_str()], config(Strategy::Ring)).unwrap();

        let result = router.put("not-a-number", "A").await;
        assert!(matches!(
            result,
            Err(RouteError::UnexpectedStatus { status, .. }) if status == reqwest::StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn test_dispatch_to_dead_node_is_network_error() {
        let dead = format!("http://{}", closed_addr().await);
        let router = Router::new([dead.as_str()], config(Strategy::Ring)).unwrap();

        let result = router.dispatch(&dead, "1", "A").await;
        assert!(matches!(result, Err(RouteError::Network { .. })));
    }

    #[tokio::test]
    async fn test_dispatch_times_out_on_stalled_node() {
        let listener = tokio::net::TcpListener::bind(SocketAddr::new(LOCALHOST, 0))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();

        // Accepts connections and never answers
        let stall = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let node = format!("http://{}", addr);
        let router = Router::new(
            [node.as_str()],
            RouterConfig {
                request_timeout: Duration::from_millis(200),
                ..config(Strategy::Ring)
            },
        )
        .unwrap();

        let started = std::time::Instant::now();
        let result = router.dispatch(&node, "1", "A").await;
        stall.abort();

        match result {
            Err(RouteError::Network { source, .. }) => assert!(source.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_batch_continues_after_failures() {
        let cluster = Cluster::start(LOCALHOST, [0]).await.unwrap();
        let live = format!("http://{}", cluster.addrs()[0]);
        let dead = format!("http://{}", closed_addr().await);

        let router = Router::new(
            [live.as_str(), dead.as_str()],
            config(Strategy::Rendezvous),
        )
        .unwrap();

        let pairs: Vec<(String, String)> = (1..=20)
            .map(|i| (i.to_string(), format!("V{i}")))
            .collect();
        let reports = router.put_batch(&pairs).await;

        assert_eq!(reports.len(), pairs.len());
        for report in &reports {
            let owner = router.route(&report.key).unwrap();
            if owner == live {
                assert_eq!(report.node(), Some(live.as_str()));
            } else {
                assert!(matches!(report.outcome, Err(RouteError::Network { .. })));
            }
        }

        let stored = cluster.store(cluster.addrs()[0]).unwrap().len();
        let succeeded = reports.iter().filter(|r| r.is_success()).count();
        assert_eq!(stored, succeeded);
    }

    // ============================================================
    // END-TO-END
    // ============================================================

    async fn assert_keys_land_on_owner_only(strategy: Strategy) {
        let cluster = Cluster::start(LOCALHOST, [0, 0, 0]).await.unwrap();
        let nodes: Vec<String> = cluster
            .addrs()
            .iter()
            .map(|addr| format!(":{}", addr.port()))
            .collect();
        let router = Router::new(&nodes, config(strategy)).unwrap();

        let pairs = parse_assignments("1->A,2->B,3->C").unwrap();
        let reports = router.put_batch(&pairs).await;
        assert!(reports.iter().all(|r| r.is_success()), "{reports:?}");

        for (key, value) in &pairs {
            let owner = router.route(key).unwrap().to_string();

            assert_eq!(router.get(key).await.unwrap().as_deref(), Some(value.as_str()));
            for node in router.nodes() {
                let found = router.fetch(&node, key).await.unwrap();
                if node == owner {
                    assert_eq!(found.as_deref(), Some(value.as_str()));
                } else {
                    assert_eq!(found, None, "{key} leaked to {node}");
                }
            }
        }

        let total: usize = cluster
            .addrs()
            .iter()
            .map(|addr| cluster.store(*addr).unwrap().len())
            .sum();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_end_to_end_ring() {
        assert_keys_land_on_owner_only(Strategy::Ring).await;
    }

    #[tokio::test]
    async fn test_end_to_end_rendezvous() {
        assert_keys_land_on_owner_only(Strategy::Rendezvous).await;
    }
}
