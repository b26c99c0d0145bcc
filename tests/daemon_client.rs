//! `DaemonConnector` against a loopback wallet daemon.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use kaspawallet::wallet::client::{
    BroadcastRequest, BroadcastResponse, CreateUnsignedTransactionsRequest, CreateUnsignedTransactionsResponse,
    DaemonErrorBody,
};
use kaspawallet::wallet::types::CreateUnsignedTransactions;
use kaspawallet::wallet::{CustodyClient, CustodyConnector, CustodyError, DaemonConnector};

#[derive(Clone, Default)]
struct DaemonState {
    reject_broadcast: bool,
    last_build: Arc<Mutex<Option<CreateUnsignedTransactionsRequest>>>,
    last_broadcast: Arc<Mutex<Vec<String>>>,
}

async fn start_mock_daemon(state: DaemonState) -> SocketAddr {
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(
            "/create-unsigned-transactions",
            post(
                |State(state): State<DaemonState>, Json(req): Json<CreateUnsignedTransactionsRequest>| async move {
                    let response = CreateUnsignedTransactionsResponse {
                        unsigned_transactions: vec![hex::encode(b"tx-a"), hex::encode(b"tx-b")],
                    };
                    *state.last_build.lock().unwrap() = Some(req);
                    Json(response)
                },
            ),
        )
        .route(
            "/broadcast",
            post(
                |State(state): State<DaemonState>, Json(req): Json<BroadcastRequest>| async move {
                    if state.reject_broadcast {
                        return Err((
                            StatusCode::BAD_REQUEST,
                            Json(DaemonErrorBody {
                                error: "orphan transaction".into(),
                            }),
                        ));
                    }
                    let tx_ids = (0..req.transactions.len()).map(|i| format!("id{}", i)).collect();
                    *state.last_broadcast.lock().unwrap() = req.transactions;
                    Ok(Json(BroadcastResponse { tx_ids }))
                },
            ),
        )
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn build_request() -> CreateUnsignedTransactions {
    CreateUnsignedTransactions {
        from: vec!["kaspatest:qqsource".into()],
        address: "kaspatest:qqdestination".into(),
        amount: 42,
        is_send_all: false,
        use_existing_change_address: true,
    }
}

#[tokio::test]
async fn test_build_and_broadcast_round_trip() {
    let state = DaemonState::default();
    let addr = start_mock_daemon(state.clone()).await;

    let connector = DaemonConnector::new(Duration::from_secs(2));
    let client = connector.connect(&addr.to_string()).await.unwrap();

    let unsigned = client.create_unsigned_transactions(build_request()).await.unwrap();
    assert_eq!(unsigned, vec![b"tx-a".to_vec(), b"tx-b".to_vec()]);

    let sent = state.last_build.lock().unwrap().clone().unwrap();
    assert_eq!(sent.address, "kaspatest:qqdestination");
    assert_eq!(sent.amount, 42);
    assert!(sent.use_existing_change_address);

    let ids = client.broadcast(unsigned).await.unwrap();
    assert_eq!(ids, ["id0".to_string(), "id1".to_string()]);
    assert_eq!(
        *state.last_broadcast.lock().unwrap(),
        [hex::encode(b"tx-a"), hex::encode(b"tx-b")]
    );
}

#[tokio::test]
async fn test_daemon_rejection_surfaces_message() {
    let addr = start_mock_daemon(DaemonState {
        reject_broadcast: true,
        ..Default::default()
    })
    .await;

    let client = DaemonConnector::new(Duration::from_secs(2))
        .connect(&format!("http://{}", addr))
        .await
        .unwrap();
    let err = client.broadcast(vec![b"tx".to_vec()]).await.unwrap_err();

    match err {
        CustodyError::Rejected { operation, message } => {
            assert_eq!(operation, "broadcast");
            assert_eq!(message, "orphan transaction");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_connect_requires_healthy_daemon() {
    // A server without /health answers 404 to the probe.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new()).await.unwrap();
    });

    let result = DaemonConnector::new(Duration::from_secs(2))
        .connect(&addr.to_string())
        .await;
    assert!(matches!(result, Err(CustodyError::Unreachable { .. })));
}
