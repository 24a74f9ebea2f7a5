//! HTTP ledger client against a mock Prism node

use prism_ct_ledger::{Error, HttpPrismClient, PrismLedgerClient};
use prism_ct_types::{Base64, Sha256Hash};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOG_ID: &str = "TnWjJ1yaEMM4W2zU3z9S6x3w4I4bjWnAsfpksWKaOd8=";

fn snapshot_blob(tree_size: u64, root: &Sha256Hash) -> String {
    let json = json!({ "tree_size": tree_size, "sha256_root_hash": root.to_base64() });
    Base64::encode(json.to_string().as_bytes()).to_string()
}

#[tokio::test]
async fn test_fetch_account() {
    let server = MockServer::start().await;
    let root = Sha256Hash::from_bytes([0x5a; 32]);

    Mock::given(method("POST"))
        .and(path("/get-account"))
        .and(body_json(json!({ "id": LOG_ID })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account": {
                "id": LOG_ID,
                "nonce": 2,
                "valid_keys": [{ "algorithm": "ed25519", "bytes": "AQID" }],
                "signed_data": [
                    { "key": { "algorithm": "ed25519", "bytes": "AQID" }, "data": snapshot_blob(10, &Sha256Hash::from_bytes([1; 32])) },
                    { "key": { "algorithm": "ed25519", "bytes": "AQID" }, "data": snapshot_blob(20, &root) }
                ],
                "service_challenge": null
            },
            "proof": {
                "leaf": "ab".repeat(32),
                "siblings": ["cd".repeat(32), "ef".repeat(32)]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpPrismClient::new(format!("{}/", server.uri()));
    let account = client.fetch_account(LOG_ID).await.unwrap();

    assert_eq!(account.account.id, LOG_ID);
    assert_eq!(account.proof.leaf, Sha256Hash::from_bytes([0xab; 32]));
    assert_eq!(account.proof.siblings.len(), 2);

    let snapshot = account.latest_snapshot().unwrap();
    assert_eq!(snapshot.tree_size, 20);
    assert_eq!(snapshot.root_hash, root);
}

#[tokio::test]
async fn test_get_commitment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-current-commitment"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "commitment": "aa".repeat(32) })),
        )
        .mount(&server)
        .await;

    let client = HttpPrismClient::new(server.uri());
    let commitment = client.get_commitment().await.unwrap();
    assert_eq!(commitment.as_hash(), &Sha256Hash::from_bytes([0xaa; 32]));
}

#[tokio::test]
async fn test_malformed_proof_fails_closed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get-account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account": { "id": LOG_ID, "nonce": 0 },
            "proof": { "leaf": "zz", "siblings": [] }
        })))
        .mount(&server)
        .await;

    let client = HttpPrismClient::new(server.uri());
    assert!(matches!(
        client.fetch_account(LOG_ID).await,
        Err(Error::Types(_))
    ));
}

#[tokio::test]
async fn test_wrongly_shaped_body_is_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get-account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account": { "id": LOG_ID, "nonce": 0 },
            "proof": { "leaf": "ab".repeat(32), "siblings": 5 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get-current-commitment"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpPrismClient::new(server.uri());
    assert!(matches!(
        client.fetch_account(LOG_ID).await,
        Err(Error::Json(_))
    ));
    assert!(matches!(client.get_commitment().await, Err(Error::Json(_))));
}

#[tokio::test]
async fn test_unknown_account_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get-account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account": null,
            "proof": { "siblings": [] }
        })))
        .mount(&server)
        .await;

    let client = HttpPrismClient::new(server.uri());
    assert!(matches!(
        client.fetch_account(LOG_ID).await,
        Err(Error::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-current-commitment"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = HttpPrismClient::new(server.uri());
    assert!(matches!(client.get_commitment().await, Err(Error::Api(_))));
}
