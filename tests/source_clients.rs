use fee_heartbeat::error::Error;
use fee_heartbeat::fee_sources::connectors::blockstream::BlockstreamClient;
use fee_heartbeat::fee_sources::connectors::etherscan::EtherscanClient;
use fee_heartbeat::fee_sources::connectors::{BtcFeeSource, EthGasSource};
use fee_heartbeat::fee_sources::SourceId;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "TESTKEY";

async fn blockstream(response: ResponseTemplate) -> (MockServer, BlockstreamClient) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/fee-estimates"))
        .respond_with(response)
        .mount(&server)
        .await;

    let client = BlockstreamClient::new(
        reqwest::Client::new(),
        &format!("{}/api/fee-estimates", server.uri()),
    );
    (server, client)
}

async fn etherscan(response: ResponseTemplate) -> (MockServer, EtherscanClient) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("module", "gastracker"))
        .and(query_param("action", "gasoracle"))
        .and(query_param("apikey", API_KEY))
        .respond_with(response)
        .mount(&server)
        .await;

    let client = EtherscanClient::new(reqwest::Client::new(), &format!("{}/api", server.uri()), API_KEY);
    (server, client)
}

fn gas_oracle(safe: &str, propose: &str, fast: &str) -> serde_json::Value {
    json!({
        "status": "1",
        "message": "OK",
        "result": {
            "LastBlock": "19774000",
            "SafeGasPrice": safe,
            "ProposeGasPrice": propose,
            "FastGasPrice": fast,
            "suggestBaseFee": "9.1",
            "gasUsedRatio": "0.4,0.6"
        }
    })
}

fn assert_unavailable(err: Error, expected: SourceId) {
    match err {
        Error::UpstreamUnavailable { source_id, .. } => assert_eq!(source_id, expected),
        other => panic!("expected UpstreamUnavailable, got {:?}", other),
    }
}

fn assert_malformed(err: Error, expected: SourceId) {
    match err {
        Error::UpstreamMalformed { source_id, .. } => assert_eq!(source_id, expected),
        other => panic!("expected UpstreamMalformed, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Blockstream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn btc_reads_next_block_estimate() {
    let body = json!({ "1": 12.0, "2": 10.4, "3": 9.0, "144": 1.2 });
    let (_server, client) = blockstream(ResponseTemplate::new(200).set_body_json(body)).await;

    assert_eq!(client.fastest_fee_rate().await.unwrap(), 12.0);
}

#[tokio::test]
async fn btc_keeps_fractional_rate() {
    let body = json!({ "1": 3.512, "6": 2.0 });
    let (_server, client) = blockstream(ResponseTemplate::new(200).set_body_json(body)).await;

    assert_eq!(client.fastest_fee_rate().await.unwrap(), 3.512);
}

#[tokio::test]
async fn btc_ignores_odd_values_at_other_targets() {
    let body = json!({ "1": 12.0, "2": null, "25": "n/a" });
    let (_server, client) = blockstream(ResponseTemplate::new(200).set_body_json(body)).await;

    assert_eq!(client.fastest_fee_rate().await.unwrap(), 12.0);
}

#[tokio::test]
async fn btc_non_numeric_target_is_malformed() {
    let body = json!({ "1": "fast", "2": 10.4 });
    let (_server, client) = blockstream(ResponseTemplate::new(200).set_body_json(body)).await;

    assert_malformed(client.fastest_fee_rate().await.unwrap_err(), SourceId::Btc);
}

#[tokio::test]
async fn btc_missing_target_is_malformed() {
    let body = json!({ "2": 10.4, "3": 9.0 });
    let (_server, client) = blockstream(ResponseTemplate::new(200).set_body_json(body)).await;

    assert_malformed(client.fastest_fee_rate().await.unwrap_err(), SourceId::Btc);
}

#[tokio::test]
async fn btc_non_json_body_is_malformed() {
    let (_server, client) = blockstream(ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

    assert_malformed(client.fastest_fee_rate().await.unwrap_err(), SourceId::Btc);
}

#[tokio::test]
async fn btc_zero_rate_is_malformed() {
    let (_server, client) = blockstream(ResponseTemplate::new(200).set_body_json(json!({ "1": 0.0 }))).await;

    assert_malformed(client.fastest_fee_rate().await.unwrap_err(), SourceId::Btc);
}

#[tokio::test]
async fn btc_server_error_is_unavailable() {
    let (server, client) = blockstream(ResponseTemplate::new(503)).await;

    assert_unavailable(client.fastest_fee_rate().await.unwrap_err(), SourceId::Btc);
    // single attempt, no internal retry
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn btc_connection_refused_is_unavailable() {
    let client = BlockstreamClient::new(reqwest::Client::new(), "http://127.0.0.1:1/api/fee-estimates");

    assert_unavailable(client.fastest_fee_rate().await.unwrap_err(), SourceId::Btc);
}

// ---------------------------------------------------------------------------
// Etherscan
// ---------------------------------------------------------------------------

#[tokio::test]
async fn eth_reads_three_tiers() {
    let (_server, client) = etherscan(ResponseTemplate::new(200).set_body_json(gas_oracle("10", "15", "20"))).await;

    let tiers = client.gas_tiers().await.unwrap();
    assert_eq!(tiers.safe, 10.0);
    assert_eq!(tiers.propose, 15.0);
    assert_eq!(tiers.fast, 20.0);
}

#[tokio::test]
async fn eth_keeps_decimal_tiers() {
    let body = gas_oracle("0.512", "0.6", "1.25");
    let (_server, client) = etherscan(ResponseTemplate::new(200).set_body_json(body)).await;

    let tiers = client.gas_tiers().await.unwrap();
    assert_eq!(tiers.safe, 0.512);
    assert_eq!(tiers.fast, 1.25);
}

#[tokio::test]
async fn eth_rejected_key_is_malformed() {
    let body = json!({ "status": "0", "message": "NOTOK", "result": "Invalid API Key" });
    let (_server, client) = etherscan(ResponseTemplate::new(200).set_body_json(body)).await;

    let err = client.gas_tiers().await.unwrap_err();
    assert!(err.to_string().contains("Invalid API Key"));
    assert_malformed(err, SourceId::Eth);
}

#[tokio::test]
async fn eth_missing_tier_is_malformed() {
    let body = json!({
        "status": "1",
        "message": "OK",
        "result": { "SafeGasPrice": "10", "ProposeGasPrice": "15" }
    });
    let (_server, client) = etherscan(ResponseTemplate::new(200).set_body_json(body)).await;

    assert_malformed(client.gas_tiers().await.unwrap_err(), SourceId::Eth);
}

#[tokio::test]
async fn eth_non_numeric_tier_is_malformed() {
    let (_server, client) = etherscan(ResponseTemplate::new(200).set_body_json(gas_oracle("10", "fast", "20"))).await;

    assert_malformed(client.gas_tiers().await.unwrap_err(), SourceId::Eth);
}

#[tokio::test]
async fn eth_server_error_is_unavailable() {
    let (_server, client) = etherscan(ResponseTemplate::new(500)).await;

    let err = client.gas_tiers().await.unwrap_err();
    assert!(!err.to_string().contains(API_KEY), "error leaked the API key: {}", err);
    assert_unavailable(err, SourceId::Eth);
}

#[tokio::test]
async fn eth_sends_api_key_as_query_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gas_oracle("1", "2", "3")))
        .mount(&server)
        .await;

    let client = EtherscanClient::new(reqwest::Client::new(), &format!("{}/api", server.uri()), "OTHERKEY");
    client.gas_tiers().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(query.contains("module=gastracker"));
    assert!(query.contains("action=gasoracle"));
    assert!(query.contains("apikey=OTHERKEY"));
}
