//! Runs the server on a real socket and drives it with an HTTP client.

use contacts_api::{ApiConfig, HttpServer, InMemoryContactStore, Shutdown};
use reqwest::multipart::Form;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::test]
async fn test_serves_over_tcp_and_shuts_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let store = InMemoryContactStore::default();
    let server = HttpServer::new(ApiConfig::default(), Arc::new(store.clone()));
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();
    let base = format!("http://{}/api/v1/contacts", addr);

    let res = client
        .post(&base)
        .multipart(Form::new().text("name", "Ada").text("favorite", "true"))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    let id = body["data"]["contacts"][0]["id"].as_u64().unwrap();

    let res = client.get(format!("{}/{}", base, id)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["contacts"]["name"], "Ada");

    let res = client
        .patch(format!("{}/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 405);

    assert_eq!(store.len(), 1);

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
