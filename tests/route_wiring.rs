//! Route wiring tests: mount order, the auth gate, the RPC placeholder,
//! and the webhook byte passthrough, all over real sockets.

use std::net::SocketAddr;
use std::time::Duration;

use storefront_server::config::ServerConfig;
use storefront_server::http::HttpServer;
use storefront_server::lifecycle::Shutdown;

mod common;

fn test_config(server: SocketAddr, cms: SocketAddr, render: SocketAddr) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.host = server.ip().to_string();
    config.listener.port = server.port();
    config.upstreams.cms_url = format!("http://{cms}");
    config.upstreams.render_url = format!("http://{render}");
    config
}

async fn start_server(config: ServerConfig) -> Shutdown {
    let addr = format!("{}:{}", config.listener.host, config.listener.port);
    let server = HttpServer::new(config).expect("server config should be valid");
    server.init().await.expect("CMS mock should be reachable");

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    shutdown
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_cart_redirects_unauthenticated() {
    let server_addr: SocketAddr = "127.0.0.1:38110".parse().unwrap();
    let cms_addr: SocketAddr = "127.0.0.1:38111".parse().unwrap();
    let render_addr: SocketAddr = "127.0.0.1:38112".parse().unwrap();

    let _cms_rx = common::start_upstream(cms_addr, 401, "Unauthorized").await;
    let mut render_rx = common::start_upstream(render_addr, 200, "rendered").await;

    let shutdown = start_server(test_config(server_addr, cms_addr, render_addr)).await;

    let res = client()
        .get(format!("http://{server_addr}/cart?x=1"))
        .send()
        .await
        .expect("server unreachable");

    assert!(
        res.status().is_redirection(),
        "expected redirect, got {}",
        res.status()
    );
    assert_eq!(
        res.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("/sign-in?origin=cart")
    );

    // The renderer must not have been consulted.
    assert!(common::drain(&mut render_rx).is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_cart_renders_authenticated_with_query() {
    let server_addr: SocketAddr = "127.0.0.1:38120".parse().unwrap();
    let cms_addr: SocketAddr = "127.0.0.1:38121".parse().unwrap();
    let render_addr: SocketAddr = "127.0.0.1:38122".parse().unwrap();

    let _cms_rx = common::start_programmable_upstream(cms_addr, |req| {
        if req.target == "/api/users/me" {
            (200, r#"{"user":{"id":"u_1","email":"a@example.com"}}"#.into())
        } else {
            (200, "ok".into())
        }
    })
    .await;
    let mut render_rx = common::start_upstream(render_addr, 200, "rendered cart").await;

    let shutdown = start_server(test_config(server_addr, cms_addr, render_addr)).await;

    let res = client()
        .get(format!("http://{server_addr}/cart?x=1&y=2"))
        .header("cookie", "payload-token=abc")
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "rendered cart");

    let seen = common::drain(&mut render_rx);
    assert_eq!(seen.len(), 1, "renderer should be invoked exactly once");
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].target, "/cart?x=1&y=2");

    shutdown.trigger();
}

#[tokio::test]
async fn test_rpc_placeholder_query() {
    let server_addr: SocketAddr = "127.0.0.1:38130".parse().unwrap();
    let cms_addr: SocketAddr = "127.0.0.1:38131".parse().unwrap();
    let render_addr: SocketAddr = "127.0.0.1:38132".parse().unwrap();

    let _cms_rx = common::start_upstream(cms_addr, 200, "ok").await;
    let mut render_rx = common::start_upstream(render_addr, 200, "rendered").await;

    let shutdown = start_server(test_config(server_addr, cms_addr, render_addr)).await;

    let res = client()
        .get(format!("http://{server_addr}/api/trpc/anyApiRoute"))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["result"]["data"], "Hello from API");

    // Any method reaches the namespace.
    let res = client()
        .post(format!("http://{server_addr}/api/trpc/anyApiRoute"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    // Unknown procedures are a router-level 404, not a render fallthrough.
    let res = client()
        .get(format!("http://{server_addr}/api/trpc/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    assert!(common::drain(&mut render_rx).is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_webhook_preserves_raw_body() {
    let server_addr: SocketAddr = "127.0.0.1:38140".parse().unwrap();
    let cms_addr: SocketAddr = "127.0.0.1:38141".parse().unwrap();
    let render_addr: SocketAddr = "127.0.0.1:38142".parse().unwrap();

    let mut cms_rx = common::start_programmable_upstream(cms_addr, |req| {
        if req.method == "POST" && req.target == "/api/webhooks/stripe" {
            (200, "received".into())
        } else {
            (200, "ok".into())
        }
    })
    .await;
    let _render_rx = common::start_upstream(render_addr, 200, "rendered").await;

    let shutdown = start_server(test_config(server_addr, cms_addr, render_addr)).await;

    // Deliberately odd whitespace: the bytes must survive untouched.
    let payload: &[u8] = b"{\"id\": \"evt_1\",\t  \"type\": \"payment_intent.succeeded\"  }";

    let res = client()
        .post(format!("http://{server_addr}/api/webhooks/stripe"))
        .header("stripe-signature", "t=123,v1=abc")
        .header("content-type", "application/json")
        .body(payload.to_vec())
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "received");

    let seen = common::drain(&mut cms_rx);
    let event = seen
        .iter()
        .find(|r| r.method == "POST" && r.target == "/api/webhooks/stripe")
        .expect("verifier should receive the event");
    assert_eq!(event.body, payload, "body must arrive byte-identical");
    assert_eq!(event.header("stripe-signature"), Some("t=123,v1=abc"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_catch_all_last_and_specific_routes_first() {
    let server_addr: SocketAddr = "127.0.0.1:38150".parse().unwrap();
    let cms_addr: SocketAddr = "127.0.0.1:38151".parse().unwrap();
    let render_addr: SocketAddr = "127.0.0.1:38152".parse().unwrap();

    let _cms_rx = common::start_upstream(cms_addr, 404, "no session").await;
    let mut render_rx = common::start_upstream(render_addr, 200, "page").await;

    let shutdown = start_server(test_config(server_addr, cms_addr, render_addr)).await;

    let http = client();
    let base = format!("http://{server_addr}");

    // Specific routes answer for themselves...
    let res = http.get(format!("{base}/api/trpc/anyApiRoute")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let res = http.get(format!("{base}/cart")).send().await.unwrap();
    assert!(res.status().is_redirection());

    // ...and only the unclaimed path reaches the renderer.
    let res = http.get(format!("{base}/products/1?ref=home")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "page");

    let seen = common::drain(&mut render_rx);
    let targets: Vec<_> = seen.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(targets, vec!["/products/1?ref=home"]);

    shutdown.trigger();
}
