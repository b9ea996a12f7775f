// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use std::net::{Ipv4Addr, TcpListener};
use std::str;
use std::sync::Arc;

use rolegate::client::{Client, Url};
use rolegate::relay::{self, OidcClient, Sessions, User};
use rolegate::server::{Builder, StaticVerifier};
use rolegate::types::{Payload, DEFAULT_ROLE_CLAIM};

use axum::http::{header, Request, StatusCode};
use futures::channel::oneshot::{channel, Sender};
use hyper::{Body, Server};
use openidconnect::core::CoreJsonWebKeySet;
use openidconnect::{AccessToken, AuthUrl, ClientId, IssuerUrl};
use tokio::task::JoinHandle;
use tower::util::ServiceExt;

fn verifier() -> StaticVerifier {
    StaticVerifier::new()
        .token("admin-token", "alice", "admin".parse().unwrap())
        .token("developer-token", "bob", "developer".parse().unwrap())
        .token("guest-token", "carol", "guest".parse().unwrap())
}

/// Serves the values API on an ephemeral port.
fn spawn_api() -> (String, Sender<()>, JoinHandle<hyper::Result<()>>) {
    let lis = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let addr = format!("http://{}", lis.local_addr().unwrap());

    let (tx, rx) = channel::<()>();
    let srv = tokio::spawn(
        Server::from_tcp(lis)
            .unwrap()
            .serve(Builder::new(verifier()).build_service())
            .with_graceful_shutdown(async { rx.await.ok().unwrap() }),
    );
    (addr, tx, srv)
}

#[tokio::test]
async fn app() {
    let (addr, tx, srv) = spawn_api();

    let cl = tokio::task::spawn_blocking(move || {
        let url = addr.parse::<Url>().unwrap();
        let admin = Client::builder(url.clone()).token("admin-token").build();
        let developer = Client::builder(url.clone()).token("developer-token").build();
        let guest = Client::builder(url.clone()).token("guest-token").build();
        let anonymous = Client::builder(url).build();

        let mut values = guest.values().list().unwrap();
        values.sort();
        assert_eq!(values, vec!["value1", "value2", "value3"]);
        assert_eq!(guest.values().get(2).unwrap(), Some("value2".into()));
        assert_eq!(guest.values().get(42).unwrap(), None);
        assert!(anonymous.values().list().is_err());

        let payload = Payload {
            id: 42,
            value: "forty-two".into(),
        };
        assert!(guest.values().create(&payload).is_err());
        assert!(developer.values().create(&payload).is_ok());
        assert_eq!(guest.values().get(42).unwrap(), Some("forty-two".into()));

        assert!(developer
            .values()
            .create(&Payload {
                id: 42,
                value: "ignored".into(),
            })
            .is_ok());
        assert_eq!(guest.values().get(42).unwrap(), Some("forty-two".into()));

        assert!(developer
            .values()
            .update(&Payload {
                id: 42,
                value: "updated".into(),
            })
            .is_ok());
        assert_eq!(guest.values().get(42).unwrap(), Some("updated".into()));

        assert!(developer.values().delete(42).is_err());
        assert!(admin.values().delete(42).is_ok());
        assert!(admin.values().delete(42).is_ok());
        assert_eq!(guest.values().get(42).unwrap(), None);
    });
    assert!(matches!(cl.await, Ok(())));

    // Stop server
    assert_eq!(tx.send(()), Ok(()));
    assert!(matches!(srv.await, Ok(Ok(()))));
}

fn relay_app(api_url: &str, sessions: &Arc<Sessions>) -> axum::Router {
    let client = OidcClient::new(
        ClientId::new("relay-client".into()),
        None,
        IssuerUrl::new("https://tenant.example/".into()).unwrap(),
        AuthUrl::new("https://tenant.example/authorize".into()).unwrap(),
        None,
        None,
        CoreJsonWebKeySet::new(vec![]),
    );
    relay::Builder::new(relay::Config {
        domain: "tenant.example".into(),
        client_id: "relay-client".into(),
        client_secret: None,
        audience: "http://auth0demoApi".into(),
        role_claim: DEFAULT_ROLE_CLAIM.into(),
        public_url: "http://localhost:5000/".parse().unwrap(),
        api_url: api_url.parse().unwrap(),
    })
    .sessions(Arc::clone(sessions))
    .build(client)
    .unwrap()
}

fn signed_in(sessions: &Sessions, token: &str, roles: &str) -> String {
    let id = sessions.authenticate(User::new(
        "auth0|user",
        None,
        roles.parse().unwrap(),
        AccessToken::new(token.into()),
        None,
    ));
    format!("SESSION={id}")
}

async fn get(app: &axum::Router, uri: &str, cookie: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    let body = serde_json::from_slice(&body)
        .unwrap_or_else(|_| str::from_utf8(&body).unwrap().into());
    (status, body)
}

#[tokio::test(flavor = "multi_thread")]
async fn relay_calls_api_with_session_token() {
    let (addr, tx, srv) = spawn_api();
    let sessions = Arc::new(Sessions::new());
    let app = relay_app(&addr, &sessions);

    let guest = signed_in(&sessions, "guest-token", "guest");
    let developer = signed_in(&sessions, "developer-token", "developer");

    let (status, body) = get(&app, "/Test/GetAllValues", &guest).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "GetAllValues");
    assert_eq!(body["result"].as_array().map(Vec::len), Some(3));

    let (status, body) = get(&app, "/Test/GetById", &guest).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "value2");

    let (status, body) = get(&app, "/Test/Delete", &guest).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.as_str().unwrap().contains("403"));

    let (status, body) = get(&app, "/Test/Create?id=7&value=seven", &developer).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["value"], "seven");

    let (status, _) = get(&app, "/Test/Update?id=7&value=eight", &developer).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/Test/GetById?id=7", &guest).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "eight");

    // Release the session clients and their pooled connections
    drop(app);
    drop(sessions);

    // Stop server
    assert_eq!(tx.send(()), Ok(()));
    assert!(matches!(srv.await, Ok(Ok(()))));
}
