//! Integration tests for AppContext lifecycle
//!
//! Timers are created per artwork, reused while open, and torn down on
//! close or shutdown without touching the remote session.

use std::sync::Arc;

use atelier_domain::{AtelierError, Config, ServiceConfig};
use atelier_lib::context::AppContext;
use wiremock::MockServer;

fn config(base_url: &str) -> Config {
    Config {
        service: ServiceConfig { base_url: base_url.to_string(), api_token: None, timeout_secs: None },
        ..Config::default()
    }
}

#[test]
fn test_context_rejects_invalid_base_url() {
    let result = AppContext::new_with_config(config("::not a url::"));
    assert!(matches!(result, Err(AtelierError::Config(_))));
}

#[tokio::test]
async fn test_open_timer_reuses_existing_timer() {
    let server = MockServer::start().await;
    let ctx = AppContext::new_with_config(config(&server.uri())).unwrap();

    let (first, created_first) = ctx.open_timer("art-1").await.unwrap();
    let (second, created_second) = ctx.open_timer("art-1").await.unwrap();
    let (_other, created_other) = ctx.open_timer("art-2").await.unwrap();

    assert!(created_first);
    assert!(!created_second);
    assert!(created_other);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(ctx.open_timer_count().await, 2);
    assert_eq!(first.artwork_id(), "art-1");
}

#[tokio::test]
async fn test_open_timer_rejects_blank_artwork() {
    let server = MockServer::start().await;
    let ctx = AppContext::new_with_config(config(&server.uri())).unwrap();

    let result = ctx.open_timer("  ").await;
    assert!(matches!(result, Err(AtelierError::InvalidInput(_))));
}

#[tokio::test]
async fn test_close_and_shutdown() {
    let server = MockServer::start().await;
    let ctx = AppContext::new_with_config(config(&server.uri())).unwrap();
    ctx.open_timer("art-1").await.unwrap();
    ctx.open_timer("art-2").await.unwrap();

    assert!(ctx.close_timer("art-1").await);
    assert!(!ctx.close_timer("art-1").await);
    assert!(matches!(ctx.timer("art-1").await, Err(AtelierError::NotFound(_))));

    ctx.shutdown().await.unwrap();
    assert_eq!(ctx.open_timer_count().await, 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}
