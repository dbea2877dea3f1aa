//! Sliding-window admission behavior, including through the executor.
//!
//! All cases run under a paused clock; waits auto-advance instantly while
//! still being observable through `tokio::time::Instant`.

use std::time::Duration;

use tokio::time::Instant;

use firstpromoter_client::{
    FirstPromoterClient, FirstPromoterConfig, RateLimiter, RequestSpec,
};
use firstpromoter_integration_tests::{MockTransport, response, scripted_client};

const WINDOW: Duration = Duration::from_secs(60);

#[tokio::test(start_paused = true)]
async fn test_no_window_exceeds_ceiling() {
    let ceiling = 3;
    let limiter = RateLimiter::new(ceiling);

    let mut admissions = Vec::new();
    for _ in 0..10 {
        limiter.admit().await;
        admissions.push(Instant::now());
    }

    // Any ceiling+1 consecutive admissions must span more than the window:
    // otherwise some 60s slice held more than `ceiling` requests.
    for pair in admissions.windows(ceiling + 1) {
        let (first, last) = (pair[0], pair[ceiling]);
        assert!(
            last.duration_since(first) >= WINDOW,
            "{} admissions landed within one window",
            ceiling + 1
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_burst_admits_without_delay_below_ceiling() {
    let limiter = RateLimiter::new(100);

    let start = Instant::now();
    for _ in 0..100 {
        limiter.admit().await;
    }
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_never_over_admit() {
    let limiter = std::sync::Arc::new(RateLimiter::new(4));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let limiter = limiter.clone();
        handles.push(tokio::spawn(async move {
            limiter.admit().await;
            Instant::now()
        }));
    }

    let mut admissions = Vec::new();
    for handle in handles {
        admissions.push(handle.await.expect("admit task should not panic"));
    }
    admissions.sort();

    for pair in admissions.windows(5) {
        assert!(pair[4].duration_since(pair[0]) >= WINDOW);
    }
}

#[tokio::test(start_paused = true)]
async fn test_retries_consume_rate_budget() {
    // Ceiling of 2 with a request that needs 3 attempts: the final attempt
    // must wait for the window to open, proving retries are not free.
    let transport = std::sync::Arc::new(MockTransport::new(vec![
        response(500, ""),
        response(500, ""),
        response(200, "{}"),
    ]));
    let config = FirstPromoterConfig::new("test-api-key", "test-account");
    let client =
        FirstPromoterClient::with_transport(config, transport.clone(), RateLimiter::new(2));

    let start = Instant::now();
    client
        .execute(RequestSpec::get("promoters"))
        .await
        .expect("final attempt should succeed");

    assert_eq!(transport.calls(), 3);
    assert!(start.elapsed() >= WINDOW);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_transparent_to_successful_calls() {
    let (client, transport) = scripted_client(vec![
        response(200, r#"{"page":1}"#),
        response(200, r#"{"page":2}"#),
    ]);

    let start = Instant::now();
    client
        .execute(RequestSpec::get("referrals").with_query("page", "1"))
        .await
        .expect("first call should succeed");
    client
        .execute(RequestSpec::get("referrals").with_query("page", "2"))
        .await
        .expect("second call should succeed");

    assert_eq!(transport.calls(), 2);
    assert_eq!(start.elapsed(), Duration::ZERO);
}
