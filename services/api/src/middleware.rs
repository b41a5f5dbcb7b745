//! Edge policies: CORS and per-client rate limiting.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde_json::json;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};

type ClientLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub(crate) const MAX_TRACKED_CLIENTS: usize = 10_000;
pub(crate) const CLIENT_IDLE_TTL: Duration = Duration::from_secs(600);

struct ClientEntry {
    limiter: Arc<ClientLimiter>,
    last_seen: Instant,
}

/// Independent token bucket per client IP.
///
/// Entries idle for longer than the TTL are evicted, and the map never grows past
/// `max_clients`; when it is full of active clients the least recently seen go first.
pub(crate) struct ClientRateLimiter {
    clients: RwLock<HashMap<IpAddr, ClientEntry>>,
    quota: Quota,
    idle_ttl: Duration,
    max_clients: usize,
}

impl ClientRateLimiter {
    pub(crate) fn new(requests_per_second: u32) -> Self {
        Self::with_limits(requests_per_second, CLIENT_IDLE_TTL, MAX_TRACKED_CLIENTS)
    }

    pub(crate) fn with_limits(
        requests_per_second: u32,
        idle_ttl: Duration,
        max_clients: usize,
    ) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            clients: RwLock::new(HashMap::new()),
            quota: Quota::per_second(per_second),
            idle_ttl,
            max_clients: max_clients.max(1),
        }
    }

    /// `true` when the request fits in the client's bucket.
    pub(crate) async fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now()).await
    }

    async fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        let limiter = {
            let mut clients = self.clients.write().await;
            if !clients.contains_key(&ip) && clients.len() >= self.max_clients {
                self.evict(&mut clients, now);
            }
            let entry = clients.entry(ip).or_insert_with(|| ClientEntry {
                limiter: Arc::new(RateLimiter::direct(self.quota)),
                last_seen: now,
            });
            entry.last_seen = now;
            Arc::clone(&entry.limiter)
        };
        limiter.check().is_ok()
    }

    fn evict(&self, clients: &mut HashMap<IpAddr, ClientEntry>, now: Instant) {
        let before = clients.len();
        clients.retain(|_, entry| now.saturating_duration_since(entry.last_seen) < self.idle_ttl);

        if clients.len() >= self.max_clients {
            let mut by_age: Vec<(IpAddr, Instant)> = clients
                .iter()
                .map(|(ip, entry)| (*ip, entry.last_seen))
                .collect();
            by_age.sort_by_key(|(_, last_seen)| *last_seen);
            let excess = clients.len() + 1 - self.max_clients;
            for (ip, _) in by_age.into_iter().take(excess) {
                clients.remove(&ip);
            }
            warn!(
                evicted = before - clients.len(),
                "rate limiter at capacity, evicted least recently seen clients"
            );
        } else {
            debug!(evicted = before - clients.len(), "evicted idle rate limiter entries");
        }
    }

    #[cfg(test)]
    pub(crate) async fn tracked_clients(&self) -> usize {
        self.clients.read().await.len()
    }
}

pub(crate) async fn rate_limit(
    State(limiter): State<Arc<ClientRateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ip) = client_ip(&request) {
        if !limiter.check(ip).await {
            warn!(%ip, path = %request.uri().path(), "rate limit exceeded");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, "1")],
                Json(json!({ "error": "Rate limit exceeded. Please try again later." })),
            )
                .into_response();
        }
    }
    next.run(request).await
}

/// Peer address first; forwarding headers only when no socket info is attached.
fn client_ip(request: &Request<Body>) -> Option<IpAddr> {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return Some(addr.ip());
    }

    let headers = request.headers();
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse().ok())
        })
}

pub(crate) fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any)
            .max_age(Duration::from_secs(600));
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .allow_origin(origins)
        .max_age(Duration::from_secs(600))
}
