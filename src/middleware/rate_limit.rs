use actix_web::{
    Error, HttpResponse, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::LocalBoxFuture;
use std::{
    collections::HashMap,
    net::IpAddr,
    rc::Rc,
    sync::{Arc, Mutex, MutexGuard},
};
use uuid::Uuid;

use crate::handlers::shared::ApiResponse;
use crate::middleware::request_id::RequestIdExt;
use crate::services::auth::claims_from_request;

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    pub window_seconds: i64,
    /// Returned in the 429 body
    pub message: String,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            max_requests,
            window_seconds,
            message: "Rate limit exceeded. Please try again later.".to_string(),
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    fn window(&self) -> Duration {
        Duration::try_seconds(self.window_seconds).unwrap_or(Duration::seconds(60))
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(100, 60)
    }
}

/// Who a request is counted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitKey {
    Ip(IpAddr),
    User(Uuid),
}

#[derive(Debug, Clone)]
struct Window {
    count: u32,
    started_at: DateTime<Utc>,
}

impl Window {
    fn open(now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            started_at: now,
        }
    }

    fn is_expired(&self, window: Duration, now: DateTime<Utc>) -> bool {
        now >= self.started_at + window
    }
}

/// Fixed-window request counters, shared between workers.
#[derive(Clone, Default)]
pub struct RateLimitStore {
    windows: Arc<Mutex<HashMap<RateLimitKey, Window>>>,
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn windows(&self) -> MutexGuard<'_, HashMap<RateLimitKey, Window>> {
        // A poisoned map only holds counters, keep using it.
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Counts one request against `key`. Returns `false` once the window is
    /// exhausted.
    pub fn check_and_update(
        &self,
        key: RateLimitKey,
        config: &RateLimitConfig,
        now: DateTime<Utc>,
    ) -> bool {
        let mut windows = self.windows();
        let entry = windows.entry(key).or_insert_with(|| Window::open(now));

        if entry.is_expired(config.window(), now) {
            *entry = Window::open(now);
        }

        if entry.count >= config.max_requests {
            return false;
        }

        entry.count += 1;
        true
    }

    pub fn cleanup_expired(&self, max_age: Duration, now: DateTime<Utc>) {
        self.windows()
            .retain(|_, window| !window.is_expired(max_age, now));
    }

    pub fn len(&self) -> usize {
        self.windows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct RateLimitMiddleware {
    store: RateLimitStore,
    config: RateLimitConfig,
    per_user: bool,
}

impl RateLimitMiddleware {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_store(config, RateLimitStore::new())
    }

    pub fn with_store(config: RateLimitConfig, store: RateLimitStore) -> Self {
        Self {
            store,
            config,
            per_user: false,
        }
    }

    /// Also count requests carrying a valid bearer token against the user.
    pub fn per_user(mut self) -> Self {
        self.per_user = true;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = futures_util::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        futures_util::future::ready(Ok(RateLimitService {
            service: Rc::new(service),
            store: self.store.clone(),
            config: self.config.clone(),
            per_user: self.per_user,
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    store: RateLimitStore,
    config: RateLimitConfig,
    per_user: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let store = self.store.clone();
        let config = self.config.clone();
        let per_user = self.per_user;

        Box::pin(async move {
            let now = Utc::now();
            let mut keys = Vec::with_capacity(2);

            if let Some(ip) = req.peer_addr().map(|addr| addr.ip()) {
                keys.push(RateLimitKey::Ip(ip));
            }
            if per_user {
                if let Some(claims) = claims_from_request(req.request()) {
                    keys.push(RateLimitKey::User(claims.user_id()));
                }
            }

            for key in keys {
                if !store.check_and_update(key, &config, now) {
                    log::warn!(
                        "Rate limit exceeded for {:?} on {} (correlation_id={})",
                        key,
                        req.path(),
                        req.correlation_id().unwrap_or_default()
                    );
                    let response = HttpResponse::TooManyRequests()
                        .json(ApiResponse::<()>::error(&config.message));
                    return Ok(req.into_response(response).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Counters behind the login and registration limits. Built once per
/// process; every worker clones the same maps.
#[derive(Clone, Default)]
pub struct AuthRateLimitStores {
    pub login: RateLimitStore,
    pub registration: RateLimitStore,
}

impl AuthRateLimitStores {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Stricter limits for the unauthenticated auth endpoints.
pub struct AuthRateLimiter;

impl AuthRateLimiter {
    pub fn login(store: RateLimitStore) -> RateLimitMiddleware {
        RateLimitMiddleware::with_store(
            RateLimitConfig::new(5, 300)
                .with_message("Too many login attempts. Please try again in 5 minutes."),
            store,
        )
    }

    pub fn registration(store: RateLimitStore) -> RateLimitMiddleware {
        RateLimitMiddleware::with_store(
            RateLimitConfig::new(3, 3600)
                .with_message("Too many registration attempts. Please try again later."),
            store,
        )
    }
}

pub struct GlobalRateLimiter;

impl GlobalRateLimiter {
    pub fn general(store: RateLimitStore) -> RateLimitMiddleware {
        RateLimitMiddleware::with_store(RateLimitConfig::new(100, 60), store).per_user()
    }
}

/// Drops windows older than an hour every `interval_seconds`.
pub async fn cleanup_rate_limits(store: RateLimitStore, interval_seconds: u64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        store.cleanup_expired(Duration::hours(1), Utc::now());
        log::debug!("Cleaned up expired rate limit entries");
    }
}
