use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error, Error,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    task::{Context, Poll},
    time::{Duration, Instant},
};

const WINDOW: Duration = Duration::from_secs(60);
// Past this many tracked clients, expired windows are dropped.
const PRUNE_THRESHOLD: usize = 10_000;

type ClientWindows = Arc<Mutex<HashMap<String, (u32, Instant)>>>;

/// Fixed-window limiter keyed by client IP. A limit of 0 lets everything through.
#[derive(Clone)]
pub struct RateLimiter {
    requests_per_minute: u32,
    clients: ClientWindows,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        RateLimiter {
            requests_per_minute,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RateLimiterMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimiterMiddleware {
            service,
            requests_per_minute: self.requests_per_minute,
            clients: self.clients.clone(),
        })
    }
}

pub struct RateLimiterMiddleware<S> {
    service: S,
    requests_per_minute: u32,
    clients: ClientWindows,
}

impl<S> RateLimiterMiddleware<S> {
    /// Counts one request from `ip`, returning false once the window is full.
    fn admit(&self, ip: &str, now: Instant) -> bool {
        let mut clients = match self.clients.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if clients.len() > PRUNE_THRESHOLD {
            clients.retain(|_, (_, started)| now.duration_since(*started) <= WINDOW);
        }

        match clients.get_mut(ip) {
            Some((count, started)) if now.duration_since(*started) <= WINDOW => {
                if *count >= self.requests_per_minute {
                    return false;
                }
                *count += 1;
            }
            Some(window) => *window = (1, now),
            None => {
                clients.insert(ip.to_string(), (1, now));
            }
        }
        true
    }
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.requests_per_minute > 0 && req.path() != "/health" {
            let ip = req
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string();

            if !self.admit(&ip, Instant::now()) {
                tracing::warn!(ip = %ip, "Rate limit exceeded");
                return Box::pin(async move {
                    Err(error::ErrorTooManyRequests(
                        "Rate limit exceeded. Try again later.",
                    ))
                });
            }
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}
