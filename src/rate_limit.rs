//!
//! # Authentication Rate Limiting
//!
//! Fixed-window request counting, keyed by peer address, applied to the two
//! pre-authentication endpoints only. Registration and login are the
//! credential-guessing surface; everything else already requires a valid
//! token. State is in-process: one window map shared across workers.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ResponseError,
    Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::AppError;

const LIMITED_PATHS: &[&str] = &["/auth/register", "/auth/login"];

type WindowMap = Arc<Mutex<HashMap<String, (Instant, u32)>>>;

#[derive(Clone)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    hits: WindowMap,
}

impl RateLimiter {
    pub fn new(window_secs: u64, max_requests: u32) -> Self {
        Self {
            window: Duration::from_secs(window_secs),
            max_requests,
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimiterService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterService {
            service,
            window: self.window,
            max_requests: self.max_requests,
            hits: Arc::clone(&self.hits),
        }))
    }
}

pub struct RateLimiterService<S> {
    service: S,
    window: Duration,
    max_requests: u32,
    hits: WindowMap,
}

impl<S> RateLimiterService<S> {
    /// Counts the request against the caller's window. Returns the error to
    /// respond with when the caller is over the limit.
    fn check(&self, req: &ServiceRequest) -> Option<AppError> {
        if !LIMITED_PATHS.contains(&req.path()) {
            return None;
        }

        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        let now = Instant::now();

        let mut hits = match self.hits.lock() {
            Ok(hits) => hits,
            Err(_) => {
                return Some(AppError::InternalServerError(
                    "Rate limiter state poisoned".into(),
                ))
            }
        };

        if hits.len() > 1024 {
            let window = self.window;
            hits.retain(|_, (start, _)| now.duration_since(*start) <= window);
        }

        let entry = hits.entry(key).or_insert((now, 0));
        if now.duration_since(entry.0) > self.window {
            *entry = (now, 0);
        }
        entry.1 += 1;

        if entry.1 > self.max_requests {
            Some(AppError::TooManyRequests(
                "Too many authentication attempts, please try again later".into(),
            ))
        } else {
            None
        }
    }
}

impl<S, B> Service<ServiceRequest> for RateLimiterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(error) = self.check(&req) {
            let response = error.error_response().map_into_right_body();
            return Box::pin(ready(Ok(req.into_response(response))));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
