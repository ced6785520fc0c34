//! Request log middleware for Actix Web.
//!
//! Every request that passes through the middleware is recorded in the [`LiveMonitor`] request log once the response
//! is ready, along with its status and duration. Callers identify themselves with the `X-Request-Source` header;
//! requests without one are tagged `external`.
//!
//! The push channel itself (`/ws`) is not recorded.
use std::{
    future::{ready, Ready},
    rc::Rc,
    time::Instant,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use log::trace;

use super::monitor::LiveMonitor;
use crate::RequestLog;

pub const REQUEST_SOURCE_HEADER: &str = "X-Request-Source";
pub const EXTERNAL_SOURCE: &str = "external";
const PUSH_CHANNEL_PATH: &str = "/ws";

pub struct AccessLogMiddlewareFactory {
    monitor: LiveMonitor,
    destination: String,
}

impl AccessLogMiddlewareFactory {
    /// `destination` is the name of the service being called, e.g. `backend`.
    pub fn new(monitor: LiveMonitor, destination: &str) -> Self {
        Self { monitor, destination: destination.to_string() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessLogMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AccessLogMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogMiddlewareService {
            monitor: self.monitor.clone(),
            destination: self.destination.clone(),
            service: Rc::new(service),
        }))
    }
}

pub struct AccessLogMiddlewareService<S> {
    monitor: LiveMonitor,
    destination: String,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AccessLogMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        if req.path() == PUSH_CHANNEL_PATH {
            return Box::pin(async move { service.call(req).await });
        }
        let source = req
            .headers()
            .get(REQUEST_SOURCE_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .unwrap_or(EXTERNAL_SOURCE)
            .to_string();
        let entry = RequestLog::new(&source, &self.destination, req.method().as_str(), req.path());
        let monitor = self.monitor.clone();
        Box::pin(async move {
            let start = Instant::now();
            let result = service.call(req).await;
            let status = match &result {
                Ok(res) => res.status(),
                Err(e) => e.as_response_error().status_code(),
            };
            trace!("📡️ {} {} from {source} -> {status}", entry.method, entry.path);
            monitor.record_request(entry.completed(status.as_u16(), start.elapsed()));
            result
        })
    }
}
