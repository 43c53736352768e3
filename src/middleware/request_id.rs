use std::future::{Ready, ready};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

const MAX_CORRELATION_ID_LEN: usize = 128;

/// Correlation id of the current request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    /// Keeps a caller-supplied id when it is short and header safe.
    fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_CORRELATION_ID_LEN)
            .map(|id| CorrelationId(id.to_string()))
            .unwrap_or_else(|| CorrelationId(Uuid::new_v4().to_string()))
    }
}

pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddlewareService { service }))
    }
}

pub struct RequestIdMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let correlation_id =
            CorrelationId::from_header(req.headers().get(CORRELATION_ID_HEADER));
        req.extensions_mut().insert(correlation_id.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            if let Ok(value) = HeaderValue::from_str(&correlation_id.0) {
                res.headers_mut()
                    .insert(HeaderName::from_static(CORRELATION_ID_HEADER), value);
            }

            Ok(res)
        })
    }
}

pub trait RequestIdExt {
    fn correlation_id(&self) -> Option<String>;
}

impl RequestIdExt for actix_web::HttpRequest {
    fn correlation_id(&self) -> Option<String> {
        self.extensions().get::<CorrelationId>().map(|id| id.0.clone())
    }
}

impl RequestIdExt for ServiceRequest {
    fn correlation_id(&self) -> Option<String> {
        self.extensions().get::<CorrelationId>().map(|id| id.0.clone())
    }
}
