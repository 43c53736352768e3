pub mod rate_limit;
pub mod request_id;

pub use rate_limit::{
    AuthRateLimitStores, AuthRateLimiter, GlobalRateLimiter, RateLimitConfig, RateLimitMiddleware, RateLimitStore,
};
pub use request_id::{CorrelationId, RequestIdExt, RequestIdMiddleware};
