//! Outbound HTTP plumbing.
//!
//! Every network-dependent operation goes through [`safe_api_call`], which
//! turns transport outcomes into the closed [`ApiResult`] type. Interceptors
//! wrap each exchange; the connectivity monitor reports reachability.

mod client;
mod connectivity;
mod interceptor;
mod pipeline;
mod result;

pub use client::{ApiClient, ApiRequest, CallError, HttpResponse, ResponseHead};
pub use connectivity::{
    CallbackId, ConnectivityMonitor, ConnectivityStream, HostReachability, ProbeReachability,
    ReachabilityCallback, ReachabilitySource,
};
pub use interceptor::{AuthInterceptor, Interceptor, SessionExpiryInterceptor};
pub use pipeline::{resolve, safe_api_call, ApiStream, NoContent, ResponseBody};
pub use result::{ApiError, ApiResult, ErrorKind};
