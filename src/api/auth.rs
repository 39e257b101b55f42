use std::sync::Arc;

use super::{ApiCall, LoginRequest};
use crate::network::{ApiClient, ApiRequest};

/// `auth/*` endpoints.
#[derive(Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn login(&self, request: &LoginRequest) -> ApiCall {
        self.call(ApiRequest::post("auth/login").json(request))
    }

    pub fn logout(&self) -> ApiCall {
        self.call(ApiRequest::post("auth/logout"))
    }

    fn call(&self, request: ApiRequest) -> ApiCall {
        let client = Arc::clone(&self.client);
        Box::pin(async move { client.send(request).await })
    }
}
