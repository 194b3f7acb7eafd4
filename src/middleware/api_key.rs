use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method, StatusCode},
    Error, HttpMessage, HttpResponse,
};
use futures::future::{FutureExt, LocalBoxFuture};
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::connectors::{ApiKeyConnector, ApiKeyIdentity};
use crate::mcp::JsonRpcError;

const DEFAULT_INVALID_MESSAGE: &str = "Invalid or expired API key";

/// Bearer API-key check for POSTs on the MCP endpoint.
///
/// Other verbs pass straight through. An accepted key leaves an
/// [`ApiKeyIdentity`] in the request extensions.
pub struct ApiKeyGate {
    connector: Arc<dyn ApiKeyConnector>,
}

impl ApiKeyGate {
    pub fn new(connector: Arc<dyn ApiKeyConnector>) -> Self {
        Self { connector }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyGateMiddleware {
            service: Rc::new(service),
            connector: self.connector.clone(),
        }))
    }
}

pub struct ApiKeyGateMiddleware<S> {
    service: Rc<S>,
    connector: Arc<dyn ApiKeyConnector>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyGateMiddleware<S>
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
        let connector = self.connector.clone();

        async move {
            if req.method() != Method::POST {
                return service.call(req).await.map(|res| res.map_into_left_body());
            }

            let identity = match authenticate(&req, connector.as_ref()).await {
                Ok(identity) => identity,
                Err(rejection) => {
                    tracing::info!(reason = ?rejection, "MCP request rejected by API key gate");
                    let response = rejection.into_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            if let Some(api_key_id) = identity.api_key_id.clone() {
                spawn_usage_recording(connector, api_key_id);
            }
            req.extensions_mut().insert(identity);

            service.call(req).await.map(|res| res.map_into_left_body())
        }
        .boxed_local()
    }
}

#[derive(Debug)]
enum Rejection {
    MissingCredential,
    InvalidCredential(String),
    ValidatorFailed,
}

impl Rejection {
    fn into_response(self) -> HttpResponse {
        let (status, error) = match self {
            Rejection::MissingCredential => {
                (StatusCode::UNAUTHORIZED, JsonRpcError::missing_credential())
            }
            Rejection::InvalidCredential(message) => {
                (StatusCode::FORBIDDEN, JsonRpcError::invalid_credential(&message))
            }
            Rejection::ValidatorFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                JsonRpcError::invalid_credential("API key validation failed"),
            ),
        };
        HttpResponse::build(status).json(error.into_response_body())
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[tracing::instrument(name = "Authenticate API key", skip_all)]
async fn authenticate(
    req: &ServiceRequest,
    connector: &dyn ApiKeyConnector,
) -> Result<ApiKeyIdentity, Rejection> {
    let token = bearer_token(req).ok_or(Rejection::MissingCredential)?;

    let validation = connector.validate(&token).await.map_err(|err| {
        tracing::error!("API key validation failed: {}", err);
        Rejection::ValidatorFailed
    })?;

    if !validation.valid {
        let message = validation
            .error
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_INVALID_MESSAGE.to_string());
        return Err(Rejection::InvalidCredential(message));
    }

    Ok(validation.identity())
}

fn spawn_usage_recording(connector: Arc<dyn ApiKeyConnector>, api_key_id: String) {
    actix_web::rt::spawn(async move {
        if let Err(err) = connector.record_usage(&api_key_id).await {
            tracing::debug!(api_key_id = %api_key_id, "Failed to record API key usage: {}", err);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::key_service::mock::MockApiKeyConnector;
    use crate::connectors::ApiKeyValidation;
    use actix_web::{test, web, App, HttpRequest};
    use serde_json::{json, Value};
    use std::sync::atomic::Ordering;

    async fn whoami(req: HttpRequest) -> HttpResponse {
        let identity = req.extensions().get::<ApiKeyIdentity>().cloned();
        HttpResponse::Ok().json(json!({
            "user": identity.and_then(|i| i.user_id),
        }))
    }

    macro_rules! gated_app {
        ($connector:expr) => {
            test::init_service(
                App::new().service(
                    web::resource("/mcp")
                        .wrap(ApiKeyGate::new($connector))
                        .route(web::post().to(whoami))
                        .route(web::get().to(whoami)),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let app = gated_app!(Arc::new(MockApiKeyConnector::accepting("u", "k")));
        let req = test::TestRequest::post().uri("/mcp").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], -32001);
        assert_eq!(
            body["error"]["message"],
            "API key required. Include Authorization: Bearer YOUR_API_KEY header."
        );
        assert_eq!(body["id"], Value::Null);
    }

    #[actix_web::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let app = gated_app!(Arc::new(MockApiKeyConnector::accepting("u", "k")));
        let req = test::TestRequest::post()
            .uri("/mcp")
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn rejected_key_is_forbidden_with_validator_message() {
        let app = gated_app!(Arc::new(MockApiKeyConnector::rejecting(
            ApiKeyValidation::rejected("Key revoked")
        )));
        let req = test::TestRequest::post()
            .uri("/mcp")
            .insert_header(("Authorization", "Bearer appleui_sk_x"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], -32002);
        assert_eq!(body["error"]["message"], "Key revoked");
    }

    #[actix_web::test]
    async fn rejected_key_without_message_uses_default() {
        let app = gated_app!(Arc::new(MockApiKeyConnector::rejecting(
            ApiKeyValidation::default()
        )));
        let req = test::TestRequest::post()
            .uri("/mcp")
            .insert_header(("Authorization", "Bearer appleui_sk_x"))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["error"]["message"], "Invalid or expired API key");
    }

    #[actix_web::test]
    async fn validator_failure_is_server_error() {
        let app = gated_app!(Arc::new(MockApiKeyConnector::failing()));
        let req = test::TestRequest::post()
            .uri("/mcp")
            .insert_header(("Authorization", "Bearer appleui_sk_x"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], -32002);
        assert_eq!(body["error"]["message"], "API key validation failed");
    }

    #[actix_web::test]
    async fn accepted_key_attaches_identity_and_records_usage() {
        let connector = Arc::new(MockApiKeyConnector::accepting("user-7", "key-7").with_failing_usage());
        let app = gated_app!(connector.clone());
        let req = test::TestRequest::post()
            .uri("/mcp")
            .insert_header(("Authorization", "Bearer appleui_sk_x"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["user"], "user-7");

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(connector.usage_calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn get_is_not_gated() {
        let app = gated_app!(Arc::new(MockApiKeyConnector::failing()));
        let req = test::TestRequest::get().uri("/mcp").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
