use crate::config::{CorsConfig, CorsPolicy};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use std::time::Duration;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

const ANY_ALLOW_METHODS: &str = "POST, OPTIONS";
const ANY_ALLOW_HEADERS: &str = "content-type";

/// Applies the CORS policy to a router. Under `any`, regular responses also
/// carry the allowed methods and headers, not only preflight responses.
pub fn with_cors<S>(router: Router<S>, config: &CorsConfig, policy: CorsPolicy) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let router = router.layer(cors_layer(config, policy));
    match policy {
        CorsPolicy::Any => router
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ANY_ALLOW_METHODS),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ANY_ALLOW_HEADERS),
            )),
        CorsPolicy::AllowList => router,
    }
}

/// Builds the CORS layer for one router. Every `OPTIONS` request is
/// answered by the layer itself with an empty 200 response.
pub fn cors_layer(config: &CorsConfig, policy: CorsPolicy) -> CorsLayer {
    match policy {
        CorsPolicy::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
        CorsPolicy::AllowList => {
            let origins = config.origins();
            CorsLayer::new()
                .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
                    origin
                        .to_str()
                        .map(|origin| origin_allowed(&origins, origin))
                        .unwrap_or(false)
                }))
                .allow_credentials(true)
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .max_age(Duration::from_secs(600))
        }
    }
}

/// Exact match, or `scheme://*.suffix` matching any subdomain of `suffix`.
pub fn origin_allowed(allowed: &[String], origin: &str) -> bool {
    allowed.iter().any(|pattern| {
        if pattern == "*" || pattern == origin {
            return true;
        }
        let Some((scheme, host_pattern)) = pattern.split_once("://") else {
            return false;
        };
        let Some(suffix) = host_pattern.strip_prefix("*.") else {
            return false;
        };
        origin
            .strip_prefix(scheme)
            .and_then(|rest| rest.strip_prefix("://"))
            .and_then(|host| host.strip_suffix(suffix))
            .and_then(|sub| sub.strip_suffix('.'))
            .is_some_and(|sub| !sub.is_empty())
    })
}
