use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::debug;

use crate::cache::ObjectCache;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 注销：清除 refresh token cookie，并让当前 access token 的账号缓存失效
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(token) = JwtUtils::extract_bearer_token(request)
        && let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>()
    {
        cache.remove(&RequireJWT::cache_key(&token)).await;
        debug!("Evicted cached account for logged out token");
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaObjectCache;
    use crate::utils::jwt::REFRESH_COOKIE_NAME;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    #[tokio::test]
    async fn test_logout_evicts_cached_account() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaObjectCache::new(100, 300));
        let key = RequireJWT::cache_key("token-abc");
        cache.insert_raw(key.clone(), "{}".to_string(), 300).await;

        let request = TestRequest::default()
            .insert_header(("Authorization", "Bearer token-abc"))
            .app_data(web::Data::new(cache.clone()))
            .to_http_request();
        let resp = handle_logout(&request).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .cookies()
            .find(|c| c.name() == REFRESH_COOKIE_NAME)
            .unwrap();
        assert!(cookie.value().is_empty());
        assert!(cache.get_json::<serde_json::Value>(&key).await.is_none());
    }
}
