use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Refresh Token 所在 Cookie 名称
pub const REFRESH_COOKIE_NAME: &str = "school_refresh_token";
/// Refresh Token Cookie 的作用路径，只随认证接口发送
pub const REFRESH_COOKIE_PATH: &str = "/api/v1/auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 账号ID
    pub role: String,       // 账号角色
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,         // 过期时间戳
    pub iat: usize,         // 签发时间戳
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse::<i64>().ok()
    }
}

// 签发结果
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    // refresh token 有效天数，用于设置 Cookie
    pub refresh_expiry_days: i64,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    /// Access Token 有效秒数
    pub fn access_token_ttl_seconds() -> i64 {
        AppConfig::get().jwt.access_token_expiry * 60
    }

    /// 签发指定类型与有效期的 Token
    pub fn generate_token(
        user_id: i64,
        role: &str,
        token_type: TokenType,
        expiry: chrono::Duration,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now();

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.as_str().to_string(),
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret().as_bytes()),
        )
    }

    pub fn generate_access_token(user_id: i64, role: &str) -> Result<String, JwtError> {
        Self::generate_token(
            user_id,
            role,
            TokenType::Access,
            chrono::Duration::seconds(Self::access_token_ttl_seconds()),
        )
    }

    /// 签发 access + refresh
    ///
    /// `remember_me` 为 true 时 refresh token 使用更长的有效期。
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        remember_me: bool,
    ) -> Result<TokenPair, JwtError> {
        let jwt = &AppConfig::get().jwt;
        let refresh_expiry_days = if remember_me {
            jwt.refresh_token_remember_me_expiry
        } else {
            jwt.refresh_token_expiry
        };

        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_token(
                user_id,
                role,
                TokenType::Refresh,
                chrono::Duration::days(refresh_expiry_days),
            )?,
            refresh_expiry_days,
        })
    }

    // 校验签名、过期时间与 token 类型
    pub fn verify_token(token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret().as_bytes()),
            &Validation::default(),
        )?
        .claims;

        if claims.token_type != expected.as_str() {
            return Err(JwtError::from(ErrorKind::InvalidToken));
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify_token(token, TokenType::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify_token(token, TokenType::Refresh)
    }

    /// 用 Refresh Token 换取新的 Access Token
    pub fn refresh_access_token(refresh_token: &str) -> Result<(Claims, String), JwtError> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| JwtError::from(ErrorKind::InvalidToken))?;
        let access_token = Self::generate_access_token(user_id, &claims.role)?;
        Ok((claims, access_token))
    }

    pub fn create_refresh_token_cookie(refresh_token: &str, expiry_days: i64) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, refresh_token.to_string())
            .path(REFRESH_COOKIE_PATH)
            .max_age(actix_web::cookie::time::Duration::days(expiry_days))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 清除 Refresh Token Cookie（注销或 token 失效时）
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, "")
            .path(REFRESH_COOKIE_PATH)
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    /// 从 Authorization 头提取 Bearer token
    pub fn extract_bearer_token(req: &actix_web::HttpRequest) -> Option<String> {
        req.headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}
