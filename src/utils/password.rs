use crate::config::AppConfig;
use crate::errors::SchoolSystemError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;
use rand::distr::Alphanumeric;

/// 哈希密码（Argon2id，参数取自配置）
pub fn hash_password(password: &str) -> Result<String, SchoolSystemError> {
    let config = AppConfig::get();
    let params = Params::new(
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
        None,
    )
    .map_err(|e| SchoolSystemError::validation(format!("Invalid Argon2 parameters: {e}")))?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SchoolSystemError::validation(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码，哈希串里自带参数
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// 生成满足密码策略的随机密码（用于初始管理员）
pub fn generate_random_password(len: usize) -> String {
    let len = len.max(8);
    let mut rng = rand::rng();
    loop {
        let candidate: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect();
        if super::validate::validate_password(&candidate).is_valid {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Homeroom2025").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Homeroom2025", &hash));
        assert!(!verify_password("homeroom2025", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn test_random_password_meets_policy() {
        for _ in 0..5 {
            let password = generate_random_password(16);
            assert_eq!(password.len(), 16);
            assert!(super::super::validate::validate_password(&password).is_valid);
        }
    }
}
