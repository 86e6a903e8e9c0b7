//! Authentication service for login, token generation, and password utilities.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info, warn};
use mongodb::bson::oid::ObjectId;

use crate::config::CONFIG;
use crate::constants::{
    CODE_ACCOUNT_DEACTIVATED, CODE_INVALID_CREDENTIALS, ERR_ACCOUNT_DEACTIVATED,
    ERR_INVALID_CREDENTIALS, ROLE_USER,
};
use crate::errors::ApiError;
use crate::models::{Admin, LoginRequest, TokenClaims, User};
use crate::repositories::{AdminRepository, UserRepository};
use crate::utils::log_sanitizer::mask_email;

/// Service for customer and back-office logins.
pub struct AuthService {
    users: Arc<UserRepository>,
    admins: Arc<AdminRepository>,
}

impl AuthService {
    pub fn new(users: Arc<UserRepository>, admins: Arc<AdminRepository>) -> Self {
        Self { users, admins }
    }

    /// Authenticate a customer and return a JWT token.
    pub async fn login_user(&self, req: LoginRequest) -> Result<(User, String), ApiError> {
        let user = self.users.find_by_email(&req.email).await?.ok_or_else(|| {
            warn!("Login failed: no customer with email {}", mask_email(&req.email));
            invalid_credentials()
        })?;

        if !verify_password(&req.password, &user.password_hash)? {
            warn!("Login failed: wrong password for {}", mask_email(&user.email));
            return Err(invalid_credentials());
        }

        if !user.is_active {
            return Err(deactivated());
        }

        let user_id = user
            .id
            .ok_or_else(|| ApiError::internal("Stored user has no id"))?;
        self.users.update_last_login(user_id).await?;

        let token = generate_token(user_id, &user.email, ROLE_USER)?;
        info!("Customer {} logged in", mask_email(&user.email));

        Ok((user, token))
    }

    /// Authenticate an admin. The token carries the admin's own role.
    pub async fn login_admin(&self, req: LoginRequest) -> Result<(Admin, String), ApiError> {
        let admin = self.admins.find_by_email(&req.email).await?.ok_or_else(|| {
            warn!("Admin login failed: no admin with email {}", mask_email(&req.email));
            invalid_credentials()
        })?;

        if !verify_password(&req.password, &admin.password_hash)? {
            warn!("Admin login failed: wrong password for {}", mask_email(&admin.email));
            return Err(invalid_credentials());
        }

        if !admin.is_active {
            return Err(deactivated());
        }

        let admin_id = admin
            .id
            .ok_or_else(|| ApiError::internal("Stored admin has no id"))?;
        self.admins.update_last_login(admin_id).await?;

        let token = generate_token(admin_id, &admin.email, admin.role.as_str())?;
        info!("Admin {} logged in as {}", mask_email(&admin.email), admin.role);

        Ok((admin, token))
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized(CODE_INVALID_CREDENTIALS, ERR_INVALID_CREDENTIALS)
}

fn deactivated() -> ApiError {
    ApiError::unauthorized(CODE_ACCOUNT_DEACTIVATED, ERR_ACCOUNT_DEACTIVATED)
}

/// Hash a password using bcrypt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    Ok(verify(password, hash)?)
}

/// Generate a JWT token for an account.
pub fn generate_token(account_id: ObjectId, email: &str, role: &str) -> Result<String, ApiError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + (CONFIG.jwt_expiration_hours as usize * 3600);

    let claims = TokenClaims {
        sub: account_id.to_hex(),
        email: email.to_string(),
        role: role.to_string(),
        exp,
        iat: now,
    };

    debug!("Generated token for {} with role {}", mask_email(email), role);

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
    )?)
}

/// Validate signature and expiry of a bearer token.
pub fn decode_token(token: &str) -> Result<TokenClaims, ApiError> {
    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CODE_INVALID_TOKEN, ROLE_SUPERADMIN};

    #[test]
    fn test_token_round_trip_keeps_role() {
        let id = ObjectId::new();
        let token = generate_token(id, "ops@example.com", ROLE_SUPERADMIN).unwrap();
        let claims = decode_token(&token).unwrap();

        assert_eq!(claims.sub, id.to_hex());
        assert_eq!(claims.role, ROLE_SUPERADMIN);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = generate_token(ObjectId::new(), "a@b.com", ROLE_USER).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');

        assert_eq!(decode_token(&tampered).unwrap_err().code(), CODE_INVALID_TOKEN);
        assert!(decode_token("not.a.jwt").is_err());
    }

    #[test]
    fn test_verify_password() {
        let hashed = bcrypt::hash("SecurePass123!", 4).unwrap();
        assert!(verify_password("SecurePass123!", &hashed).unwrap());
        assert!(!verify_password("WrongPass123!", &hashed).unwrap());
    }
}
