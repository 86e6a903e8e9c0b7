//! Customer accounts: registration, self-service profile, and admin status changes.

use std::sync::Arc;

use log::{debug, info, warn};
use mongodb::bson::{doc, oid::ObjectId, Regex};

use crate::constants::{
    CODE_DUPLICATE_KEY, CODE_EMAIL_EXISTS, CODE_USER_NOT_FOUND, CODE_WRONG_PASSWORD,
    ERR_EMAIL_EXISTS, ERR_FAILED_FETCH_RECORD, ERR_USER_NOT_FOUND, ERR_WRONG_PASSWORD,
    MSG_USER_ACTIVATED_BULK, MSG_USER_DEACTIVATED_BULK,
};
use crate::errors::ApiError;
use crate::models::{
    BulkUpdateResponse, BulkUpdateResult, ChangePasswordRequest, PageParams, PaginatedResponse,
    RegisterRequest, UpdateProfileRequest, User, UserListQuery, UserResponse,
};
use crate::repositories::UserRepository;
use crate::services::auth_service::{hash_password, verify_password};
use crate::utils::log_sanitizer::mask_email;
use crate::validators::{parse_object_id, validate_password_different, validate_password_match};

pub struct UserService {
    repository: Arc<UserRepository>,
}

fn not_found() -> ApiError {
    ApiError::not_found(CODE_USER_NOT_FOUND, ERR_USER_NOT_FOUND)
}

/// A unique-index race on `email` surfaces as the same conflict as the pre-check.
fn email_conflict(err: ApiError) -> ApiError {
    if err.code() == CODE_DUPLICATE_KEY {
        ApiError::conflict(CODE_EMAIL_EXISTS, ERR_EMAIL_EXISTS)
    } else {
        err
    }
}

impl UserService {
    pub fn new(repository: Arc<UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<User, ApiError> {
        let email = req.email.trim().to_lowercase();
        if self.repository.find_by_email(&email).await?.is_some() {
            warn!("Registration rejected: {} already registered", mask_email(&email));
            return Err(ApiError::conflict(CODE_EMAIL_EXISTS, ERR_EMAIL_EXISTS));
        }

        let now = mongodb::bson::DateTime::now();
        let user = User {
            id: None,
            email,
            name: req.name.trim().to_string(),
            phone: req.phone,
            company_name: req.company_name,
            password_hash: hash_password(&req.password)?,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        };

        let id = self.repository.insert(&user).await.map_err(email_conflict)?;
        info!("Registered customer {}", mask_email(&user.email));

        Ok(User {
            id: Some(id),
            ..user
        })
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        let object_id = parse_object_id(user_id)?;
        self.repository
            .find_by_id(object_id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn list_users(
        &self,
        query: &UserListQuery,
    ) -> Result<PaginatedResponse<UserResponse>, ApiError> {
        let params = PageParams::new(query.page, query.per_page);
        let mut filter = doc! {};

        if let Some(is_active) = query.is_active {
            filter.insert("is_active", is_active);
        }

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let search_regex = Regex {
                pattern: regex::escape(search),
                options: "i".to_string(),
            };
            filter.insert(
                "$or",
                vec![
                    doc! { "email": { "$regex": &search_regex } },
                    doc! { "name": { "$regex": &search_regex } },
                ],
            );
        }

        let total = self.repository.count(filter.clone()).await?;
        let users = self
            .repository
            .find_with_filter(filter, params.skip(), params.limit())
            .await?;

        Ok(PaginatedResponse::new(
            users.into_iter().map(UserResponse::from).collect(),
            total,
            params,
        ))
    }

    /// Update the caller's own profile. Returns the stored document unchanged
    /// when nothing differs.
    pub async fn update_profile(
        &self,
        user_id: &str,
        req: UpdateProfileRequest,
    ) -> Result<User, ApiError> {
        let object_id = parse_object_id(user_id)?;
        let existing = self
            .repository
            .find_by_id(object_id)
            .await?
            .ok_or_else(not_found)?;

        let mut set = doc! {};

        if let Some(email) = req.email.map(|e| e.trim().to_lowercase()) {
            if email != existing.email {
                if let Some(other) = self.repository.find_by_email(&email).await? {
                    if other.id != existing.id {
                        warn!("Profile update rejected: {} is taken", mask_email(&email));
                        return Err(ApiError::conflict(CODE_EMAIL_EXISTS, ERR_EMAIL_EXISTS));
                    }
                }
                set.insert("email", email);
            }
        }

        if let Some(name) = req.name.map(|n| n.trim().to_string()) {
            if name != existing.name {
                set.insert("name", name);
            }
        }

        if let Some(phone) = req.phone {
            if Some(&phone) != existing.phone.as_ref() {
                set.insert("phone", phone);
            }
        }

        if let Some(company_name) = req.company_name {
            if Some(&company_name) != existing.company_name.as_ref() {
                set.insert("company_name", company_name);
            }
        }

        if set.is_empty() {
            debug!("No changes detected for user: {}", user_id);
            return Ok(existing);
        }

        self.repository
            .update(object_id, set)
            .await
            .map_err(email_conflict)?;
        info!("Updated profile for user {}", user_id);

        self.repository
            .find_by_id(object_id)
            .await?
            .ok_or_else(|| ApiError::internal(ERR_FAILED_FETCH_RECORD))
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        req: ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        validate_password_match(&req.new_password, &req.confirm_password)?;
        validate_password_different(&req.current_password, &req.new_password)?;

        let object_id = parse_object_id(user_id)?;
        let user = self
            .repository
            .find_by_id(object_id)
            .await?
            .ok_or_else(not_found)?;

        if !verify_password(&req.current_password, &user.password_hash)? {
            warn!("Password change failed: wrong current password for user {}", user_id);
            return Err(ApiError::unauthorized(CODE_WRONG_PASSWORD, ERR_WRONG_PASSWORD));
        }

        self.repository
            .update_password(object_id, &hash_password(&req.new_password)?)
            .await?;

        info!("Password changed for user {}", user_id);
        Ok(())
    }

    pub async fn update_status(&self, user_id: &str, is_active: bool) -> Result<User, ApiError> {
        self.set_status(user_id, is_active).await?;
        info!(
            "{} user {}",
            if is_active { "Activated" } else { "Deactivated" },
            user_id
        );
        self.get_user(user_id).await
    }

    /// Apply the same status to many accounts, reporting the outcome per id.
    pub async fn bulk_update_status(
        &self,
        user_ids: &[String],
        is_active: bool,
    ) -> Result<BulkUpdateResponse, ApiError> {
        let mut results = Vec::with_capacity(user_ids.len());

        for user_id in user_ids {
            let outcome = self.set_status(user_id, is_active).await;
            results.push(BulkUpdateResult {
                user_id: user_id.clone(),
                success: outcome.is_ok(),
                message: match outcome {
                    Ok(()) if is_active => MSG_USER_ACTIVATED_BULK.to_string(),
                    Ok(()) => MSG_USER_DEACTIVATED_BULK.to_string(),
                    Err(e) => e.message(),
                },
            });
        }

        let successful = results.iter().filter(|r| r.success).count();
        info!(
            "Bulk status update complete: {} successful, {} failed",
            successful,
            results.len() - successful
        );

        Ok(BulkUpdateResponse {
            total_requested: user_ids.len(),
            successful,
            failed: results.len() - successful,
            results,
        })
    }

    async fn set_status(&self, user_id: &str, is_active: bool) -> Result<(), ApiError> {
        let object_id: ObjectId = parse_object_id(user_id)?;
        let result = self.repository.update_status(object_id, is_active).await?;
        if result.matched_count == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
