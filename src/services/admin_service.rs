//! Back-office accounts and the startup superadmin seed.

use std::sync::Arc;

use log::{info, warn};

use crate::config::CONFIG;
use crate::constants::{
    CODE_ADMIN_NOT_FOUND, CODE_DUPLICATE_KEY, CODE_EMAIL_EXISTS, CODE_SELF_ACTION_FORBIDDEN,
    ERR_ADMIN_NOT_FOUND, ERR_CANNOT_DEACTIVATE_SELF, ERR_EMAIL_EXISTS,
};
use crate::errors::ApiError;
use crate::models::{
    Admin, AdminResponse, AdminRole, CreateAdminRequest, PageParams, PaginatedResponse,
};
use crate::repositories::AdminRepository;
use crate::services::auth_service::hash_password;
use crate::utils::log_sanitizer::mask_email;
use crate::validators::parse_object_id;

pub struct AdminService {
    repository: Arc<AdminRepository>,
}

fn not_found() -> ApiError {
    ApiError::not_found(CODE_ADMIN_NOT_FOUND, ERR_ADMIN_NOT_FOUND)
}

impl AdminService {
    pub fn new(repository: Arc<AdminRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_admin(&self, admin_id: &str) -> Result<Admin, ApiError> {
        let object_id = parse_object_id(admin_id)?;
        self.repository
            .find_by_id(object_id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn list_admins(
        &self,
        params: PageParams,
    ) -> Result<PaginatedResponse<AdminResponse>, ApiError> {
        let total = self.repository.count().await?;
        let admins = self
            .repository
            .find_page(params.skip(), params.limit())
            .await?;
        Ok(PaginatedResponse::new(
            admins.into_iter().map(AdminResponse::from).collect(),
            total,
            params,
        ))
    }

    pub async fn create_admin(&self, req: CreateAdminRequest) -> Result<Admin, ApiError> {
        let email = req.email.trim().to_lowercase();
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict(CODE_EMAIL_EXISTS, ERR_EMAIL_EXISTS));
        }

        let admin = self
            .insert_admin(&email, req.name.trim(), &req.password, req.role)
            .await?;
        info!("Created {} account for {}", admin.role, mask_email(&admin.email));
        Ok(admin)
    }

    /// Activate or deactivate another admin. `actor_id` is the caller.
    pub async fn update_status(
        &self,
        actor_id: &str,
        admin_id: &str,
        is_active: bool,
    ) -> Result<Admin, ApiError> {
        if actor_id == admin_id && !is_active {
            warn!("Admin {} attempted to deactivate themselves", actor_id);
            return Err(ApiError::bad_request(
                CODE_SELF_ACTION_FORBIDDEN,
                ERR_CANNOT_DEACTIVATE_SELF,
            ));
        }

        let object_id = parse_object_id(admin_id)?;
        let result = self.repository.update_status(object_id, is_active).await?;
        if result.matched_count == 0 {
            return Err(not_found());
        }

        info!("Admin {} set admin {} active={}", actor_id, admin_id, is_active);
        self.get_admin(admin_id).await
    }

    /// Create the first superadmin from configuration when none exists.
    pub async fn seed_superadmin(&self) -> Result<(), ApiError> {
        if !CONFIG.seed_admin {
            info!("Admin seeding is disabled (SEED_ADMIN=false)");
            return Ok(());
        }

        if self.repository.exists_with_role(AdminRole::SuperAdmin).await? {
            info!("Superadmin already exists, skipping seed");
            return Ok(());
        }

        if self
            .repository
            .find_by_email(&CONFIG.admin_email)
            .await?
            .is_some()
        {
            warn!(
                "Admin {} exists without superadmin role, skipping seed",
                mask_email(&CONFIG.admin_email)
            );
            return Ok(());
        }

        let admin = self
            .insert_admin(
                &CONFIG.admin_email.trim().to_lowercase(),
                &CONFIG.admin_name,
                &CONFIG.admin_password,
                AdminRole::SuperAdmin,
            )
            .await?;
        info!("Seeded superadmin {}", mask_email(&admin.email));
        Ok(())
    }

    async fn insert_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
        role: AdminRole,
    ) -> Result<Admin, ApiError> {
        let now = mongodb::bson::DateTime::now();
        let admin = Admin {
            id: None,
            email: email.to_string(),
            name: name.to_string(),
            password_hash: hash_password(password)?,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        };

        let id = self.repository.insert(&admin).await.map_err(|e| {
            if e.code() == CODE_DUPLICATE_KEY {
                ApiError::conflict(CODE_EMAIL_EXISTS, ERR_EMAIL_EXISTS)
            } else {
                e
            }
        })?;

        Ok(Admin {
            id: Some(id),
            ..admin
        })
    }
}
