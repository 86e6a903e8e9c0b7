//! JWT claims model.

use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_ADMIN, ROLE_SUPERADMIN, ROLE_USER};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    pub sub: String, // user or admin id
    pub email: String,
    pub role: String, // user / admin / superadmin
    pub exp: usize,
    pub iat: usize,
}

impl TokenClaims {
    /// Customer accounts from the `users` collection.
    pub fn is_user(&self) -> bool {
        self.role == ROLE_USER
    }

    /// Any back-office account.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN || self.role == ROLE_SUPERADMIN
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == ROLE_SUPERADMIN
    }

    /// Check if the claims belong to the specified account ID
    pub fn is_self(&self, account_id: &str) -> bool {
        self.sub == account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str) -> TokenClaims {
        TokenClaims {
            sub: "507f1f77bcf86cd799439011".to_string(),
            email: "someone@example.com".to_string(),
            role: role.to_string(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_role_checks() {
        assert!(claims("user").is_user());
        assert!(!claims("user").is_admin());
        assert!(claims("admin").is_admin());
        assert!(!claims("admin").is_superadmin());
        assert!(claims("superadmin").is_admin());
        assert!(claims("superadmin").is_superadmin());
    }

    #[test]
    fn test_is_self() {
        let c = claims("user");
        assert!(c.is_self("507f1f77bcf86cd799439011"));
        assert!(!c.is_self("507f1f77bcf86cd799439012"));
    }
}
