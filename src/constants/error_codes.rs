//! Error code constants for API responses.
//!
//! These codes provide a machine-readable identifier for each error type,
//! making it easier for API clients to handle errors programmatically.

// Validation errors
pub const CODE_VALIDATION_FAILED: &str = "VALIDATION_FAILED";
pub const CODE_INVALID_ID: &str = "INVALID_ID";
pub const CODE_INVALID_TRANSITION: &str = "INVALID_TRANSITION";
pub const CODE_INVALID_AMOUNT: &str = "INVALID_AMOUNT";
pub const CODE_INVALID_DATE: &str = "INVALID_DATE";

// Bulk operation errors
pub const CODE_BULK_REQUIRED: &str = "BULK_REQUIRED";
pub const CODE_BULK_LIMIT_EXCEEDED: &str = "BULK_LIMIT_EXCEEDED";

// Authentication errors
pub const CODE_AUTH_REQUIRED: &str = "AUTH_REQUIRED";
pub const CODE_INVALID_TOKEN: &str = "INVALID_TOKEN";
pub const CODE_TOKEN_REVOKED: &str = "TOKEN_REVOKED";
pub const CODE_INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
pub const CODE_ACCOUNT_DEACTIVATED: &str = "ACCOUNT_DEACTIVATED";

// Authorization errors
pub const CODE_FORBIDDEN: &str = "FORBIDDEN";
pub const CODE_ADMIN_REQUIRED: &str = "ADMIN_REQUIRED";
pub const CODE_SUPERADMIN_REQUIRED: &str = "SUPERADMIN_REQUIRED";
pub const CODE_SELF_ACTION_FORBIDDEN: &str = "SELF_ACTION_FORBIDDEN";

// Account errors
pub const CODE_USER_NOT_FOUND: &str = "USER_NOT_FOUND";
pub const CODE_ADMIN_NOT_FOUND: &str = "ADMIN_NOT_FOUND";
pub const CODE_EMAIL_EXISTS: &str = "EMAIL_EXISTS";

// Password errors
pub const CODE_WRONG_PASSWORD: &str = "WRONG_PASSWORD";
pub const CODE_PASSWORD_MISMATCH: &str = "PASSWORD_MISMATCH";
pub const CODE_SAME_PASSWORD: &str = "SAME_PASSWORD";

// Company errors
pub const CODE_COMPANY_NOT_FOUND: &str = "COMPANY_NOT_FOUND";
pub const CODE_COMPANY_EXISTS: &str = "COMPANY_EXISTS";
pub const CODE_COMPANY_HAS_POLICIES: &str = "COMPANY_HAS_POLICIES";
pub const CODE_ALREADY_REVIEWED: &str = "ALREADY_REVIEWED";

// Shipment errors
pub const CODE_SHIPMENT_NOT_FOUND: &str = "SHIPMENT_NOT_FOUND";
pub const CODE_SHIPMENT_LOCKED: &str = "SHIPMENT_LOCKED";

// Policy errors
pub const CODE_POLICY_NOT_FOUND: &str = "POLICY_NOT_FOUND";
pub const CODE_COVERAGE_EXCEEDED: &str = "COVERAGE_EXCEEDED";
pub const CODE_COVERAGE_UNSUPPORTED: &str = "COVERAGE_UNSUPPORTED";
pub const CODE_SHIPMENT_ALREADY_INSURED: &str = "SHIPMENT_ALREADY_INSURED";
pub const CODE_POLICY_NOT_ACTIVE: &str = "POLICY_NOT_ACTIVE";

// Claim errors
pub const CODE_CLAIM_NOT_FOUND: &str = "CLAIM_NOT_FOUND";
pub const CODE_CLAIM_ALREADY_OPEN: &str = "CLAIM_ALREADY_OPEN";
pub const CODE_CLAIM_STATE_CHANGED: &str = "CLAIM_STATE_CHANGED";
pub const CODE_DOCUMENT_LIMIT: &str = "DOCUMENT_LIMIT";

// Payment errors
pub const CODE_PAYMENT_NOT_FOUND: &str = "PAYMENT_NOT_FOUND";
pub const CODE_INVALID_SIGNATURE: &str = "INVALID_SIGNATURE";
pub const CODE_PAYMENT_GATEWAY_ERROR: &str = "PAYMENT_GATEWAY_ERROR";
pub const CODE_INVALID_WEBHOOK: &str = "INVALID_WEBHOOK";

// File errors
pub const CODE_INVALID_FILE_TYPE: &str = "INVALID_FILE_TYPE";
pub const CODE_FILE_TOO_LARGE: &str = "FILE_TOO_LARGE";
pub const CODE_FILE_UPLOAD_FAILED: &str = "FILE_UPLOAD_FAILED";

// Generic errors
pub const CODE_BAD_REQUEST: &str = "BAD_REQUEST";
pub const CODE_NOT_FOUND: &str = "NOT_FOUND";
pub const CODE_DUPLICATE_KEY: &str = "DUPLICATE_KEY";
pub const CODE_INTERNAL_ERROR: &str = "INTERNAL_ERROR";
