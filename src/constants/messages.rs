//! Success message constants used throughout the application.

// Authentication messages
pub const MSG_USER_REGISTERED: &str = "User registered successfully";
pub const MSG_LOGIN_SUCCESS: &str = "Login successful";
pub const MSG_LOGOUT_SUCCESS: &str = "Logout successful";

// Account messages
pub const MSG_USER_PROFILE_RETRIEVED: &str = "User profile retrieved";
pub const MSG_USER_UPDATED: &str = "User profile updated successfully";
pub const MSG_PASSWORD_CHANGED: &str = "Password changed successfully";
pub const MSG_USER_ACTIVATED: &str = "User activated successfully";
pub const MSG_USER_DEACTIVATED: &str = "User deactivated successfully";
pub const MSG_USER_ACTIVATED_BULK: &str = "User activated";
pub const MSG_USER_DEACTIVATED_BULK: &str = "User deactivated";
pub const MSG_ADMIN_PROFILE: &str = "Admin profile retrieved";
pub const MSG_ADMIN_CREATED: &str = "Admin created successfully";
pub const MSG_ADMIN_STATUS_UPDATED: &str = "Admin status updated successfully";

// Company messages
pub const MSG_COMPANY_FOUND: &str = "Company found";
pub const MSG_COMPANY_CREATED: &str = "Company created successfully";
pub const MSG_COMPANY_UPDATED: &str = "Company updated successfully";
pub const MSG_COMPANY_DELETED: &str = "Company deleted successfully";
pub const MSG_COMPANY_STATUS_UPDATED: &str = "Company status updated successfully";
pub const MSG_LOGO_UPLOADED: &str = "Logo uploaded successfully";
pub const MSG_REVIEW_CREATED: &str = "Review submitted successfully";

// Shipment messages
pub const MSG_SHIPMENT_CREATED: &str = "Shipment created successfully";
pub const MSG_SHIPMENT_FOUND: &str = "Shipment found";
pub const MSG_SHIPMENT_UPDATED: &str = "Shipment updated successfully";
pub const MSG_SHIPMENT_DELETED: &str = "Shipment deleted successfully";

// Policy messages
pub const MSG_QUOTE_CALCULATED: &str = "Quote calculated";
pub const MSG_POLICY_CREATED: &str = "Policy created, awaiting payment";
pub const MSG_POLICY_FOUND: &str = "Policy found";
pub const MSG_POLICY_CANCELLED: &str = "Policy cancelled successfully";

// Claim messages
pub const MSG_CLAIM_SUBMITTED: &str = "Claim submitted successfully";
pub const MSG_CLAIM_FOUND: &str = "Claim found";
pub const MSG_CLAIM_REVIEWED: &str = "Claim updated successfully";
pub const MSG_CLAIM_WITHDRAWN: &str = "Claim withdrawn successfully";
pub const MSG_DOCUMENT_UPLOADED: &str = "Document uploaded successfully";

// Payment messages
pub const MSG_ORDER_CREATED: &str = "Payment order created";
pub const MSG_PAYMENT_VERIFIED: &str = "Payment verified, policy activated";
pub const MSG_WEBHOOK_ACCEPTED: &str = "Webhook processed";

// Dashboard messages
pub const MSG_DASHBOARD: &str = "Dashboard statistics";
