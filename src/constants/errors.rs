//! Error message constants used throughout the application.

// Authentication errors
pub const ERR_AUTH_REQUIRED: &str = "Authentication required";
pub const ERR_INVALID_AUTH_HEADER: &str = "Missing or invalid authorization header";
pub const ERR_INVALID_TOKEN: &str = "Invalid or expired token";
pub const ERR_TOKEN_REVOKED: &str = "Token has been revoked";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ERR_ACCOUNT_DEACTIVATED: &str = "Account is deactivated";

// Authorization errors
pub const ERR_ADMIN_REQUIRED: &str = "Administrator access required";
pub const ERR_SUPERADMIN_REQUIRED: &str = "Only super administrators can manage admin accounts";
pub const ERR_USER_ACCOUNT_REQUIRED: &str = "This action requires a customer account";
pub const ERR_CANNOT_DEACTIVATE_SELF: &str = "Administrators cannot deactivate themselves";
pub const ERR_NOT_OWNER: &str = "You don't have permission to access this resource";

// Account errors
pub const ERR_USER_NOT_FOUND: &str = "User not found";
pub const ERR_ADMIN_NOT_FOUND: &str = "Admin not found";
pub const ERR_INVALID_ID: &str = "Invalid ID format";
pub const ERR_EMAIL_EXISTS: &str = "Email already registered";
pub const ERR_FAILED_FETCH_RECORD: &str = "Failed to fetch updated record";
pub const ERR_AT_LEAST_ONE_USER_ID: &str = "At least one user ID is required";

// Password errors
pub const ERR_PASSWORD_MISMATCH: &str = "New password and confirmation do not match";
pub const ERR_SAME_PASSWORD: &str = "New password must be different from current password";
pub const ERR_WRONG_PASSWORD: &str = "Current password is incorrect";
pub const ERR_WEAK_PASSWORD: &str =
    "Password must contain at least one uppercase, lowercase, digit, and special character";

// Company errors
pub const ERR_COMPANY_NOT_FOUND: &str = "Company not found";
pub const ERR_COMPANY_EXISTS: &str = "A company with this name already exists";
pub const ERR_COMPANY_NAME_NO_SLUG: &str = "Company name must contain letters or digits";
pub const ERR_COMPANY_HAS_POLICIES: &str =
    "Company has policies on record; deactivate it instead of deleting";
pub const ERR_ALREADY_REVIEWED: &str = "You have already reviewed this company";

// Shipment errors
pub const ERR_SHIPMENT_NOT_FOUND: &str = "Shipment not found";
pub const ERR_SHIPMENT_LOCKED: &str =
    "Shipment can no longer be modified because it is in transit or insured";
pub const ERR_SAME_ORIGIN_DESTINATION: &str = "Origin and destination must differ";
pub const ERR_ARRIVAL_BEFORE_DEPARTURE: &str = "Arrival date cannot be before departure date";
pub const ERR_DEPARTURE_IN_PAST: &str = "Departure date cannot be in the past";

// Policy errors
pub const ERR_POLICY_NOT_FOUND: &str = "Policy not found";
pub const ERR_COVERAGE_EXCEEDED: &str = "Cargo value exceeds the company's maximum coverage";
pub const ERR_COVERAGE_UNSUPPORTED: &str =
    "The company does not offer this coverage for this cargo type";
pub const ERR_SHIPMENT_ALREADY_INSURED: &str = "Shipment already has a live policy";
pub const ERR_SHIPMENT_NOT_INSURABLE: &str = "Only pending or in-transit shipments can be insured";
pub const ERR_POLICY_NOT_ACTIVE: &str = "Policy is not active";
pub const ERR_POLICY_NOT_PENDING: &str = "Only policies awaiting payment can be cancelled";
pub const ERR_POLICY_NOT_PAYABLE: &str = "Policy is no longer awaiting this payment";

// Claim errors
pub const ERR_CLAIM_NOT_FOUND: &str = "Claim not found";
pub const ERR_CLAIM_ALREADY_OPEN: &str = "An open claim already exists for this policy";
pub const ERR_CLAIM_STATE_CHANGED: &str = "Claim was updated by someone else; reload and retry";
pub const ERR_INCIDENT_OUTSIDE_COVER: &str = "Incident date is outside the policy period";
pub const ERR_INCIDENT_IN_FUTURE: &str = "Incident date cannot be in the future";
pub const ERR_CLAIM_EXCEEDS_COVERAGE: &str = "Claimed amount exceeds the coverage amount";
pub const ERR_APPROVED_AMOUNT_REQUIRED: &str =
    "Approved amount must be positive and within the claimed amount less the deductible";
pub const ERR_REJECTION_NOTES_REQUIRED: &str = "Notes are required when rejecting a claim";
pub const ERR_DOCUMENT_LIMIT: &str = "Maximum number of documents reached for this claim";
pub const ERR_CLAIM_CLOSED_FOR_DOCUMENTS: &str =
    "Documents can only be added while the claim is open for review";

// Payment errors
pub const ERR_PAYMENT_NOT_FOUND: &str = "Payment order not found";
pub const ERR_INVALID_SIGNATURE: &str = "Payment signature verification failed";
pub const ERR_PAYMENT_GATEWAY: &str = "Payment gateway request failed";
pub const ERR_INVALID_WEBHOOK: &str = "Malformed webhook payload";

// File errors
pub const ERR_INVALID_FILE_TYPE: &str = "Invalid file type";
pub const ERR_FILE_TOO_LARGE: &str = "File too large";
pub const ERR_NO_FILE: &str = "No file provided in the expected form field";
pub const ERR_FAILED_PROCESS_UPLOAD: &str = "Failed to process upload";
pub const ERR_FAILED_READ_FILE: &str = "Failed to read file data";
pub const ERR_FAILED_SAVE_FILE: &str = "Failed to save file";

// Routing
pub const ERR_ROUTE_NOT_FOUND: &str = "Route not found";
