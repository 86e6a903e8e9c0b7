//! Claims: submission by policy holders and the admin review workflow.
//!
//! Every status change is a compare-and-set on the status the caller saw, so two
//! reviewers acting on the same claim cannot both succeed.

use std::sync::Arc;

use actix_multipart::Multipart;
use log::{info, warn};
use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::constants::{
    CODE_CLAIM_ALREADY_OPEN, CODE_CLAIM_NOT_FOUND, CODE_CLAIM_STATE_CHANGED, CODE_DOCUMENT_LIMIT,
    CODE_INVALID_TRANSITION, CODE_POLICY_NOT_ACTIVE, CODE_POLICY_NOT_FOUND,
    CODE_VALIDATION_FAILED, ERR_CLAIM_ALREADY_OPEN, ERR_CLAIM_CLOSED_FOR_DOCUMENTS,
    ERR_CLAIM_NOT_FOUND, ERR_CLAIM_STATE_CHANGED, ERR_DOCUMENT_LIMIT, ERR_POLICY_NOT_ACTIVE,
    ERR_POLICY_NOT_FOUND, ERR_REJECTION_NOTES_REQUIRED,
};
use crate::errors::ApiError;
use crate::models::{
    Claim, ClaimListQuery, ClaimResponse, ClaimStatus, ClaimStatusChange, CreateClaimRequest,
    PageParams, PaginatedResponse, PolicyStatus, ReviewClaimRequest,
};
use crate::repositories::{ClaimRepository, PolicyRepository};
use crate::services::file_service::{FileService, DOCUMENT_UPLOAD};
use crate::services::PolicyService;
use crate::utils::{generate_reference, today, CLAIM_PREFIX};
use crate::validators::{
    ensure_owner, parse_object_id, validate_approved_amount, validate_claim_against_policy,
};

/// Supporting documents allowed on a single claim.
pub const DOCUMENT_LIMIT: usize = 10;

fn not_found() -> ApiError {
    ApiError::not_found(CODE_CLAIM_NOT_FOUND, ERR_CLAIM_NOT_FOUND)
}

fn state_changed() -> ApiError {
    ApiError::conflict(CODE_CLAIM_STATE_CHANGED, ERR_CLAIM_STATE_CHANGED)
}

fn invalid_transition(from: ClaimStatus, to: ClaimStatus) -> ApiError {
    ApiError::bad_request(
        CODE_INVALID_TRANSITION,
        format!("Cannot move claim from {} to {}", from.as_str(), to.as_str()),
    )
}

/// Work out the `$set` for a reviewer's decision.
///
/// Approval needs an amount no larger than the claim less the deductible;
/// rejection needs notes.
pub fn review_update(
    claim: &Claim,
    req: &ReviewClaimRequest,
    deductible: i64,
    reviewer: &str,
    at: mongodb::bson::DateTime,
) -> Result<(ClaimStatusChange, Document), ApiError> {
    if !claim.status.can_review_to(req.status) {
        return Err(invalid_transition(claim.status, req.status));
    }

    let notes = req
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    let mut set = doc! {
        "reviewed_by": reviewer,
        "reviewed_at": at,
    };

    match req.status {
        ClaimStatus::Approved => {
            let amount = validate_approved_amount(req.approved_amount, claim.claimed_amount, deductible)?;
            set.insert("approved_amount", amount);
        }
        ClaimStatus::Rejected if notes.is_none() => {
            return Err(ApiError::bad_request(
                CODE_VALIDATION_FAILED,
                ERR_REJECTION_NOTES_REQUIRED,
            ));
        }
        _ => {}
    }

    if let Some(notes) = &notes {
        set.insert("review_notes", notes.as_str());
    }

    let change = ClaimStatusChange {
        from: Some(claim.status),
        to: req.status,
        by: reviewer.to_string(),
        at,
        notes,
    };
    Ok((change, set))
}

pub struct ClaimService {
    claims: Arc<ClaimRepository>,
    policy_repository: Arc<PolicyRepository>,
    policies: Arc<PolicyService>,
    files: Arc<FileService>,
}

impl ClaimService {
    pub fn new(
        claims: Arc<ClaimRepository>,
        policy_repository: Arc<PolicyRepository>,
        policies: Arc<PolicyService>,
        files: Arc<FileService>,
    ) -> Self {
        Self {
            claims,
            policy_repository,
            policies,
            files,
        }
    }

    pub async fn create(&self, user_id: &str, req: CreateClaimRequest) -> Result<Claim, ApiError> {
        let policy = self.policies.get_owned(&req.policy_id, user_id).await?;
        let policy_id = policy
            .id
            .ok_or_else(|| ApiError::not_found(CODE_POLICY_NOT_FOUND, ERR_POLICY_NOT_FOUND))?;

        if policy.status != PolicyStatus::Active {
            return Err(ApiError::bad_request(CODE_POLICY_NOT_ACTIVE, ERR_POLICY_NOT_ACTIVE));
        }
        let today = today();
        validate_claim_against_policy(&policy, req.incident_date, req.claimed_amount, today)?;

        if self.claims.has_open_claim(policy_id).await? {
            return Err(ApiError::conflict(CODE_CLAIM_ALREADY_OPEN, ERR_CLAIM_ALREADY_OPEN));
        }

        let now = mongodb::bson::DateTime::now();
        let claim = Claim {
            id: None,
            claim_number: generate_reference(CLAIM_PREFIX, today),
            policy_id,
            user_id: policy.user_id,
            company_id: policy.company_id,
            shipment_id: policy.shipment_id,
            incident_type: req.incident_type,
            incident_date: req.incident_date,
            description: req.description.trim().to_string(),
            claimed_amount: req.claimed_amount,
            approved_amount: None,
            status: ClaimStatus::Submitted,
            documents: Vec::new(),
            review_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            history: vec![ClaimStatusChange {
                from: None,
                to: ClaimStatus::Submitted,
                by: user_id.to_string(),
                at: now,
                notes: None,
            }],
            created_at: now,
            updated_at: now,
        };

        let id = self.claims.insert(&claim).await?;
        info!(
            "Claim {} submitted against policy {}",
            claim.claim_number, policy.policy_number
        );
        Ok(Claim {
            id: Some(id),
            ..claim
        })
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        query: &ClaimListQuery,
    ) -> Result<PaginatedResponse<ClaimResponse>, ApiError> {
        let mut filter = doc! { "user_id": parse_object_id(user_id)? };
        if let Some(status) = query.status {
            filter.insert("status", status.as_str());
        }
        self.page(filter, PageParams::new(query.page, query.per_page)).await
    }

    pub async fn list_admin(
        &self,
        query: &ClaimListQuery,
    ) -> Result<PaginatedResponse<ClaimResponse>, ApiError> {
        let mut filter = doc! {};
        if let Some(status) = query.status {
            filter.insert("status", status.as_str());
        }
        if let Some(company_id) = query.company_id.as_deref() {
            filter.insert("company_id", parse_object_id(company_id)?);
        }
        self.page(filter, PageParams::new(query.page, query.per_page)).await
    }

    async fn page(
        &self,
        filter: Document,
        params: PageParams,
    ) -> Result<PaginatedResponse<ClaimResponse>, ApiError> {
        let total = self.claims.count(filter.clone()).await?;
        let claims = self
            .claims
            .find_with_filter(filter, params.skip(), params.limit())
            .await?;
        Ok(PaginatedResponse::new(
            claims.into_iter().map(ClaimResponse::from).collect(),
            total,
            params,
        ))
    }

    pub async fn get(&self, claim_id: &str) -> Result<Claim, ApiError> {
        let object_id = parse_object_id(claim_id)?;
        self.claims.find_by_id(object_id).await?.ok_or_else(not_found)
    }

    pub async fn get_owned(&self, claim_id: &str, user_id: &str) -> Result<Claim, ApiError> {
        let claim = self.get(claim_id).await?;
        ensure_owner(claim.user_id, user_id)?;
        Ok(claim)
    }

    /// Let the claimant pull a claim before anyone has started reviewing it.
    pub async fn withdraw(&self, claim_id: &str, user_id: &str) -> Result<Claim, ApiError> {
        let claim = self.get_owned(claim_id, user_id).await?;
        let id = claim.id.ok_or_else(not_found)?;

        if !claim.status.can_withdraw() {
            return Err(ApiError::conflict(
                CODE_INVALID_TRANSITION,
                format!("A claim that is {} cannot be withdrawn", claim.status.as_str()),
            ));
        }

        let now = mongodb::bson::DateTime::now();
        let change = ClaimStatusChange {
            from: Some(claim.status),
            to: ClaimStatus::Withdrawn,
            by: user_id.to_string(),
            at: now,
            notes: None,
        };

        let withdrawn = self
            .claims
            .transition(id, &change, doc! {})
            .await?
            .ok_or_else(state_changed)?;
        info!("Claim {} withdrawn", withdrawn.claim_number);
        Ok(withdrawn)
    }

    /// Apply a reviewer decision. Settling also marks the policy as claimed.
    pub async fn review(
        &self,
        claim_id: &str,
        reviewer_id: &str,
        req: ReviewClaimRequest,
    ) -> Result<Claim, ApiError> {
        let claim = self.get(claim_id).await?;
        let id = claim.id.ok_or_else(not_found)?;
        let policy = self
            .policy_repository
            .find_by_id(claim.policy_id)
            .await?
            .ok_or_else(|| ApiError::not_found(CODE_POLICY_NOT_FOUND, ERR_POLICY_NOT_FOUND))?;

        let now = mongodb::bson::DateTime::now();
        let (change, set) = review_update(&claim, &req, policy.deductible, reviewer_id, now)?;

        let updated = self
            .claims
            .transition(id, &change, set)
            .await?
            .ok_or_else(|| {
                warn!(
                    "Review of claim {} lost a race ({} -> {})",
                    claim.claim_number,
                    claim.status.as_str(),
                    req.status.as_str()
                );
                state_changed()
            })?;

        if updated.status == ClaimStatus::Settled
            && self.policy_repository.mark_claimed(claim.policy_id).await?.is_none()
        {
            warn!(
                "Policy {} was not active or expired when claim {} settled",
                policy.policy_number, updated.claim_number
            );
        }

        info!(
            "Claim {} moved from {} to {} by {}",
            updated.claim_number,
            claim.status.as_str(),
            updated.status.as_str(),
            reviewer_id
        );
        Ok(updated)
    }

    /// Store a supporting document while the claim is still being assessed.
    pub async fn upload_document(
        &self,
        claim_id: &str,
        user_id: &str,
        payload: &mut Multipart,
    ) -> Result<Claim, ApiError> {
        let claim = self.get_owned(claim_id, user_id).await?;
        let id = claim.id.ok_or_else(not_found)?;
        ensure_accepts_document(&claim)?;

        let url = self
            .files
            .save_upload(&DOCUMENT_UPLOAD, &id.to_hex(), payload)
            .await?;

        match self.claims.push_document(id, &url, DOCUMENT_LIMIT).await {
            Ok(Some(updated)) => {
                info!("Document added to claim {}", updated.claim_number);
                Ok(updated)
            }
            Ok(None) => {
                self.files.delete_file(&url);
                Err(self.document_rejection(id).await)
            }
            Err(e) => {
                self.files.delete_file(&url);
                Err(e)
            }
        }
    }

    /// Explain why a conditional document push matched nothing.
    async fn document_rejection(&self, id: ObjectId) -> ApiError {
        match self.claims.find_by_id(id).await {
            Ok(Some(current)) => ensure_accepts_document(&current).err().unwrap_or_else(state_changed),
            Ok(None) => not_found(),
            Err(e) => e,
        }
    }
}

fn ensure_accepts_document(claim: &Claim) -> Result<(), ApiError> {
    if !claim.status.accepts_documents() {
        return Err(ApiError::conflict(
            CODE_INVALID_TRANSITION,
            ERR_CLAIM_CLOSED_FOR_DOCUMENTS,
        ));
    }
    if claim.documents.len() >= DOCUMENT_LIMIT {
        return Err(ApiError::bad_request(CODE_DOCUMENT_LIMIT, ERR_DOCUMENT_LIMIT));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IncidentType;
    use chrono::NaiveDate;

    fn claim(status: ClaimStatus, claimed_amount: i64) -> Claim {
        let now = mongodb::bson::DateTime::now();
        Claim {
            id: Some(ObjectId::new()),
            claim_number: "CLM-20261019-ABCDEF01".into(),
            policy_id: ObjectId::new(),
            user_id: ObjectId::new(),
            company_id: ObjectId::new(),
            shipment_id: ObjectId::new(),
            incident_type: IncidentType::Damage,
            incident_date: NaiveDate::from_ymd_opt(2026, 11, 10).unwrap(),
            description: "Container arrived with water damage".into(),
            claimed_amount,
            approved_amount: None,
            status,
            documents: Vec::new(),
            review_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn request(status: ClaimStatus, approved_amount: Option<i64>, notes: Option<&str>) -> ReviewClaimRequest {
        ReviewClaimRequest {
            status,
            approved_amount,
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn test_approval_sets_amount_and_history() {
        let now = mongodb::bson::DateTime::now();
        let (change, set) = review_update(
            &claim(ClaimStatus::UnderReview, 100_000),
            &request(ClaimStatus::Approved, Some(80_000), Some(" ok ")),
            10_000,
            "admin-1",
            now,
        )
        .unwrap();

        assert_eq!(change.from, Some(ClaimStatus::UnderReview));
        assert_eq!(change.to, ClaimStatus::Approved);
        assert_eq!(change.by, "admin-1");
        assert_eq!(change.notes.as_deref(), Some("ok"));
        assert_eq!(set.get_i64("approved_amount").unwrap(), 80_000);
        assert_eq!(set.get_str("review_notes").unwrap(), "ok");
        assert_eq!(set.get_str("reviewed_by").unwrap(), "admin-1");
    }

    #[test]
    fn test_approval_above_deductible_limit_fails() {
        let err = review_update(
            &claim(ClaimStatus::UnderReview, 100_000),
            &request(ClaimStatus::Approved, Some(95_000), None),
            10_000,
            "admin-1",
            mongodb::bson::DateTime::now(),
        )
        .unwrap_err();
        assert_eq!(err.code(), crate::constants::CODE_INVALID_AMOUNT);
    }

    #[test]
    fn test_rejection_needs_notes() {
        let err = review_update(
            &claim(ClaimStatus::Submitted, 100_000),
            &request(ClaimStatus::Rejected, None, Some("   ")),
            0,
            "admin-1",
            mongodb::bson::DateTime::now(),
        )
        .unwrap_err();
        assert_eq!(err.code(), CODE_VALIDATION_FAILED);

        assert!(review_update(
            &claim(ClaimStatus::Submitted, 100_000),
            &request(ClaimStatus::Rejected, None, Some("Not covered")),
            0,
            "admin-1",
            mongodb::bson::DateTime::now(),
        )
        .is_ok());
    }

    #[test]
    fn test_review_rejects_skipped_steps() {
        let err = review_update(
            &claim(ClaimStatus::Submitted, 100_000),
            &request(ClaimStatus::Settled, None, None),
            0,
            "admin-1",
            mongodb::bson::DateTime::now(),
        )
        .unwrap_err();
        assert_eq!(err.code(), CODE_INVALID_TRANSITION);
    }

    #[test]
    fn test_document_rules() {
        assert!(ensure_accepts_document(&claim(ClaimStatus::Submitted, 1)).is_ok());
        assert_eq!(
            ensure_accepts_document(&claim(ClaimStatus::Approved, 1)).unwrap_err().code(),
            CODE_INVALID_TRANSITION
        );

        let mut full = claim(ClaimStatus::UnderReview, 1);
        full.documents = (0..DOCUMENT_LIMIT).map(|i| format!("/uploads/claims/{}.pdf", i)).collect();
        assert_eq!(ensure_accepts_document(&full).unwrap_err().code(), CODE_DOCUMENT_LIMIT);
    }
}
