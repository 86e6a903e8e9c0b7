//! Insurer catalogue: public browsing (cached), admin CRUD, logos and reviews.

use std::sync::Arc;

use actix_multipart::Multipart;
use log::{debug, info, warn};
use mongodb::bson::{doc, oid::ObjectId, Document, Regex};

use crate::constants::{
    CODE_ALREADY_REVIEWED, CODE_COMPANY_EXISTS, CODE_COMPANY_HAS_POLICIES, CODE_COMPANY_NOT_FOUND,
    CODE_DUPLICATE_KEY, CODE_USER_NOT_FOUND, CODE_VALIDATION_FAILED, ERR_ALREADY_REVIEWED,
    ERR_COMPANY_EXISTS, ERR_COMPANY_HAS_POLICIES, ERR_COMPANY_NAME_NO_SLUG, ERR_COMPANY_NOT_FOUND,
    ERR_USER_NOT_FOUND,
};
use crate::errors::ApiError;
use crate::models::{
    Company, CompanyListQuery, CompanyResponse, CreateCompanyRequest, CreateReviewRequest,
    PageParams, PaginatedResponse, Review, ReviewResponse, UpdateCompanyRequest,
};
use crate::repositories::{CompanyRepository, PolicyRepository, ReviewRepository, UserRepository};
use crate::services::file_service::{FileService, LOGO_UPLOAD};
use crate::services::CacheService;
use crate::utils::slugify;
use crate::validators::parse_object_id;

const CACHE_NAMESPACE: &str = "companies";

fn not_found() -> ApiError {
    ApiError::not_found(CODE_COMPANY_NOT_FOUND, ERR_COMPANY_NOT_FOUND)
}

/// Slug for a company name; names with no letters or digits have none.
fn company_slug(name: &str) -> Result<String, ApiError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(ApiError::ValidationError {
            code: CODE_VALIDATION_FAILED.to_string(),
            errors: vec![ERR_COMPANY_NAME_NO_SLUG.to_string()],
        });
    }
    Ok(slug)
}

fn slug_conflict(err: ApiError) -> ApiError {
    if err.code() == CODE_DUPLICATE_KEY {
        ApiError::conflict(CODE_COMPANY_EXISTS, ERR_COMPANY_EXISTS)
    } else {
        err
    }
}

/// Mongo filter for a company listing. Public listings only ever see active companies.
pub fn build_company_filter(query: &CompanyListQuery, public_only: bool) -> Document {
    let mut filter = doc! {};

    if public_only {
        filter.insert("is_active", true);
    } else if let Some(is_active) = query.is_active {
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
                doc! { "name": { "$regex": &search_regex } },
                doc! { "description": { "$regex": &search_regex } },
            ],
        );
    }

    if let Some(coverage) = query.coverage_type {
        filter.insert("coverage_types", coverage.as_str());
    }
    if let Some(cargo) = query.cargo_type {
        filter.insert("cargo_types", cargo.as_str());
    }
    if let Some(min_rating) = query.min_rating {
        filter.insert("rating", doc! { "$gte": min_rating });
    }

    filter
}

/// Sort document with `_id` as a tie-breaker so pages are stable.
pub fn build_company_sort(query: &CompanyListQuery) -> Document {
    let direction = query.sort_direction();
    let field = query.sort_by.unwrap_or_default().field();
    doc! { field: direction, "_id": direction }
}

fn round_rating(average: f64) -> f64 {
    (average * 10.0).round() / 10.0
}

pub struct CompanyService {
    companies: Arc<CompanyRepository>,
    reviews: Arc<ReviewRepository>,
    policies: Arc<PolicyRepository>,
    users: Arc<UserRepository>,
    files: Arc<FileService>,
    cache: CacheService,
}

impl CompanyService {
    pub fn new(
        companies: Arc<CompanyRepository>,
        reviews: Arc<ReviewRepository>,
        policies: Arc<PolicyRepository>,
        users: Arc<UserRepository>,
        files: Arc<FileService>,
        cache: CacheService,
    ) -> Self {
        Self {
            companies,
            reviews,
            policies,
            users,
            files,
            cache,
        }
    }

    pub async fn list_public(
        &self,
        query: &CompanyListQuery,
    ) -> Result<PaginatedResponse<CompanyResponse>, ApiError> {
        let params = PageParams::new(query.page, query.per_page);
        let generation = self.cache.generation(CACHE_NAMESPACE).await;
        let key_query = serde_json::to_string(query)
            .map_err(|e| ApiError::internal(format!("Cache key encoding failed: {}", e)))?;
        let cache_key = format!(
            "{}:list:{}:{}:{}:{}",
            CACHE_NAMESPACE, generation, params.page, params.per_page, key_query
        );

        if let Some(cached) = self.cache.get_json(&cache_key).await {
            return Ok(cached);
        }

        let page = self.list(query, true).await?;
        self.cache.set_json(&cache_key, &page).await;
        Ok(page)
    }

    pub async fn list_admin(
        &self,
        query: &CompanyListQuery,
    ) -> Result<PaginatedResponse<CompanyResponse>, ApiError> {
        self.list(query, false).await
    }

    async fn list(
        &self,
        query: &CompanyListQuery,
        public_only: bool,
    ) -> Result<PaginatedResponse<CompanyResponse>, ApiError> {
        let params = PageParams::new(query.page, query.per_page);
        let filter = build_company_filter(query, public_only);
        let total = self.companies.count(filter.clone()).await?;
        let companies = self
            .companies
            .find_with_filter(filter, build_company_sort(query), params.skip(), params.limit())
            .await?;

        Ok(PaginatedResponse::new(
            companies.into_iter().map(CompanyResponse::from).collect(),
            total,
            params,
        ))
    }

    /// Active company by id, served from cache when possible.
    pub async fn get_public(&self, company_id: &str) -> Result<CompanyResponse, ApiError> {
        let object_id = parse_object_id(company_id)?;
        let generation = self.cache.generation(CACHE_NAMESPACE).await;
        let cache_key = format!("{}:{}:{}", CACHE_NAMESPACE, generation, object_id.to_hex());

        if let Some(cached) = self.cache.get_json(&cache_key).await {
            return Ok(cached);
        }

        let company = self.find_active(object_id).await?;
        let response = CompanyResponse::from(company);
        self.cache.set_json(&cache_key, &response).await;
        Ok(response)
    }

    /// Active company by id, bypassing the cache (used when pricing).
    pub async fn find_active(&self, company_id: ObjectId) -> Result<Company, ApiError> {
        self.companies
            .find_by_id(company_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(not_found)
    }

    pub async fn create(&self, req: CreateCompanyRequest) -> Result<Company, ApiError> {
        let slug = company_slug(&req.name)?;
        if self.companies.find_by_slug(&slug).await?.is_some() {
            return Err(ApiError::conflict(CODE_COMPANY_EXISTS, ERR_COMPANY_EXISTS));
        }

        let now = mongodb::bson::DateTime::now();
        let company = Company {
            id: None,
            name: req.name.trim().to_string(),
            slug,
            description: req.description,
            logo_url: None,
            website: req.website,
            contact_email: req.contact_email.trim().to_lowercase(),
            contact_phone: req.contact_phone,
            headquarters: req.headquarters,
            founded_year: req.founded_year,
            coverage_types: dedup(req.coverage_types),
            cargo_types: dedup(req.cargo_types),
            base_rate_bps: req.base_rate_bps,
            min_premium: req.min_premium,
            max_coverage: req.max_coverage,
            deductible_bps: req.deductible_bps,
            claim_settlement_ratio: req.claim_settlement_ratio,
            rating: 0.0,
            review_count: 0,
            is_verified: req.is_verified,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let id = self.companies.insert(&company).await.map_err(slug_conflict)?;
        self.invalidate().await;
        info!("Listed company {} ({})", company.name, id);

        Ok(Company {
            id: Some(id),
            ..company
        })
    }

    pub async fn update(
        &self,
        company_id: &str,
        req: UpdateCompanyRequest,
    ) -> Result<Company, ApiError> {
        let object_id = parse_object_id(company_id)?;
        let existing = self
            .companies
            .find_by_id(object_id)
            .await?
            .ok_or_else(not_found)?;

        let mut set = doc! {};

        if let Some(name) = req.name.map(|n| n.trim().to_string()) {
            if name != existing.name {
                let slug = company_slug(&name)?;
                if let Some(other) = self.companies.find_by_slug(&slug).await? {
                    if other.id != existing.id {
                        return Err(ApiError::conflict(CODE_COMPANY_EXISTS, ERR_COMPANY_EXISTS));
                    }
                }
                set.insert("name", name);
                set.insert("slug", slug);
            }
        }
        if let Some(description) = req.description {
            set.insert("description", description);
        }
        if let Some(website) = req.website {
            set.insert("website", website);
        }
        if let Some(contact_email) = req.contact_email {
            set.insert("contact_email", contact_email.trim().to_lowercase());
        }
        if let Some(contact_phone) = req.contact_phone {
            set.insert("contact_phone", contact_phone);
        }
        if let Some(headquarters) = req.headquarters {
            set.insert("headquarters", headquarters);
        }
        if let Some(founded_year) = req.founded_year {
            set.insert("founded_year", founded_year);
        }
        if let Some(coverage_types) = req.coverage_types {
            set.insert("coverage_types", mongodb::bson::to_bson(&dedup(coverage_types))?);
        }
        if let Some(cargo_types) = req.cargo_types {
            set.insert("cargo_types", mongodb::bson::to_bson(&dedup(cargo_types))?);
        }
        if let Some(base_rate_bps) = req.base_rate_bps {
            set.insert("base_rate_bps", base_rate_bps);
        }
        if let Some(min_premium) = req.min_premium {
            set.insert("min_premium", min_premium);
        }
        if let Some(max_coverage) = req.max_coverage {
            set.insert("max_coverage", max_coverage);
        }
        if let Some(deductible_bps) = req.deductible_bps {
            set.insert("deductible_bps", deductible_bps);
        }
        if let Some(ratio) = req.claim_settlement_ratio {
            set.insert("claim_settlement_ratio", ratio);
        }
        if let Some(is_verified) = req.is_verified {
            set.insert("is_verified", is_verified);
        }

        if set.is_empty() {
            debug!("No changes detected for company {}", company_id);
            return Ok(existing);
        }

        let updated = self
            .companies
            .update(object_id, set)
            .await
            .map_err(slug_conflict)?
            .ok_or_else(not_found)?;
        self.invalidate().await;
        info!("Updated company {}", company_id);
        Ok(updated)
    }

    pub async fn set_status(&self, company_id: &str, is_active: bool) -> Result<Company, ApiError> {
        let object_id = parse_object_id(company_id)?;
        let updated = self
            .companies
            .update(object_id, doc! { "is_active": is_active })
            .await?
            .ok_or_else(not_found)?;
        self.invalidate().await;
        info!("Company {} active={}", company_id, is_active);
        Ok(updated)
    }

    /// Delete a company that no policy has ever referenced.
    pub async fn delete(&self, company_id: &str) -> Result<(), ApiError> {
        let object_id = parse_object_id(company_id)?;

        if self.policies.exists_for_company(object_id).await? {
            warn!("Refusing to delete company {} with policies", company_id);
            return Err(ApiError::conflict(
                CODE_COMPANY_HAS_POLICIES,
                ERR_COMPANY_HAS_POLICIES,
            ));
        }

        let existing = self
            .companies
            .find_by_id(object_id)
            .await?
            .ok_or_else(not_found)?;
        let result = self.companies.delete(object_id).await?;
        if result.deleted_count == 0 {
            return Err(not_found());
        }

        if let Some(logo_url) = existing.logo_url {
            self.files.delete_file(&logo_url);
        }
        self.invalidate().await;
        info!("Deleted company {}", company_id);
        Ok(())
    }

    /// Replace the company logo; the previous file is removed once the new one is stored.
    pub async fn upload_logo(
        &self,
        company_id: &str,
        payload: &mut Multipart,
    ) -> Result<Company, ApiError> {
        let object_id = parse_object_id(company_id)?;
        let existing = self
            .companies
            .find_by_id(object_id)
            .await?
            .ok_or_else(not_found)?;

        let logo_url = self
            .files
            .save_upload(&LOGO_UPLOAD, &object_id.to_hex(), payload)
            .await?;

        let updated = match self
            .companies
            .update(object_id, doc! { "logo_url": &logo_url })
            .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                self.files.delete_file(&logo_url);
                return Err(not_found());
            }
            Err(e) => {
                self.files.delete_file(&logo_url);
                return Err(e);
            }
        };

        if let Some(old) = existing.logo_url {
            self.files.delete_file(&old);
        }
        self.invalidate().await;
        Ok(updated)
    }

    pub async fn list_reviews(
        &self,
        company_id: &str,
        params: PageParams,
    ) -> Result<PaginatedResponse<ReviewResponse>, ApiError> {
        let object_id = parse_object_id(company_id)?;
        self.find_active(object_id).await?;

        let total = self.reviews.count_by_company(object_id).await?;
        let reviews = self
            .reviews
            .find_by_company(object_id, params.skip(), params.limit())
            .await?;
        Ok(PaginatedResponse::new(
            reviews.into_iter().map(ReviewResponse::from).collect(),
            total,
            params,
        ))
    }

    /// Record a customer's review and refresh the company's average rating.
    pub async fn add_review(
        &self,
        company_id: &str,
        user_id: &str,
        req: CreateReviewRequest,
    ) -> Result<Review, ApiError> {
        let company_oid = parse_object_id(company_id)?;
        let user_oid = parse_object_id(user_id)?;

        self.find_active(company_oid).await?;
        let user = self
            .users
            .find_by_id(user_oid)
            .await?
            .ok_or_else(|| ApiError::not_found(CODE_USER_NOT_FOUND, ERR_USER_NOT_FOUND))?;

        if self.reviews.exists(company_oid, user_oid).await? {
            return Err(ApiError::conflict(CODE_ALREADY_REVIEWED, ERR_ALREADY_REVIEWED));
        }

        let review = Review {
            id: None,
            company_id: company_oid,
            user_id: user_oid,
            user_name: user.name,
            rating: req.rating,
            comment: req.comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
            created_at: mongodb::bson::DateTime::now(),
        };

        let id = self.reviews.insert(&review).await.map_err(|e| {
            if e.code() == CODE_DUPLICATE_KEY {
                ApiError::conflict(CODE_ALREADY_REVIEWED, ERR_ALREADY_REVIEWED)
            } else {
                e
            }
        })?;

        let (average, count) = self.reviews.rating_summary(company_oid).await?;
        self.companies
            .update_rating(company_oid, round_rating(average), count)
            .await?;
        self.invalidate().await;

        info!("User {} rated company {} with {}", user_id, company_id, req.rating);
        Ok(Review {
            id: Some(id),
            ..review
        })
    }

    async fn invalidate(&self) {
        self.cache.bump_generation(CACHE_NAMESPACE).await;
    }
}

fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CargoType, CompanySort, CoverageType, SortOrder};

    #[test]
    fn test_company_slug_rejects_names_without_letters_or_digits() {
        assert_eq!(company_slug("  Oceanic Marine & Co. ").unwrap(), "oceanic-marine-co");

        for name in ["!!", "--- ...", "&"] {
            match company_slug(name).unwrap_err() {
                ApiError::ValidationError { code, errors } => {
                    assert_eq!(code, CODE_VALIDATION_FAILED);
                    assert_eq!(errors, vec![ERR_COMPANY_NAME_NO_SLUG.to_string()]);
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_public_filter_forces_active() {
        let query = CompanyListQuery {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(build_company_filter(&query, true).get_bool("is_active").unwrap(), true);
        assert_eq!(build_company_filter(&query, false).get_bool("is_active").unwrap(), false);
        assert!(!build_company_filter(&CompanyListQuery::default(), false).contains_key("is_active"));
    }

    #[test]
    fn test_filter_escapes_search_and_matches_arrays() {
        let query = CompanyListQuery {
            search: Some("  a.b*c ".into()),
            coverage_type: Some(CoverageType::Comprehensive),
            cargo_type: Some(CargoType::Hazardous),
            min_rating: Some(4.0),
            ..Default::default()
        };
        let filter = build_company_filter(&query, true);

        let branches = filter.get_array("$or").unwrap();
        let name = branches[0].as_document().unwrap().get_document("name").unwrap();
        match name.get("$regex").unwrap() {
            mongodb::bson::Bson::RegularExpression(re) => {
                assert_eq!(re.pattern, r"a\.b\*c");
                assert_eq!(re.options, "i");
            }
            other => panic!("unexpected regex value: {:?}", other),
        }
        assert_eq!(filter.get_str("coverage_types").unwrap(), "comprehensive");
        assert_eq!(filter.get_str("cargo_types").unwrap(), "hazardous");
        assert_eq!(
            filter.get_document("rating").unwrap().get_f64("$gte").unwrap(),
            4.0
        );
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = CompanyListQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert!(!build_company_filter(&query, true).contains_key("$or"));
    }

    #[test]
    fn test_sort_document() {
        let query = CompanyListQuery {
            sort_by: Some(CompanySort::Premium),
            ..Default::default()
        };
        assert_eq!(build_company_sort(&query), doc! { "base_rate_bps": 1, "_id": 1 });

        let query = CompanyListQuery {
            sort_by: Some(CompanySort::Settlement),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        assert_eq!(
            build_company_sort(&query),
            doc! { "claim_settlement_ratio": 1, "_id": 1 }
        );
        assert_eq!(
            build_company_sort(&CompanyListQuery::default()),
            doc! { "rating": -1, "_id": -1 }
        );
    }

    #[test]
    fn test_rating_rounding_and_dedup() {
        assert_eq!(round_rating(4.349), 4.3);
        assert_eq!(round_rating(4.35), 4.4);
        assert_eq!(
            dedup(vec![CargoType::Bulk, CargoType::General, CargoType::Bulk]),
            vec![CargoType::Bulk, CargoType::General]
        );
    }
}
