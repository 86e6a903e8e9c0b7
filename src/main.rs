mod config;
mod constants;
mod errors;
mod handlers;
mod middleware;
mod models;
mod openapi;
mod repositories;
mod routes;
mod services;
mod utils;
mod validators;

use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use mongodb::bson::doc;
use mongodb::Client;

use crate::config::CONFIG;
use crate::middleware::{create_api_rate_limiter_config, create_auth_rate_limiter_config};
use crate::repositories::{
    AdminRepository, ClaimRepository, CompanyRepository, PaymentRepository, PolicyRepository,
    ReviewRepository, ShipmentRepository, UserRepository,
};
use crate::routes::RouteState;
use crate::services::{
    AdminService, AuthService, CacheService, ClaimService, CompanyService, DashboardService,
    FileService, HttpPaymentGateway, PaymentGateway, PaymentService, PolicyService,
    ShipmentService, TokenBlacklist, UserService,
};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize environment variables and logger
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Connect to MongoDB
    info!("Connecting to MongoDB...");
    let client = Client::with_uri_str(&CONFIG.mongodb_uri)
        .await
        .map_err(|e| startup_error("Failed to connect to MongoDB", e))?;

    let db = client.database(&CONFIG.database_name);

    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| startup_error("Failed to ping MongoDB", e))?;
    info!("Connected to MongoDB successfully!");

    // Repositories
    let users = Arc::new(UserRepository::new(&db));
    let admins = Arc::new(AdminRepository::new(&db));
    let companies = Arc::new(CompanyRepository::new(&db));
    let reviews = Arc::new(ReviewRepository::new(&db));
    let shipments = Arc::new(ShipmentRepository::new(&db));
    let policies = Arc::new(PolicyRepository::new(&db));
    let claims = Arc::new(ClaimRepository::new(&db));
    let payments = Arc::new(PaymentRepository::new(&db));

    futures::try_join!(
        users.create_indexes(),
        admins.create_indexes(),
        companies.create_indexes(),
        reviews.create_indexes(),
        shipments.create_indexes(),
        policies.create_indexes(),
        claims.create_indexes(),
        payments.create_indexes()
    )
    .map_err(|e| startup_error("Failed to create indexes", e))?;
    info!("Indexes are in place");

    // Shared infrastructure
    let cache = CacheService::connect(
        CONFIG.redis_url.as_deref(),
        &CONFIG.cache_prefix,
        CONFIG.cache_ttl_seconds,
    )
    .await;
    let files = Arc::new(FileService::new());
    let gateway: Arc<dyn PaymentGateway> = Arc::new(
        HttpPaymentGateway::new(
            &CONFIG.payment_gateway_url,
            &CONFIG.payment_key_id,
            &CONFIG.payment_key_secret,
        )
        .map_err(|e| startup_error("Failed to build payment gateway client", e))?,
    );
    let token_blacklist = TokenBlacklist::new();

    // Services
    let admin_service = AdminService::new(admins.clone());
    admin_service
        .seed_superadmin()
        .await
        .map_err(|e| startup_error("Failed to seed superadmin", e))?;

    let shipment_service = Arc::new(ShipmentService::new(shipments.clone(), policies.clone()));
    let policy_service = Arc::new(PolicyService::new(
        policies.clone(),
        companies.clone(),
        shipment_service.clone(),
        payments.clone(),
    ));

    let auth_service = web::Data::new(AuthService::new(users.clone(), admins.clone()));
    let user_service = web::Data::new(UserService::new(users.clone()));
    let admin_service = web::Data::new(admin_service);
    let company_service = web::Data::new(CompanyService::new(
        companies.clone(),
        reviews,
        policies.clone(),
        users.clone(),
        files.clone(),
        cache,
    ));
    let claim_service = web::Data::new(ClaimService::new(
        claims.clone(),
        policies.clone(),
        policy_service.clone(),
        files,
    ));
    let payment_service = web::Data::new(PaymentService::new(
        payments.clone(),
        policies.clone(),
        policy_service.clone(),
        gateway,
    ));
    let dashboard_service = web::Data::new(DashboardService::new(
        users, companies, shipments, policies, claims, payments,
    ));
    let shipment_service = web::Data::from(shipment_service);
    let policy_service = web::Data::from(policy_service);
    let token_blacklist_data = web::Data::new(token_blacklist.clone());

    let route_state = RouteState {
        blacklist: token_blacklist,
        auth_limiter: Arc::new(
            create_auth_rate_limiter_config()
                .ok_or_else(|| startup_error("Invalid auth rate limit", "quota must be non-zero"))?,
        ),
        api_limiter: Arc::new(
            create_api_rate_limiter_config()
                .ok_or_else(|| startup_error("Invalid API rate limit", "quota must be non-zero"))?,
        ),
    };

    // Start HTTP server
    let server_addr = format!("{}:{}", CONFIG.server_host, CONFIG.server_port);
    info!("Starting server at http://{}", server_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .app_data(auth_service.clone())
            .app_data(user_service.clone())
            .app_data(admin_service.clone())
            .app_data(company_service.clone())
            .app_data(shipment_service.clone())
            .app_data(policy_service.clone())
            .app_data(claim_service.clone())
            .app_data(payment_service.clone())
            .app_data(dashboard_service.clone())
            .app_data(token_blacklist_data.clone())
            .configure(|cfg| routes::configure_routes(cfg, &route_state))
            .default_service(web::to(routes::not_found))
    })
    .bind(&server_addr)?
    .run()
    .await
}
