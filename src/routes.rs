use crate::{
    api::{dashboard, employee, summary, transfer},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Context, Result};

pub type Limit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

#[derive(Clone)]
pub struct RateLimits {
    pub api: Limit,
    pub import: Limit,
}

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Option<Limit> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            api: build_limiter(config.rate_api_per_min).context("invalid RATE_API_PER_MIN")?,
            import: build_limiter(config.rate_import_per_min)
                .context("invalid RATE_IMPORT_PER_MIN")?,
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(&limits.api)) // rate limiting
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    // /employees/import (registered before /{id})
                    .service(
                        web::resource("/import")
                            .wrap(Governor::new(&limits.import))
                            .app_data(web::PayloadConfig::new(config.max_upload_bytes))
                            .route(web::post().to(transfer::import_employees)),
                    )
                    // /employees/export
                    .service(
                        web::resource("/export").route(web::get().to(transfer::export_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::patch().to(employee::update_employee_field))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/summary")
                    .route("/division", web::get().to(summary::division_summary))
                    .route("/hq", web::get().to(summary::hq_summary)),
            )
            .service(
                web::scope("/dashboard")
                    .service(web::resource("").route(web::get().to(dashboard::get_dashboard)))
                    .route("/view", web::put().to(dashboard::set_view))
                    .route("/reload", web::post().to(dashboard::reload)),
            ),
    );
}
