use crate::{api::payroll, api::slips, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/payroll")
                // /payroll/calculate — preview only, no persistence
                .service(
                    web::resource("/calculate")
                        .wrap(build_limiter(config.rate_calculate_per_min))
                        .route(web::post().to(payroll::calculate_payroll)),
                )
                // /payroll/bulk-generate
                .service(
                    web::resource("/bulk-generate")
                        .wrap(build_limiter(config.rate_generate_per_min))
                        .route(web::post().to(payroll::bulk_generate)),
                )
                .service(
                    web::scope("/slips")
                        .wrap(build_limiter(config.rate_protected_per_min))
                        // /payroll/slips
                        .service(web::resource("").route(web::get().to(slips::list_slips)))
                        // /payroll/slips/{id}
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(slips::get_slip))
                                .route(web::delete().to(slips::delete_slip)),
                        )
                        // /payroll/slips/{id}/pay
                        .service(
                            web::resource("/{id}/pay").route(web::put().to(slips::pay_slip)),
                        ),
                ),
        ),
    );
}
