use crate::{api::attendance, auth::middleware::auth_middleware, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("burst size and period are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .configure(attendance_routes),
    );
}

pub fn attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .service(web::resource("/check-in").route(web::post().to(attendance::check_in)))
            .service(web::resource("/heartbeat").route(web::post().to(attendance::heartbeat)))
            .service(web::resource("/check-out").route(web::post().to(attendance::check_out)))
            .service(web::resource("/status").route(web::get().to(attendance::status)))
            .service(web::resource("/stats").route(web::get().to(attendance::stats)))
            // /attendance/employee/{employee_id}
            .service(
                web::resource("/employee/{employee_id}")
                    .route(web::get().to(attendance::employee_stats)),
            ),
    );
}
