use crate::{
    api::{admin, clock, dashboard, time_entry},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    // both values are at least 1, which is all the builder checks
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(clock::current_time);
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/dashboard")
                    // /dashboard
                    .service(web::resource("").route(web::get().to(dashboard::get_dashboard)))
                    // /dashboard/export
                    .service(
                        web::resource("/export").route(web::get().to(dashboard::export_dashboard)),
                    ),
            )
            .service(
                web::scope("/admin")
                    .service(web::resource("/overview").route(web::get().to(admin::get_overview)))
                    .service(
                        web::resource("/allowed-time")
                            .route(web::get().to(admin::get_allowed_time))
                            .route(web::put().to(admin::update_allowed_time)),
                    )
                    .service(
                        web::resource("/latest-time-in").route(web::get().to(admin::latest_time_in)),
                    )
                    .service(
                        web::resource("/time-records").route(web::get().to(admin::time_records)),
                    ),
            )
            .service(
                web::scope("/time")
                    .service(web::resource("/in").route(web::post().to(time_entry::time_in)))
                    // /time/out/{id}
                    .service(web::resource("/out/{id}").route(web::put().to(time_entry::time_out)))
                    .service(web::resource("/today").route(web::get().to(time_entry::today)))
                    // /time/records/{id}
                    .service(
                        web::resource("/records/{id}")
                            .route(web::put().to(time_entry::update_record)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ returns new token pair, old refresh token is spent

// LOGOUT
//  └─ POST /auth/logout with either token
//       └─ refresh closed; an access token is revoked until it expires
//          and closes the refresh session it was issued with
