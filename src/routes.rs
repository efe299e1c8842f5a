use crate::{
    api::{attendance, crm, data, employee, finance, leave_request, procurement, reports},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("non-zero period and burst");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
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
            .service(web::resource("/users").route(web::post().to(handlers::create_user)))
            // HR
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/{emp_code}").route(web::get().to(employee::get_employee)),
                    ),
            )
            .service(
                web::resource("/attendance")
                    .route(web::post().to(attendance::mark_attendance))
                    .route(web::get().to(attendance::attendance_for_month)),
            )
            .service(
                web::scope("/leaves")
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    ),
            )
            // Finance
            .service(
                web::resource("/transactions")
                    .route(web::post().to(finance::create_transaction))
                    .route(web::get().to(finance::list_transactions)),
            )
            // Procurement
            .service(
                web::resource("/suppliers")
                    .route(web::post().to(procurement::create_supplier))
                    .route(web::get().to(procurement::list_suppliers)),
            )
            .service(
                web::scope("/purchase-orders")
                    .service(
                        web::resource("")
                            .route(web::post().to(procurement::create_purchase_order))
                            .route(web::get().to(procurement::list_purchase_orders)),
                    )
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(procurement::update_purchase_order_status)),
                    ),
            )
            // CRM
            .service(
                web::resource("/customers")
                    .route(web::post().to(crm::create_customer))
                    .route(web::get().to(crm::list_customers)),
            )
            .service(
                web::scope("/tickets")
                    .service(
                        web::resource("")
                            .route(web::post().to(crm::create_ticket))
                            .route(web::get().to(crm::list_tickets)),
                    )
                    .service(
                        web::resource("/{id}/close").route(web::put().to(crm::close_ticket)),
                    ),
            )
            .service(
                web::scope("/sales-orders")
                    .service(
                        web::resource("")
                            .route(web::post().to(crm::create_sales_order))
                            .route(web::get().to(crm::list_sales_orders)),
                    )
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(crm::update_sales_order_status)),
                    ),
            )
            // Data import/export
            .service(
                web::scope("/data")
                    .app_data(web::PayloadConfig::new(config.import_max_bytes))
                    .service(
                        web::resource("/import/{kind}").route(web::post().to(data::import_csv)),
                    )
                    .service(
                        web::resource("/export/{table}").route(web::get().to(data::export_csv)),
                    )
                    .service(
                        web::resource("/tables/{table}").route(web::get().to(data::view_table)),
                    ),
            )
            // Reports
            .service(
                web::scope("/reports")
                    .route("/overview", web::get().to(reports::overview))
                    .route("/finance", web::get().to(reports::finance))
                    .route("/headcount", web::get().to(reports::headcount))
                    .route("/absences", web::get().to(reports::absences))
                    .route("/crm", web::get().to(reports::crm))
                    .route("/snapshot.pdf", web::get().to(reports::snapshot_pdf)),
            ),
    );
}

// LOGIN
//  ├─ access_token (ACCESS_TOKEN_TTL)
//  └─ refresh_token (REFRESH_TOKEN_TTL)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ returns a new pair, old refresh token revoked
