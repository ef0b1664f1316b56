pub mod categories;
pub mod clients;
pub mod components;
pub mod portfolios;
pub mod projects;
pub mod public;
pub mod status;
pub mod technologies;

use actix_web::{HttpResponse, web};

use crate::error::{self, ApiError};

/// Extractor settings, the `/api` routes and the fallback for unknown paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(web::scope("/api").configure(init_routes))
        .default_service(web::to(unknown_path));
}

async fn unknown_path() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound("Unknown path".to_string()))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/status", web::get().to(status::status));

    // ── Public routes (no token) ──
    cfg.service(
        web::scope("/v1/public")
            .route("/portfolio/{code}", web::get().to(public::get_portfolio))
            .route("/project", web::get().to(public::list_projects))
            .route("/project/{project_id}", web::get().to(public::get_project))
            .route(
                "/project/{project_id}/component",
                web::get().to(public::list_project_components),
            ),
    );

    // ── Admin routes (Bearer token via the AdminUser extractor) ──
    cfg.service(
        web::scope("/v1/admin")
            .service(
                web::scope("/client")
                    .route("", web::get().to(clients::list_clients))
                    .route("", web::post().to(clients::create_client))
                    .route("/{id}", web::get().to(clients::get_client))
                    .route("/{id}", web::put().to(clients::update_client))
                    .route("/{id}", web::delete().to(clients::archive_client)),
            )
            .service(
                web::scope("/category")
                    .route("", web::get().to(categories::list_categories))
                    .route("", web::post().to(categories::create_category))
                    .route("/{id}", web::get().to(categories::get_category))
                    .route("/{id}", web::put().to(categories::update_category))
                    .route("/{id}", web::delete().to(categories::archive_category)),
            )
            .service(
                web::scope("/technology")
                    .route("", web::get().to(technologies::list_technologies))
                    .route("", web::post().to(technologies::create_technology))
                    .route("/{id}", web::get().to(technologies::get_technology))
                    .route("/{id}", web::put().to(technologies::update_technology))
                    .route("/{id}", web::delete().to(technologies::archive_technology)),
            )
            .service(
                web::scope("/project")
                    .route("", web::get().to(projects::list_projects))
                    .route("", web::post().to(projects::create_project))
                    .route("/{id}", web::get().to(projects::get_project))
                    .route("/{id}", web::put().to(projects::update_project))
                    .route("/{id}", web::delete().to(projects::archive_project))
                    .route("/{id}/cover", web::post().to(projects::upload_cover))
                    .route("/{id}/cover", web::delete().to(projects::delete_cover))
                    .route("/{id}/logo", web::post().to(projects::upload_logo))
                    .route("/{id}/logo", web::delete().to(projects::delete_logo))
                    .route("/{id}/gallery", web::post().to(projects::add_gallery_item))
                    .route(
                        "/{id}/gallery/{item_id}",
                        web::delete().to(projects::delete_gallery_item),
                    )
                    .service(
                        web::scope("/{project_id}/component")
                            .route("", web::get().to(components::list_components))
                            .route("", web::post().to(components::create_component))
                            .route("/{id}", web::get().to(components::get_component))
                            .route("/{id}", web::put().to(components::update_component))
                            .route("/{id}", web::delete().to(components::archive_component))
                            .route("/{id}/cover", web::post().to(components::upload_cover))
                            .route("/{id}/cover", web::delete().to(components::delete_cover))
                            .route("/{id}/gallery", web::post().to(components::add_gallery_item))
                            .route(
                                "/{id}/gallery/{item_id}",
                                web::delete().to(components::delete_gallery_item),
                            ),
                    ),
            )
            .service(
                web::scope("/component")
                    .route("/select", web::get().to(components::select_components))
                    .route("/filter", web::post().to(components::filter_components)),
            )
            .service(
                web::scope("/portfolio")
                    .route("", web::get().to(portfolios::list_portfolios))
                    .route("", web::post().to(portfolios::create_portfolio))
                    .route("/{id}", web::get().to(portfolios::get_portfolio))
                    .route("/{id}", web::put().to(portfolios::update_portfolio))
                    .route("/{id}", web::delete().to(portfolios::archive_portfolio)),
            ),
    );
}
