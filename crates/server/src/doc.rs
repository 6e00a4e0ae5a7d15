use crate::{
    auth::session::SESSION_COOKIE,
    routes::{admin, auth, health, oauth, pages, teachers_list},
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        pages::home,
        pages::about,
        pages::community,
        pages::faq,
        pages::terms,
        pages::unauthorized,
        auth::sign_up,
        auth::confirm,
        auth::login,
        auth::logout,
        auth::current_user,
        oauth::authorize,
        oauth::callback,
        teachers_list::list,
        teachers_list::profile,
        teachers_list::submit_review,
        admin::dashboard,
        admin::subjects::list,
        admin::subjects::create,
        admin::subjects::update,
        admin::subjects::toggle_active,
        admin::subjects::delete,
        admin::teachers::list,
        admin::teachers::create_form,
        admin::teachers::create,
        admin::teachers::edit_form,
        admin::teachers::update,
        admin::teachers::toggle_active,
        admin::teachers::delete,
        admin::assignments::list,
        admin::assignments::create,
        admin::assignments::update,
        admin::assignments::delete,
    ),
    modifiers(&SecurityAddon),
    security(("session" = [])),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Pages", description = "Informational pages"),
        (name = "Authentication", description = "Accounts and sessions"),
        (name = "Teachers", description = "Public teacher directory and reviews"),
        (name = "Admin", description = "Catalog management, admins only"),
    ),
    info(
        title = "FIME-NET API",
        version = "1.0.0",
        description = "Teachers, subjects and reviews for the FIME student community",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
