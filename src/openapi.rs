use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AuthResponse, ClassSession, LoginRequest, MessageResponse, NewClassSession, NewPlan, Plan,
    RegisterRequest, Role, RoleUpdate, User, UserSummary,
};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "query_token",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::account::register,
        crate::handlers::account::login,
        crate::handlers::account::me,
        crate::handlers::classes::list_classes,
        crate::handlers::classes::create_class,
        crate::handlers::classes::delete_class,
        crate::handlers::classes::my_classes,
        crate::handlers::classes::my_classes_ical,
        crate::handlers::classes::book_class,
        crate::handlers::classes::cancel_booking,
        crate::handlers::admin::list_users,
        crate::handlers::admin::update_user_role,
        crate::handlers::admin::list_plans,
        crate::handlers::admin::create_plan,
        crate::handlers::admin::delete_plan
    ),
    components(schemas(
        ClassSession,
        NewClassSession,
        Plan,
        NewPlan,
        User,
        UserSummary,
        Role,
        RoleUpdate,
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        MessageResponse
    )),
    tags(
        (name = "service", description = "Service information and health"),
        (name = "auth", description = "Registration and login"),
        (name = "classes", description = "Class listing and bookings"),
        (name = "plans", description = "Membership plans"),
        (name = "admin", description = "User administration")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;
