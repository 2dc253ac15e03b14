use crate::{
    auth::{backend::AdminBackend, postgres_store::PostgresSessionStore},
    state::ShowcaseState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use axum_login::{
    AuthManagerLayerBuilder,
    tower_sessions::{Expiry, SessionManagerLayer, cookie::time::Duration},
};
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

pub mod admin;
pub mod department;
pub mod departments;
pub mod index;
pub mod login;
pub mod student;

///photos are the biggest thing anyone sends us
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

///every page and fragment, behind the session + admin login layers
pub fn app(state: ShowcaseState) -> Router {
    let session_layer = SessionManagerLayer::new(PostgresSessionStore::new(state.clone()))
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));
    let auth_backend = AdminBackend::new(state.config().admin_config());
    let auth_layer = AuthManagerLayerBuilder::new(auth_backend, session_layer).build();

    Router::new()
        .route("/", get(index::get_index_route))
        .route("/departments", get(departments::get_departments))
        .route("/department/{slug}", get(department::get_department))
        .route("/student/{id}", get(student::get_student))
        .route("/admin", get(admin::get_admin))
        .route("/admin/login", get(login::get_login).post(login::post_login))
        .route("/admin/logout", post(login::post_logout))
        .route(
            "/internal/department/{slug}/students",
            get(department::internal_get_department_students),
        )
        .route(
            "/internal/admin/students",
            get(admin::internal_get_students)
                .post(admin::internal_post_new_student)
                .delete(admin::internal_delete_student),
        )
        .route("/internal/admin/seed", post(admin::internal_post_seed))
        .layer(auth_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .with_state(state)
}
