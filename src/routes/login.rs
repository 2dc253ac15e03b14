use crate::{
    auth::{AuthUtilities, ShowcaseSession, backend::AdminCredentials},
    error::ShowcaseResult,
    maud_conveniences::{form_submit_button, simple_form_element, title},
    state::ShowcaseState,
};
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::html;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginOptions {
    pub login_failed: Option<bool>,
}

pub async fn get_login(
    State(state): State<ShowcaseState>,
    session: ShowcaseSession,
    Query(LoginOptions { login_failed }): Query<LoginOptions>,
) -> Response {
    if session.is_admin() {
        return Redirect::to("/admin").into_response();
    }

    let login_failed = login_failed.unwrap_or(false);

    state
        .render(&session, html! {
            div class="flex justify-center py-16 px-4" {
                div class="bg-gray-800 shadow-md rounded px-8 pt-6 pb-8 mb-4 w-full max-w-sm" {
                    (title("Admin Login"))
                    @if login_failed {
                        div role="alert" class="bg-red-100 border border-red-400 text-red-700 px-4 py-4 rounded relative mb-4" {
                            // no detail about which half was wrong
                            span class="block sm:inline" {"Invalid email or password"}
                        }
                    }

                    form method="post" action="/admin/login" {
                        (simple_form_element("email", "Email", true, Some("email"), None))
                        (simple_form_element("password", "Password", true, Some("password"), None))
                        (form_submit_button(Some("Login")))
                    }
                }
            }
        })
        .into_response()
}

pub async fn post_login(
    mut session: ShowcaseSession,
    Form(credentials): Form<AdminCredentials>,
) -> ShowcaseResult<Redirect> {
    match session.authenticate(credentials).await? {
        Some(admin) => {
            session.login(&admin).await?;
            Ok(Redirect::to("/admin"))
        }
        None => Ok(Redirect::to("/admin/login?login_failed=true")),
    }
}

pub async fn post_logout(mut session: ShowcaseSession) -> ShowcaseResult<impl IntoResponse> {
    session.logout().await?;
    Ok(Redirect::to("/admin/login"))
}
