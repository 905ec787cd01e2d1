use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use hypertext::prelude::*;
use serde::Deserialize;

use crate::{
    auth::{Admin, clear_admin_cookie, set_admin_cookie},
    state::AppState,
    util_resp::{StandardResponse, bad_request, see_other_ok, success},
    widgets::alert::ErrorAlert,
};

pub async fn login_page(
    admin: Option<Admin>,
    State(state): State<AppState>,
) -> StandardResponse {
    if admin.is_some() {
        return see_other_ok(Redirect::to("/admin"));
    }

    success(state.page().await.body(maud! {
        h1 { "Administration" }
        form method="post" action="/admin/login" {
            div class="mb-3" {
                label for="password" class="form-label" { "Password" }
                input type="password" class="form-control" id="password" name="password" placeholder="Password" required;
            }
            button type="submit" class="btn btn-primary" { "Log in" }
        }
    }).render())
}

#[derive(Deserialize)]
pub struct LoginForm {
    password: String,
}

pub async fn do_login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if form.password != state.site.admin_password {
        // todo: rate limit failed attempts per client address
        tracing::info!("rejected an admin login attempt");
        return bad_request(state.page().await.body(maud! {
            ErrorAlert msg = "Incorrect password. Please try again.";
            a href="/admin/login" { "Back to the login page" }
        }).render())
        .into_response();
    }

    tracing::info!("admin logged in");
    (set_admin_cookie(jar), Redirect::to("/admin")).into_response()
}

pub async fn do_logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (clear_admin_cookie(jar), Redirect::to("/"))
}
