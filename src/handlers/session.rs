use actix_web::{cookie::Cookie, HttpResponse};

/// Session teardown. The identity provider owns the session; the API's
/// part is expiring the cookie it set.
pub async fn signout() -> HttpResponse {
    let mut cookie = Cookie::new("session", "");
    cookie.set_path("/");
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).finish()
}
