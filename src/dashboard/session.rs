use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};

/// Name of the encrypted cookie carrying the caller's role.
pub const SESSION_COOKIE: &str = "fpl_session";
const ADMIN_ROLE: &str = "admin";

/// Session of the caller of one request, read from its cookie jar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub is_admin: bool,
}

impl Session {
    pub fn guest() -> Self {
        Self { is_admin: false }
    }

    pub fn admin() -> Self {
        Self { is_admin: true }
    }

    /// Cookies that fail to decrypt are ignored, so a forged value reads as guest.
    pub fn from_jar(jar: &PrivateCookieJar) -> Self {
        match jar.get(SESSION_COOKIE) {
            Some(cookie) if cookie.value() == ADMIN_ROLE => Self::admin(),
            _ => Self::guest(),
        }
    }
}

pub fn sign_in(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(session_cookie(ADMIN_ROLE))
}

pub fn sign_out(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(session_cookie(""))
}

fn session_cookie(value: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}
