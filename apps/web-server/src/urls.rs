//! Reverse routing for the paths handlers redirect to.

pub const INDEX: &str = "/";
pub const POST_CREATE: &str = "/create/";
pub const LOGIN: &str = "/auth/login/";

pub fn profile(username: &str) -> String {
    format!("/profile/{}/", quote(username, ""))
}

pub fn post_detail(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

pub fn post_edit(post_id: i64) -> String {
    format!("/posts/{post_id}/edit/")
}

/// Login URL that returns to `next` afterwards, e.g. `/auth/login/?next=/create/`.
pub fn login_with_next(next: &str) -> String {
    format!("{LOGIN}?next={}", quote(next, "/"))
}

/// Accepts `next` only when it stays on this site. Browsers drop control
/// characters from `Location`, so `/\t/host` would become `//host`.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| {
        !n.chars().any(char::is_control)
            && n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
    })
}

/// Percent-encodes everything outside the unreserved set and `safe`.
fn quote(raw: &str, safe: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        let c = byte as char;
        if c.is_ascii_alphanumeric() || "-._~".contains(c) || safe.contains(c) {
            out.push(c);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
