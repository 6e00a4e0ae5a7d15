//! Redirect targets that come from the client.

use url::form_urlencoded;

pub const LOGIN_PATH: &str = "/auth/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Returns `target` when it is a local path, `/` otherwise.
///
/// Only paths starting with a single `/` are honoured, so `//host` and
/// backslash forms never leave the site.
pub fn sanitize_redirect(target: Option<&str>) -> String {
    match target.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

/// Login page URL that sends the user back to `path_and_query` afterwards
pub fn login_redirect(path_and_query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(path_and_query.as_bytes()).collect();
    format!("{LOGIN_PATH}?redirectTo={encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_paths_are_kept() {
        assert_eq!(sanitize_redirect(Some("/admin/subjects")), "/admin/subjects");
        assert_eq!(
            sanitize_redirect(Some("/teachers-list?page=2")),
            "/teachers-list?page=2"
        );
    }

    #[test]
    fn test_foreign_targets_fall_back_to_root() {
        for target in [
            "https://evil.example",
            "//evil.example",
            "/\\evil.example",
            "admin",
            "",
            "/ad\nmin",
        ] {
            assert_eq!(sanitize_redirect(Some(target)), "/", "{target:?}");
        }
        assert_eq!(sanitize_redirect(None), "/");
    }

    #[test]
    fn test_login_redirect_encodes_path() {
        assert_eq!(
            login_redirect("/admin/subjects?search=cálculo"),
            "/auth/login?redirectTo=%2Fadmin%2Fsubjects%3Fsearch%3Dc%C3%A1lculo"
        );
        assert_eq!(login_redirect("/admin"), "/auth/login?redirectTo=%2Fadmin");
    }
}
