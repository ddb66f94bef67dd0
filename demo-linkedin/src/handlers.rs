use axum::response::Html;
use oauth2_linkedin_axum::O2L_ROUTE_PREFIX;

pub(crate) async fn index() -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>LinkedIn sign-in demo</title></head>
<body>
<p>Click the button below to sign in.</p>
<a href="{prefix}/linkedin"><button>Sign in with LinkedIn</button></a>
</body>
</html>"#,
        prefix = O2L_ROUTE_PREFIX.as_str()
    ))
}
