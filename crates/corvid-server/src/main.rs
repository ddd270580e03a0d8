mod controllers;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use corvid::{
    Config, FormData, QueryParams, RegistryBuilder, RequestContext, RequestHandler, Services,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    handler: Arc<RequestHandler>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::load_default().unwrap_or_else(|e| {
        warn!("Failed to load config: {:#}, using defaults", e);
        Config::default()
    });

    if let Ok(port) = std::env::var("CORVID_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %port, "Ignoring invalid CORVID_PORT"),
        }
    }

    let registry = controllers::register(
        RegistryBuilder::new().case_insensitive(config.routing.case_insensitive),
    )
    .build()
    .context("Invalid controller registration")?;
    info!(routes = registry.matcher().routes().len(), "Controllers registered");

    let services = Services::from_config(&config)?;
    let handler = RequestHandler::with_defaults(Arc::new(registry), services);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app(handler)).await?;
    Ok(())
}

fn app(handler: RequestHandler) -> Router {
    let state = AppState {
        handler: Arc::new(handler),
    };

    Router::new()
        .route("/", any(dispatch))
        .route("/*path", any(dispatch))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Segments are decoded by the router, after splitting
    let path = uri.path().to_string();
    let query = uri.query().map(QueryParams::parse).unwrap_or_default();
    let ctx = create_request_context(method, path.clone(), query, headers, body);

    match state.handler.process_request(ctx).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            error!(path = %path, "Request failed: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

fn create_request_context(
    method: Method,
    path: String,
    query: QueryParams,
    headers: HeaderMap,
    body: Bytes,
) -> RequestContext {
    let has_body = matches!(method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE);

    let content_type = headers
        .get("content-type")
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or_default();

    let form = if !has_body {
        FormData::new()
    } else if content_type.contains("application/json") {
        serde_json::from_slice::<JsonValue>(&body)
            .map(FormData::from_json)
            .unwrap_or_else(|_| FormData::new())
    } else if content_type.contains("application/x-www-form-urlencoded") {
        FormData::from_urlencoded(&String::from_utf8_lossy(&body))
    } else {
        FormData::new()
    };

    RequestContext::new(method, path, query, form, headers)
}

fn error_response(status: StatusCode, title: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body>
  <h1>{status}</h1>
  <a href="/">Go Home</a>
</body>
</html>"#,
        title = title,
        status = status
    );
    (status, Html(html)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use corvid::config::SiteConfig;
    use corvid::{MapStringTable, MemoryTemplateFactory};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    const MASTER: &str =
        "<title>{Title}</title><nav>{NavBar}</nav><main>{MainContent}</main><footer>{SiteTitle}</footer>";

    fn test_app() -> Router {
        let templates = MemoryTemplateFactory::new()
            .with_template("Master", MASTER)
            .with_template("Contact", "<form method=\"post\"></form>");
        let strings = MapStringTable::default()
            .with_item("PageNotFound", "Not here")
            .with_item("Welcome", "Welcome!")
            .with_item("SiteTitle", "Corvid");
        let services = Services::new(Arc::new(templates), SiteConfig::default())
            .with_strings(Arc::new(strings));
        let registry = controllers::register(RegistryBuilder::new()).build().unwrap();
        app(RequestHandler::with_defaults(Arc::new(registry), services))
    }

    async fn send(request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_home_page() {
        let (status, headers, body) = send(get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "text/html; charset=utf-8");
        assert!(body.contains("<h1>Welcome!</h1>"));
        assert!(body.contains(r#"<a href="/contact">"#));
    }

    #[tokio::test]
    async fn test_user_route() {
        let (status, _, body) = send(get("/users/7")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<title>User 7</title>"));
    }

    #[tokio::test]
    async fn test_unknown_path_renders_not_found_page() {
        let (status, _, body) = send(get("/no/such/page")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("<h1>Not here</h1>"));
    }

    #[tokio::test]
    async fn test_site_title_reaches_every_page() {
        let (_, _, body) = send(get("/users/7")).await;
        assert!(body.ends_with("<footer>Corvid</footer>"));

        let (status, _, body) = send(get("/no/such/page")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.ends_with("<footer>Corvid</footer>"));
    }

    #[tokio::test]
    async fn test_error_page_is_not_addressable() {
        let (status, _, body) = send(get("/not-found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("<h1>Not here</h1>"));
    }

    #[tokio::test]
    async fn test_encoded_slash_stays_in_route_param() {
        let (status, _, _) = send(get("/users/7%2F8")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, body) = send(get("/users/%37")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<title>User 7</title>"));
    }

    #[tokio::test]
    async fn test_json_endpoint() {
        let (status, headers, body) = send(get("/api/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_contact_submit() {
        let (status, headers, _) = send(post_form(
            "/contact",
            "name=Ada&email=ada%40example.com&message=Hello+there+friend",
        ))
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers["location"], "/");

        let (status, _, body) = send(post_form(
            "/contact",
            "name=Ada&email=nope&message=Hello+there+friend",
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("email"));
    }

    #[tokio::test]
    async fn test_method_not_registered_is_not_found() {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/contact")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_create_request_context_parses_form() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/x-www-form-urlencoded".parse().unwrap());
        let ctx = create_request_context(
            Method::POST,
            "/contact".to_string(),
            QueryParams::default(),
            headers,
            Bytes::from_static(b"name=Ada+L"),
        );
        assert_eq!(ctx.form.get("name").map(String::as_str), Some("Ada L"));

        let ctx = create_request_context(
            Method::GET,
            "/".to_string(),
            QueryParams::parse("q=1"),
            HeaderMap::new(),
            Bytes::new(),
        );
        assert!(ctx.form.is_empty());
        assert_eq!(ctx.query.get("q").map(String::as_str), Some("1"));
    }
}
