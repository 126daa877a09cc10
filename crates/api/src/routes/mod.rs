//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod scripts;
pub mod shares;
pub mod users;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    // Protected routes that require a bearer token
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(dashboard::routes())
        .merge(users::routes())
        .merge(scripts::routes())
        .merge(shares::routes())
        .layer(middleware::from_fn(auth_middleware));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}


#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, http::StatusCode};
    use mockito::Server;
    use tower::ServiceExt;

    use super::test_support::{app, json_body};

    #[tokio::test]
    async fn test_health_is_public() {
        let server = Server::new_async().await;

        let response = app(&server)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_protected_routes_reject_missing_token() {
        let server = Server::new_async().await;

        for uri in ["/api/v1/users", "/api/v1/scripts", "/api/v1/dashboard/counters"] {
            let response = app(&server)
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(json_body(response).await["error"], "MISSING_TOKEN", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_blank_token_is_rejected() {
        let server = Server::new_async().await;

        let response = app(&server)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users")
                    .header("Authorization", "Bearer    ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
