use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::SharedStore;
use crate::handlers::{self, connection_requests, nearby, private_chat, users, AppState};
use crate::utils::Config;

pub fn create_router(store: SharedStore, config: Config) -> Router {
    let cors_layer = create_cors_layer(&config);
    let app_state: AppState = (store, config);

    let protected = Router::new()
        // Location store and discovery
        .route("/nearby-users", get(nearby::find_nearby))
        .route(
            "/nearby-users/location",
            put(nearby::update_location).get(nearby::get_location),
        )
        .route("/nearby-users/stats", get(nearby::nearby_stats))
        // Connection gate
        .route(
            "/private-chat",
            post(private_chat::start_private_chat).get(private_chat::list_private_chats),
        )
        .route("/private-chat/check-mutual/{user_id}", get(private_chat::check_mutual))
        // Profiles and social graph
        .route("/users/me", get(users::get_me).put(users::update_me))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/{user_id}/follow", post(users::follow).delete(users::unfollow))
        .route("/users/{user_id}/followers", get(users::followers))
        .route("/users/{user_id}/following", get(users::following))
        .route(
            "/connection-requests",
            post(connection_requests::send).get(connection_requests::list_incoming),
        )
        .route("/connection-requests/{request_id}/respond", post(connection_requests::respond))
        .layer(middleware::from_fn_with_state(app_state.clone(), handlers::require_auth));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state)
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        // Default to permissive for development
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EARTH_RADIUS_KM, USER_ID_HEADER};
    use crate::db::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app() -> Router {
        create_router(Arc::new(MemoryStore::new()), Config::default())
    }

    async fn call(app: &Router, method: Method, uri: &str, user: Option<Uuid>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = user {
            builder = builder.header(USER_ID_HEADER, id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn register(app: &Router, name: &str, interests: &[&str]) -> Uuid {
        let id = Uuid::new_v4();
        let (status, _) = call(
            app,
            Method::PUT,
            "/users/me",
            Some(id),
            Some(json!({ "displayName": name, "interests": interests })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    async fn locate(app: &Router, user: Uuid, latitude: f64, longitude: f64) {
        let (status, body) = call(
            app,
            Method::PUT,
            "/nearby-users/location",
            Some(user),
            Some(json!({ "latitude": latitude, "longitude": longitude, "city": "Munich" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("OK".into()));
    }

    #[tokio::test]
    async fn test_requires_identity_header() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/nearby-users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_discovery_without_location() {
        let app = app();
        let user = register(&app, "nomad", &[]).await;

        let (status, body) = call(&app, Method::GET, "/nearby-users", Some(user), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "LOCATION_REQUIRED");

        let (status, body) = call(&app, Method::GET, "/nearby-users/stats", Some(user), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "totalUsers": 0, "nearbyCount": 0, "onlineCount": 0, "sharedInterestCount": 0 }));
    }

    #[tokio::test]
    async fn test_invalid_coordinates_are_rejected() {
        let app = app();
        let user = register(&app, "nomad", &[]).await;
        let (status, body) = call(
            &app,
            Method::PUT,
            "/nearby-users/location",
            Some(user),
            Some(json!({ "latitude": 91.0, "longitude": 0.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_input_uses_error_body() {
        let app = app();
        let user = register(&app, "nomad", &[]).await;

        let (status, body) = call(
            &app,
            Method::PUT,
            "/nearby-users/location",
            Some(user),
            Some(json!({ "latitude": "abc", "longitude": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"].as_str().unwrap().contains("latitude"));

        for uri in ["/nearby-users?maxDistance=abc", "/nearby-users?limit=-1", "/nearby-users?showOnlineOnly=maybe"] {
            let (status, body) = call(&app, Method::GET, uri, Some(user), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["code"], "VALIDATION_ERROR", "{uri}");
        }

        let (status, body) = call(&app, Method::GET, "/private-chat/check-mutual/not-a-uuid", Some(user), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = call(&app, Method::POST, "/private-chat", Some(user), Some(json!({ "userId": 7 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_location_before_profile_is_not_found() {
        let app = app();
        let user = Uuid::new_v4();

        let (status, body) = call(
            &app,
            Method::PUT,
            "/nearby-users/location",
            Some(user),
            Some(json!({ "latitude": 48.1, "longitude": 11.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, body) = call(
            &app,
            Method::PUT,
            "/users/me",
            Some(user),
            Some(json!({ "displayName": "nomad", "interests": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        locate(&app, user, 48.1, 11.5).await;
    }

    #[tokio::test]
    async fn test_nearby_travelers_find_each_other() {
        let app = app();
        let a = register(&app, "ana", &["food", "hiking", "art"]).await;
        let b = register(&app, "ben", &["hiking", "art"]).await;
        let five_km = (5.0 / EARTH_RADIUS_KM).to_degrees();
        locate(&app, a, 48.1, 11.5).await;
        locate(&app, b, 48.1 + five_km, 11.5).await;

        let (status, body) = call(&app, Method::GET, "/nearby-users?maxDistance=10", Some(a), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["users"][0]["userId"], b.to_string());
        assert_eq!(body["users"][0]["mutualInterestCount"], 2);
        assert_eq!(body["users"][0]["city"], "Munich");

        let (_, body) = call(&app, Method::GET, "/nearby-users?maxDistance=10&sortBy=interests", Some(b), None).await;
        assert_eq!(body["users"][0]["userId"], a.to_string());

        let (_, body) = call(&app, Method::GET, "/nearby-users?maxDistance=4", Some(a), None).await;
        assert_eq!(body["count"], 0);

        let (_, body) = call(&app, Method::GET, "/nearby-users?interests=surf", Some(a), None).await;
        assert_eq!(body["count"], 0);

        let (_, body) = call(&app, Method::GET, "/nearby-users?showOnlineOnly=true", Some(a), None).await;
        assert_eq!(body["count"], 1);

        let (status, body) = call(&app, Method::GET, "/nearby-users?sortBy=age", Some(a), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (_, body) = call(&app, Method::GET, "/nearby-users/stats", Some(a), None).await;
        assert_eq!(body["totalUsers"], 1);
        assert_eq!(body["nearbyCount"], 1);
        assert_eq!(body["sharedInterestCount"], 1);
    }

    #[tokio::test]
    async fn test_private_chat_gate() {
        let app = app();
        let a = register(&app, "ana", &[]).await;
        let b = register(&app, "ben", &[]).await;

        let (status, _) = call(&app, Method::POST, &format!("/users/{b}/follow"), Some(a), None).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&app, Method::GET, &format!("/private-chat/check-mutual/{b}"), Some(a), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "currentUserFollows": true, "otherUserFollows": false, "isMutualFollow": false }));

        let (status, body) = call(&app, Method::POST, "/private-chat", Some(a), Some(json!({ "userId": b }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "NOT_MUTUAL_FOLLOW");

        call(&app, Method::POST, &format!("/users/{a}/follow"), Some(b), None).await;

        let (status, first) = call(&app, Method::POST, "/private-chat", Some(a), Some(json!({ "userId": b }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["isNew"], true);

        let (status, second) = call(&app, Method::POST, "/private-chat", Some(b), Some(json!({ "userId": a }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["isNew"], false);
        assert_eq!(second["chatId"], first["chatId"]);

        let (status, _) = call(&app, Method::DELETE, &format!("/users/{a}/follow"), Some(b), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = call(&app, Method::GET, &format!("/private-chat/check-mutual/{a}"), Some(b), None).await;
        assert_eq!(body["isMutualFollow"], false);

        let (_, chats) = call(&app, Method::GET, "/private-chat", Some(a), None).await;
        assert_eq!(chats[0]["chatId"], first["chatId"]);
        assert_eq!(chats[0]["canMessage"], false);
    }

    #[tokio::test]
    async fn test_connection_request_flow() {
        let app = app();
        let a = register(&app, "ana", &[]).await;
        let b = register(&app, "ben", &[]).await;

        let (status, request) = call(&app, Method::POST, "/connection-requests", Some(a), Some(json!({ "userId": b }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(request["status"], "pending");

        let (_, incoming) = call(&app, Method::GET, "/connection-requests", Some(b), None).await;
        assert_eq!(incoming.as_array().unwrap().len(), 1);

        let id = request["id"].as_str().unwrap().to_string();
        let (status, accepted) = call(
            &app,
            Method::POST,
            &format!("/connection-requests/{id}/respond"),
            Some(b),
            Some(json!({ "accept": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(accepted["status"], "accepted");

        let (_, body) = call(&app, Method::GET, &format!("/private-chat/check-mutual/{b}"), Some(a), None).await;
        assert_eq!(body["isMutualFollow"], true);

        let (_, followers) = call(&app, Method::GET, &format!("/users/{a}/followers"), Some(a), None).await;
        assert_eq!(followers[0]["followerId"], b.to_string());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let app = app();
        let a = register(&app, "ana", &[]).await;
        let stranger = Uuid::new_v4();

        let (status, body) = call(&app, Method::GET, &format!("/users/{stranger}"), Some(a), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = call(&app, Method::POST, &format!("/users/{stranger}/follow"), Some(a), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
