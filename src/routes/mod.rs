use actix_web::{web, HttpResponse, Responder};

use crate::db::{check_health, StoreHealthStatus};
use crate::types::{AppState, HealthStatus, ResponsePayload};

mod shortlink;

// Handler function for the root route "/"
async fn index() -> impl Responder {
    let welcome_message = ResponsePayload {
        status: 200,
        message: String::from("Welcome and have a great time!"),
    };

    HttpResponse::Ok().json(welcome_message)
}

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let uptime = data.start_time.elapsed().as_secs();
    let store_health = check_health(data.store.as_ref(), data.backend, data.probe_timeout).await;

    let (status, mut response) = match store_health.status {
        StoreHealthStatus::Healthy => ("OK", HttpResponse::Ok()),
        StoreHealthStatus::Unhealthy => ("DEGRADED", HttpResponse::ServiceUnavailable()),
    };

    response.json(HealthStatus {
        status: String::from(status),
        version: data.version.clone(),
        store_health,
        uptime_seconds: uptime,
    })
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
    cfg.route("/health", web::get().to(health_check));
    shortlink::configure_routes(cfg);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use actix_web::{
        http::{header::LOCATION, StatusCode},
        test, App,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::repositories::{keys, KeyValueStore, MemoryStore};
    use crate::services;

    const LONG_URL: &str = "https://www.baidu.com";

    // Wires the full route table against an in-memory keyspace
    macro_rules! init_app {
        ($store:expr) => {{
            let shared: Arc<dyn KeyValueStore> = $store;
            let service = services::build(shared.clone(), None);

            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState {
                        start_time: Instant::now(),
                        version: "test".to_string(),
                        store: shared,
                        backend: "memory",
                        probe_timeout: None,
                    }))
                    .configure(|cfg| services::register(service, cfg))
                    .configure(configure_routes),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_create_shortlink() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(keys::COUNTER_KEY, "40926057697", None)
            .await
            .unwrap();
        let app = init_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/shorten")
            .set_json(json!({ "url": LONG_URL, "expiration_in_minutes": 60 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["shortlink"], "IFHzaO");
    }

    #[actix_web::test]
    async fn test_create_rejects_invalid_input() {
        let app = init_app!(Arc::new(MemoryStore::new()));

        for payload in [
            json!({ "url": "", "expiration_in_minutes": 60 }),
            json!({ "url": "ftp://example.com", "expiration_in_minutes": 60 }),
            json!({ "url": LONG_URL, "expiration_in_minutes": -5 }),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/shorten")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn test_redirect() {
        let app = init_app!(Arc::new(MemoryStore::new()));

        let req = test::TestRequest::post()
            .uri("/api/shorten")
            .set_json(json!({ "url": LONG_URL, "expiration_in_minutes": 60 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let shortlink = body["shortlink"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/{}", shortlink))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), LONG_URL);
    }

    #[actix_web::test]
    async fn test_info() {
        let app = init_app!(Arc::new(MemoryStore::new()));

        let req = test::TestRequest::post()
            .uri("/api/shorten")
            .set_json(json!({ "url": LONG_URL, "expiration_in_minutes": 60 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let shortlink = body["shortlink"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/info?shortlink={}", shortlink))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let detail: Value = test::read_body_json(resp).await;
        assert_eq!(detail["url"], LONG_URL);
        assert_eq!(detail["expiration_in_minutes"], 60);
        assert!(!detail["created_at"].as_str().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_info_passes_stored_record_through() {
        let store = Arc::new(MemoryStore::new());
        let stored = json!({
            "url": LONG_URL,
            "created_at": 1611754302,
            "expiration_in_minutes": 60,
            "owner": "bob"
        });
        store
            .set(&keys::detail_key("abc"), &stored.to_string(), None)
            .await
            .unwrap();
        let app = init_app!(store);

        let req = test::TestRequest::get()
            .uri("/api/info?shortlink=abc")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, stored);
    }

    #[actix_web::test]
    async fn test_unknown_shortlink_is_404() {
        let app = init_app!(Arc::new(MemoryStore::new()));

        let req = test::TestRequest::get().uri("/api/missing1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/info?shortlink=missing1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status_code"], 404);
    }

    #[actix_web::test]
    async fn test_info_rejects_malformed_shortlink() {
        let app = init_app!(Arc::new(MemoryStore::new()));

        let req = test::TestRequest::get()
            .uri("/api/info?shortlink=not-valid")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = init_app!(Arc::new(MemoryStore::new()));

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["store_health"]["status"], "healthy");
        assert_eq!(body["store_health"]["backend"], "memory");
    }
}
