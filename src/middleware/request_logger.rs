use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::{debug, warn};

/// Logs each request and how long the shortlink engine took to answer it.
///
/// Responses slower than `slow_threshold_ms` are logged at warn level even
/// when debug logging is off, since they usually mean the store is struggling.
pub struct RequestLogger {
    enable_debug_logging: bool,
    slow_threshold_ms: u128,
}

impl RequestLogger {
    pub fn new(enable_debug_logging: bool, slow_threshold_ms: u128) -> Self {
        Self {
            enable_debug_logging,
            slow_threshold_ms,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggerMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestLoggerMiddleware {
            service: Rc::new(service),
            enable_debug_logging: self.enable_debug_logging,
            slow_threshold_ms: self.slow_threshold_ms,
        })
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: Rc<S>,
    enable_debug_logging: bool,
    slow_threshold_ms: u128,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let enable_debug_logging = self.enable_debug_logging;
        let slow_threshold_ms = self.slow_threshold_ms;
        let path = req.path().to_owned();
        let method = req.method().clone();

        if enable_debug_logging {
            debug!("Processing request: {} {}", method, path);
        }

        Box::pin(async move {
            let started = Instant::now();
            let res = service.call(req).await?;
            let elapsed_ms = started.elapsed().as_millis();

            if elapsed_ms >= slow_threshold_ms {
                warn!(
                    "Slow response: {} {} - status: {} in {}ms",
                    method,
                    path,
                    res.status(),
                    elapsed_ms
                );
            } else if enable_debug_logging {
                debug!(
                    "Response: {} {} - status: {} in {}ms",
                    method,
                    path,
                    res.status(),
                    elapsed_ms
                );
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    use super::*;

    #[actix_web::test]
    async fn test_passes_response_through() {
        let app = test::init_service(
            App::new()
                .wrap(RequestLogger::new(true, 1_000))
                .route("/", web::get().to(|| async { HttpResponse::Accepted().finish() })),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }
}
