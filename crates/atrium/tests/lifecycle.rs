//! End-to-end lifecycle tests across the facade: global response headers,
//! session resolution, and callback ordering through a full request.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use atrium::prelude::*;
use atrium_test::{CountingSessionFactory, EventLog, StaticUrlGenerator, TestRequest};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;

struct SingleRoute {
    name: &'static str,
    pattern: &'static str,
}

impl RouteResolver for SingleRoute {
    fn resolve(&self, request: &RequestContext) -> Option<(RouteMatch, HashMap<String, String>)> {
        (request.path() == self.pattern)
            .then(|| (RouteMatch::new(self.name, self.pattern), HashMap::new()))
    }
}

fn configured_registry(factory: &Arc<CountingSessionFactory>) -> Arc<ServiceRegistry> {
    let registry = Arc::new(ServiceRegistry::new());
    registry.set_session_factory(Arc::clone(factory) as Arc<dyn SessionFactory>);
    registry.set_url_generator(Arc::new(StaticUrlGenerator::default()));
    registry
}

#[tokio::test]
async fn global_headers_applied_through_full_lifecycle() {
    let factory = Arc::new(CountingSessionFactory::new());
    let registry = configured_registry(&factory);

    let mut router = Router::new(
        Arc::new(SingleRoute {
            name: "home",
            pattern: "/",
        }),
        registry,
    );

    // Security headers attached to every request at ingress, applied only
    // once a response exists.
    router.on_new_request(|ctx| {
        add_global_response_headers(
            ctx,
            vec![
                (
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ),
                (
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ),
            ],
        );
    });

    router.add_handler(
        "home",
        Arc::new(FnHandler::new(|_ctx| {
            Box::pin(async {
                Ok(http::Response::builder()
                    .status(StatusCode::OK)
                    .body(Bytes::from_static(b"welcome"))
                    .expect("response builds"))
            })
        })),
    );

    let response = router
        .handle_request(TestRequest::get("/").build_request())
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}

#[tokio::test]
async fn session_resolved_in_handler_and_reused_by_callbacks() {
    let factory = Arc::new(CountingSessionFactory::new());
    let registry = configured_registry(&factory);

    let mut router = Router::new(
        Arc::new(SingleRoute {
            name: "profile",
            pattern: "/profile",
        }),
        registry,
    );

    router.add_handler(
        "profile",
        Arc::new(FnHandler::new(|ctx| {
            ctx.session().expect("factory registered");
            ctx.add_finished_callback(|ctx| {
                // Cached: the factory must not run a second time.
                ctx.session().expect("factory registered");
                Ok(())
            });
            Box::pin(async {
                Ok(http::Response::builder()
                    .body(Bytes::new())
                    .expect("response builds"))
            })
        })),
    );

    router
        .handle_request(TestRequest::get("/profile").build_request())
        .await
        .expect("request succeeds");

    assert_eq!(factory.calls(), 1);
}

#[tokio::test]
async fn url_helpers_available_to_handlers() {
    let factory = Arc::new(CountingSessionFactory::new());
    let registry = configured_registry(&factory);

    let mut router = Router::new(
        Arc::new(SingleRoute {
            name: "listing",
            pattern: "/widgets",
        }),
        registry,
    );

    router.add_handler(
        "listing",
        Arc::new(FnHandler::new(|ctx| {
            let next_page = ctx
                .route_url("listing", &[], &[("page", "2")])
                .expect("generator registered");
            Box::pin(async move {
                Ok(http::Response::builder()
                    .header(http::header::LINK, next_page)
                    .body(Bytes::new())
                    .expect("response builds"))
            })
        })),
    );

    let response = router
        .handle_request(TestRequest::get("/widgets").build_request())
        .await
        .expect("request succeeds");

    assert_eq!(
        response.headers().get(http::header::LINK).unwrap(),
        "https://test.example/route/listing?page=2"
    );
}

#[tokio::test]
async fn transaction_style_finished_callback_sees_outcome() {
    let log = EventLog::new();
    let factory = Arc::new(CountingSessionFactory::new());

    let mut router = Router::new(
        Arc::new(SingleRoute {
            name: "orders",
            pattern: "/orders",
        }),
        configured_registry(&factory),
    );

    let request_log = log.clone();
    router.on_new_request(move |ctx| {
        let fin_log = request_log.clone();
        ctx.add_finished_callback(move |ctx| {
            if ctx.exception().is_some() {
                fin_log.push("abort");
            } else {
                fin_log.push("commit");
            }
            Ok(())
        });
    });

    router.add_handler(
        "orders",
        Arc::new(FnHandler::new(|_ctx| {
            Box::pin(async { Err(anyhow!("constraint violation")) })
        })),
    );

    let err = router
        .handle_request(TestRequest::get("/orders").build_request())
        .await
        .expect_err("handler fails");
    assert!(err.to_string().contains("constraint violation"));
    assert_eq!(log.snapshot(), vec!["abort"]);
}
