//! Tests for HTTP error mapping.

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::{App, ResponseError, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::conflict("Email already registered"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn body_of(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON parses")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "secret": "x" }));

    let response = ResponseError::error_response(&error);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(
        body_of(response).await,
        json!({
            "code": "internal_error",
            "detail": "Internal server error",
            "trace_id": expected_trace_id,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn unauthorized_responses_challenge_for_bearer() {
    let response = ResponseError::error_response(&Error::unauthorized("Not authenticated"));

    assert_eq!(
        response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok()),
        Some("Bearer")
    );
    assert_eq!(
        body_of(response).await,
        json!({ "code": "unauthorized", "detail": "Not authenticated" })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_details_and_omit_missing_trace() {
    let error = Error::invalid_request("bad").with_details(json!({ "field": "name" }));
    let response = ResponseError::error_response(&error);

    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    assert_eq!(
        body_of(response).await,
        json!({ "code": "invalid_request", "detail": "bad", "details": { "field": "name" } })
    );
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert!(err.details().is_none());
}

#[derive(serde::Deserialize)]
struct NamedBody {
    #[expect(dead_code, reason = "only deserialised")]
    name: String,
}

#[rstest]
#[case("{not json", "application/json")]
#[case(r#"{"other": 1}"#, "application/json")]
#[case(r#"{"name": "x"}"#, "text/plain")]
#[actix_web::test]
async fn malformed_bodies_map_to_invalid_request(
    #[case] body: &'static str,
    #[case] content_type: &'static str,
) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route(
                "/",
                web::post().to(|_: web::Json<NamedBody>| async { HttpResponse::Ok().finish() }),
            ),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/")
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(res).await;
    assert_eq!(payload["code"], json!("invalid_request"));
}

#[rstest]
#[actix_web::test]
async fn unknown_routes_return_json_not_found() {
    let app = actix_test::init_service(App::new().default_service(web::to(not_found))).await;

    let req = actix_test::TestRequest::get().uri("/nope").to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "code": "not_found", "detail": "Not found" }));
}
