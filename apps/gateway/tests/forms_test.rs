mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{json_body, test_app};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_new_form_has_defaults() {
    let request = Request::builder()
        .uri("/forms/colabfold/new")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let form = json_body(response).await;
    assert_eq!(form["tool"], json!("colabfold"));
    assert_eq!(form["fields"]["msaMode"], json!("mmseqs2_uniref_env"));
    assert!(!form["fields"]["jobName"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_tool_is_not_found() {
    let request = Request::builder()
        .uri("/forms/rosettafold/new")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], json!("Unknown tool: rosettafold"));
}

#[tokio::test]
async fn test_validate_reports_field_errors() {
    let form = json!({
        "tool": "esmfold",
        "fields": {"jobName": "abc def", "email": "a@b.co", "proteinSequence": "MKT"}
    });
    let response = test_app()
        .oneshot(post_json("/forms/esmfold/validate", form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result = json_body(response).await;
    assert_eq!(result["isValid"], json!(false));
    assert_eq!(
        result["errors"],
        json!({"jobName": "Only letters, numbers, and dashes (hyphens) are allowed."})
    );
    assert_eq!(result["files"]["isValid"], json!(true));
}

#[tokio::test]
async fn test_path_tool_wins() {
    // posted as esmfold, validated as multifold
    let form = json!({
        "tool": "esmfold",
        "fields": {"jobName": "abc", "email": "a@b.co", "proteinSequence": "MKT"},
        "selectedTools": ["esmfold"]
    });
    let response = test_app()
        .oneshot(post_json("/forms/multifold/validate", form))
        .await
        .unwrap();
    let result = json_body(response).await;
    assert_eq!(
        result["errors"]["selectedTools"],
        json!("At least two tools must be selected.")
    );
}

#[tokio::test]
async fn test_body_needs_no_tool() {
    for form in [
        json!({"fields": {"jobName": "abc", "email": "a@b.co", "proteinSequence": "MKT"}}),
        json!({"tool": "rosettafold", "fields": {"jobName": "abc", "email": "a@b.co", "proteinSequence": "MKT"}}),
    ] {
        let response = test_app()
            .oneshot(post_json("/forms/esmfold/validate", form))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["isValid"], json!(true));
    }
}

#[tokio::test]
async fn test_non_object_body_is_bad_request() {
    let response = test_app()
        .oneshot(post_json("/forms/esmfold/validate", json!(["MKT"])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_submit_is_unprocessable() {
    let form = json!({"tool": "esmfold", "fields": {"jobName": "abc"}});
    let response = test_app()
        .oneshot(post_json("/forms/esmfold/submit", form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.headers().contains_key(header::SET_COOKIE));

    let result = json_body(response).await;
    assert_eq!(result["isValid"], json!(false));
    assert_eq!(result["errors"]["email"], json!("Email is required."));
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    let form = json!({
        "tool": "esmfold",
        "fields": {"jobName": "abc", "email": "a@b.co", "proteinSequence": "MKT"}
    });
    let response = test_app()
        .oneshot(post_json("/forms/esmfold/submit", form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await["error"],
        json!("No response received from the server.")
    );
}

#[tokio::test]
async fn test_multifold_reports_each_tool() {
    let form = json!({
        "tool": "multifold",
        "fields": {"jobName": "abc", "email": "a@b.co", "proteinSequence": "MKTAYI"},
        "selectedTools": ["esmfold", "omegafold"]
    });
    let response = test_app()
        .oneshot(post_json("/forms/multifold/submit", form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["successMessage"], json!(""));
    assert_eq!(
        body["errorMessage"],
        json!("Failed to submit jobs for: ESMFold: No response received from the server.; OmegaFold: No response received from the server.")
    );
}

#[tokio::test]
async fn test_unknown_job_listing() {
    let request = Request::builder()
        .uri("/dashboard/jobs/archived")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["ok"], json!(true));
}
