//! End-to-end tests over the RPC surface, driven through the router without
//! binding a socket.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use cloudcost_plugin_aws::config::{CorsConfig, PluginConfig};
use cloudcost_plugin_aws::server;

fn test_config() -> PluginConfig {
    PluginConfig {
        log_level: "info".to_string(),
        port: 0,
        web_enabled: false,
        health_endpoint: true,
        test_mode: false,
        cors: CorsConfig {
            allowed_origins: Vec::new(),
            allow_credentials: false,
            max_age_secs: 86_400,
        },
    }
}

fn test_router() -> Router {
    server::router(CancellationToken::new(), std::sync::Arc::new(test_config()))
}

async fn request(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("router call");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

async fn post_json(path: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    request(test_router(), req).await
}

async fn get(path: &str) -> (StatusCode, Value) {
    let req = Request::get(path).body(Body::empty()).expect("request");
    request(test_router(), req).await
}

fn resource(resource_type: &str, sku: &str, region: &str, tags: Value) -> Value {
    json!({
        "provider": "aws",
        "resource_type": resource_type,
        "sku": sku,
        "region": region,
        "tags": tags,
    })
}

#[tokio::test]
async fn name_reports_the_plugin_identity() {
    let (status, body) = get("/name").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "aws-public");
    assert!(!body["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_the_catalog_region() {
    let (status, body) = get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["region"], "us-east-1");
}

#[tokio::test]
async fn ec2_projected_cost_matches_the_public_rate() {
    let (status, body) = post_json(
        "/projected-cost",
        json!({ "resource": resource("ec2", "t3.micro", "us-east-1", json!({})) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!((body["unit_price"].as_f64().unwrap() - 0.0104).abs() < 1e-9);
    assert!((body["cost_per_month"].as_f64().unwrap() - 7.592).abs() < 1e-6);
    assert_eq!(body["currency"], "USD");
    assert!(body["billing_detail"]
        .as_str()
        .unwrap()
        .contains("On-demand Linux, Shared tenancy, 730 hrs/month"));

    let carbon = body["impact_metrics"]
        .as_array()
        .unwrap()
        .iter()
        .find(|metric| metric["kind"] == "carbon-footprint")
        .expect("carbon metric");
    assert_eq!(carbon["unit"], "gCO2e");
    let grams = carbon["value"].as_f64().unwrap();
    assert!(grams > 500.0 && grams < 5000.0, "got {grams} g");

    assert_eq!(body["growth_type"], "STATIC");
}

#[tokio::test]
async fn ebs_without_a_size_tag_defaults_to_eight_gb() {
    let (status, body) = post_json(
        "/projected-cost",
        json!({ "resource": resource("ebs", "gp2", "us-east-1", json!({})) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rate = body["unit_price"].as_f64().unwrap();
    assert!((body["cost_per_month"].as_f64().unwrap() - rate * 8.0).abs() < 1e-9);
    assert!(body["billing_detail"].as_str().unwrap().contains("defaulted to 8GB"));
}

#[tokio::test]
async fn region_mismatch_is_a_typed_error_with_both_regions() {
    let req = Request::post("/projected-cost")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-trace-id", "trace-e2e-3")
        .body(Body::from(
            json!({ "resource": resource("ec2", "t3.micro", "eu-west-1", json!({})) }).to_string(),
        ))
        .expect("request");
    let (status, body) = request(test_router(), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNSUPPORTED_REGION");
    assert_eq!(body["details"]["pluginRegion"], "us-east-1");
    assert_eq!(body["details"]["requiredRegion"], "eu-west-1");
    assert_eq!(body["details"]["trace_id"], "trace-e2e-3");
}

#[tokio::test]
async fn dynamodb_on_demand_sums_all_three_components() {
    let (status, body) = post_json(
        "/projected-cost",
        json!({ "resource": resource(
            "dynamodb",
            "on-demand",
            "us-east-1",
            json!({
                "read_requests_per_month": "1000000",
                "write_requests_per_month": "500000",
                "storage_gb": "50",
            }),
        ) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Embedded public rates: $0.25/M reads, $1.25/M writes, $0.25/GB-month.
    let expected = 1_000_000.0 * 0.00000025 + 500_000.0 * 0.00000125 + 50.0 * 0.25;
    assert!((body["cost_per_month"].as_f64().unwrap() - expected).abs() < 1e-6);
    let detail = body["billing_detail"].as_str().unwrap();
    assert!(detail.contains("reads"));
    assert!(detail.contains("writes"));
    assert!(detail.contains("storage"));
    assert_eq!(body["growth_type"], "LINEAR");
}

#[tokio::test]
async fn actual_cost_from_created_tag_on_an_imported_resource() {
    let created = (Utc::now() - Duration::hours(73)).to_rfc3339();
    let (status, body) = post_json(
        "/actual-cost",
        json!({
            "resource": resource("ec2", "t3.micro", "us-east-1", json!({})),
            "tags": { "pulumi:created": created, "pulumi:external": "true" },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let runtime = body["runtime_hours"].as_f64().unwrap();
    assert!((runtime - 73.0).abs() < 0.1, "got {runtime} h");
    let expected = 7.592 * runtime / 730.0;
    assert!((body["cost"].as_f64().unwrap() - expected).abs() < 1e-3);
    assert!(body["source"]
        .as_str()
        .unwrap()
        .starts_with("aws-public-fallback[confidence:MEDIUM]"));
}

#[tokio::test]
async fn actual_cost_with_an_explicit_window_is_high_confidence() {
    let end = Utc::now();
    let start = end - Duration::hours(730);
    let (status, body) = post_json(
        "/actual-cost",
        json!({
            "resource": resource("ec2", "t3.micro", "us-east-1", json!({})),
            "start": start.to_rfc3339(),
            "end": end.to_rfc3339(),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!((body["cost"].as_f64().unwrap() - 7.592).abs() < 1e-6);
    assert!(body["source"].as_str().unwrap().contains("[confidence:HIGH]"));
}

#[tokio::test]
async fn actual_cost_for_an_unsupported_service_grades_low() {
    let end = Utc::now();
    let start = end - Duration::hours(100);
    let (status, body) = post_json(
        "/actual-cost",
        json!({
            "resource": resource("aws:sagemaker/endpoint:Endpoint", "ml.m5.large", "us-east-1", json!({})),
            "start": start.to_rfc3339(),
            "end": end.to_rfc3339(),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost"], 0.0);
    assert!(body["source"]
        .as_str()
        .unwrap()
        .starts_with("aws-public-fallback[confidence:LOW]"));
}

#[tokio::test]
async fn actual_cost_without_any_start_source_is_invalid() {
    let (status, body) = post_json(
        "/actual-cost",
        json!({ "resource": resource("ec2", "t3.micro", "us-east-1", json!({})) }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_RESOURCE");
    assert!(!body["details"]["trace_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn short_and_pulumi_qualified_forms_answer_identically() {
    let tags = json!({ "support_type": "standard" });
    let (status_a, body_a) = post_json(
        "/projected-cost",
        json!({ "resource": resource("eks", "", "us-east-1", tags.clone()) }),
    )
    .await;
    let (status_b, body_b) = post_json(
        "/projected-cost",
        json!({ "resource": resource("aws:eks/cluster:Cluster", "", "us-east-1", tags) }),
    )
    .await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_a, status_b);
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn supports_accepts_in_region_services_and_rejects_the_rest() {
    let (_, body) = post_json(
        "/supports",
        json!({ "resource": resource("ec2", "t3.micro", "us-east-1", json!({})) }),
    )
    .await;
    assert_eq!(body["supported"], true);
    assert!(body["supported_metrics"]
        .as_array()
        .unwrap()
        .iter()
        .any(|metric| metric == "carbon-footprint"));

    let (_, body) = post_json(
        "/supports",
        json!({ "resource": resource("ec2", "t3.micro", "eu-west-1", json!({})) }),
    )
    .await;
    assert_eq!(body["supported"], false);
    assert!(body["reason"].as_str().unwrap().contains("eu-west-1"));

    let (_, body) = post_json(
        "/supports",
        json!({ "resource": resource("aws:sagemaker/endpoint:Endpoint", "", "us-east-1", json!({})) }),
    )
    .await;
    assert_eq!(body["supported"], false);
}

#[tokio::test]
async fn zero_cost_network_primitives_project_at_zero() {
    for resource_type in ["vpc", "subnet", "security-group", "aws:ec2/vpc:Vpc"] {
        let (status, body) = post_json(
            "/projected-cost",
            json!({ "resource": resource(resource_type, "", "us-east-1", json!({})) }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{resource_type}");
        assert_eq!(body["cost_per_month"], 0.0, "{resource_type}");
    }
}

#[tokio::test]
async fn missing_sku_where_mandated_is_invalid() {
    let (status, body) = post_json(
        "/projected-cost",
        json!({ "resource": resource("ec2", "", "us-east-1", json!({})) }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_RESOURCE");
}

#[tokio::test]
async fn dev_usage_profile_scales_time_based_cost() {
    let (_, production) = post_json(
        "/projected-cost",
        json!({ "resource": resource("ec2", "t3.micro", "us-east-1", json!({})) }),
    )
    .await;
    let (_, development) = post_json(
        "/projected-cost",
        json!({
            "resource": resource("ec2", "t3.micro", "us-east-1", json!({})),
            "usage_profile": "DEVELOPMENT",
        }),
    )
    .await;

    let scale = development["cost_per_month"].as_f64().unwrap()
        / production["cost_per_month"].as_f64().unwrap();
    assert!((scale - 160.0 / 730.0).abs() < 1e-9);
    assert!(development["billing_detail"].as_str().unwrap().contains("(dev profile)"));
}

#[tokio::test]
async fn lineage_is_derived_from_tags_in_priority_order() {
    let (_, body) = post_json(
        "/projected-cost",
        json!({ "resource": resource(
            "ebs",
            "gp2",
            "us-east-1",
            json!({ "instance_id": "i-0abc", "vpc_id": "vpc-1" }),
        ) }),
    )
    .await;
    assert_eq!(body["lineage"]["relation"], "attached_to");
    assert_eq!(body["lineage"]["parent"], "i-0abc");
}

#[tokio::test]
async fn pricing_spec_reports_rates_without_multiplication() {
    let (status, body) = post_json(
        "/pricing-spec",
        json!({ "resource": resource("ec2", "t3.micro", "us-east-1", json!({})) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "ec2");
    assert_eq!(body["currency"], "USD");
    let rates = body["rates"].as_array().unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0]["unit"], "USD/hr");
    assert!((rates[0]["rate_usd"].as_f64().unwrap() - 0.0104).abs() < 1e-9);
}

#[tokio::test]
async fn recommendations_validate_each_element_independently() {
    let (status, body) = post_json(
        "/recommendations",
        json!({ "target_resources": [
            resource("ebs", "gp2", "us-east-1", json!({ "size": "100" })),
            resource("ec2", "t3.micro", "eu-west-1", json!({})),
        ] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0]["error"].is_null());
    assert!(results[0]["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .any(|rec| rec["rule_id"] == "EBS_GP2_TO_GP3"));
    assert_eq!(results[1]["error"]["code"], "UNSUPPORTED_REGION");
}

#[tokio::test]
async fn dev_profile_batches_flag_oversized_instances() {
    let (status, body) = post_json(
        "/recommendations",
        json!({
            "target_resources": [resource("ec2", "m5.xlarge", "us-east-1", json!({}))],
            "usage_profile": "DEVELOPMENT",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let recs = body["results"][0]["recommendations"].as_array().unwrap();
    let oversized = recs
        .iter()
        .find(|rec| rec["rule_id"] == "EC2_OVERSIZED_DEV_INSTANCE")
        .expect("oversized-dev rule");
    assert_eq!(oversized["suggested_sku"], "m5.large");

    // Same resource without the dev profile stays quiet.
    let (_, body) = post_json(
        "/recommendations",
        json!({ "target_resources": [resource("ec2", "m5.xlarge", "us-east-1", json!({}))] }),
    )
    .await;
    let recs = &body["results"][0]["recommendations"];
    assert!(recs.is_null()
        || !recs
            .as_array()
            .unwrap()
            .iter()
            .any(|rec| rec["rule_id"] == "EC2_OVERSIZED_DEV_INSTANCE"));
}

#[tokio::test]
async fn recommendation_batches_are_capped_at_one_hundred() {
    let oversized: Vec<Value> = (0..101)
        .map(|_| resource("ebs", "gp2", "us-east-1", json!({})))
        .collect();
    let (status, body) =
        post_json("/recommendations", json!({ "target_resources": oversized })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_RESOURCE");
}

#[tokio::test]
async fn cancelled_token_aborts_with_the_cancellation_code() {
    let token = CancellationToken::new();
    token.cancel();
    let router = server::router(token, std::sync::Arc::new(test_config()));
    let req = Request::post("/projected-cost")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "resource": resource("ec2", "t3.micro", "us-east-1", json!({})) }).to_string(),
        ))
        .expect("request");
    let (status, body) = request(router, req).await;
    assert_eq!(status.as_u16(), 499);
    assert_eq!(body["code"], "CANCELLED");
}

#[tokio::test]
async fn identical_requests_are_byte_stable() {
    let payload = json!({ "resource": resource(
        "dynamodb",
        "on-demand",
        "us-east-1",
        json!({ "read_requests_per_month": "123456", "storage_gb": "7" }),
    ) });
    let (_, first) = post_json("/projected-cost", payload.clone()).await;
    let (_, second) = post_json("/projected-cost", payload).await;
    assert_eq!(first, second);
}
