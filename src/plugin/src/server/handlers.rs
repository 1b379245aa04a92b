use std::time::Instant;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use tracing::info;

use crate::actual;
use crate::carbon;
use crate::constants::{MAX_RECOMMENDATION_BATCH, PLUGIN_NAME, PLUGIN_VERSION};
use crate::errors::PluginError;
use crate::estimators;
use crate::metadata;
use crate::pricing::PricingCatalog;
use crate::recommend;
use crate::resource::ResourceDescriptor;

use super::specs;
use super::state::{trace_id_from, AppState};
use super::structs::*;

pub(super) async fn name() -> Json<NameResponse> {
    Json(NameResponse { name: PLUGIN_NAME, version: PLUGIN_VERSION })
}

pub(super) async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, PluginError> {
    let trace_id = trace_id_from(&HeaderMap::new());
    let catalog = state.catalog(&trace_id)?;
    Ok(Json(HealthResponse { status: "ok", region: catalog.region().to_string() }))
}

pub(super) async fn supports(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SupportsRequest>,
) -> Result<Json<SupportsResponse>, PluginError> {
    let trace_id = trace_id_from(&headers);
    let _span = request_span("supports", &trace_id, &request.resource).entered();

    state.ensure_live(&trace_id)?;
    let catalog = state.catalog(&trace_id)?;
    let resource = &request.resource;
    let kind = resource.service_kind();

    let response = if !resource.provider.is_empty() && resource.provider != "aws" {
        unsupported(format!("provider {:?} is not served by this plugin", resource.provider))
    } else if !kind.is_recognized() {
        unsupported(format!(
            "resource type {:?} is not a recognized AWS service",
            resource.resource_type
        ))
    } else if resource.region != catalog.region() {
        unsupported(format!(
            "region {:?} is not served by this {} binary",
            resource.region,
            catalog.region()
        ))
    } else {
        SupportsResponse {
            supported: true,
            reason: None,
            supported_metrics: if kind.supports_carbon() {
                vec![carbon::METRIC_KIND_CARBON_FOOTPRINT.to_string()]
            } else {
                Vec::new()
            },
        }
    };

    Ok(Json(response))
}

pub(super) async fn projected_cost(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ProjectedCostRequest>,
) -> Result<Json<CostResponse>, PluginError> {
    let trace_id = trace_id_from(&headers);
    let started = Instant::now();
    let _span = request_span("projected_cost", &trace_id, &request.resource).entered();

    // Dispatcher entry.
    state.ensure_live(&trace_id)?;
    let catalog = state.catalog(&trace_id)?;
    let resource = &request.resource;
    validate_resource(resource, catalog, &trace_id)?;
    let kind = resource.service_kind();

    // Estimator entry.
    state.ensure_live(&trace_id)?;
    let profile = request.usage_profile.unwrap_or_default();
    let estimate = estimators::project(resource, catalog, profile).map_err(|e| {
        PluginError::InvalidResource { message: e.to_string(), trace_id: trace_id.clone() }
    })?;
    let impact_metrics = carbon::estimate(resource, catalog, request.utilization_percentage);

    if state.config.test_mode {
        tracing::debug!(
            sku = %resource.sku,
            unit_price = estimate.unit_price,
            metric_count = impact_metrics.len(),
            "estimator detail"
        );
    }

    // Response assembly.
    state.ensure_live(&trace_id)?;
    let response = CostResponse {
        unit_price: estimate.unit_price,
        currency: "USD".to_string(),
        cost_per_month: estimate.cost_per_month,
        billing_detail: estimate.billing_detail,
        impact_metrics,
        growth_type: Some(metadata::growth_type(kind)),
        lineage: metadata::lineage(resource),
    };

    info!(
        duration_ms = started.elapsed().as_millis() as u64,
        cost_per_month = response.cost_per_month,
        "projected cost computed"
    );
    Ok(Json(response))
}

pub(super) async fn actual_cost(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ActualCostRequest>,
) -> Result<Json<ActualCostResponse>, PluginError> {
    let trace_id = trace_id_from(&headers);
    let started = Instant::now();
    let _span = request_span("actual_cost", &trace_id, &request.resource).entered();

    state.ensure_live(&trace_id)?;
    let catalog = state.catalog(&trace_id)?;
    let resource = &request.resource;
    validate_resource(resource, catalog, &trace_id)?;
    let kind = resource.service_kind();

    state.ensure_live(&trace_id)?;
    let projected = estimators::project(resource, catalog, Default::default()).map_err(|e| {
        PluginError::InvalidResource { message: e.to_string(), trace_id: trace_id.clone() }
    })?;

    // An unrecognized service still prorates (to $0), but the grade must say
    // how much was assumed.
    let assumption = (!kind.is_recognized()).then(|| {
        format!(
            "service for resource type {:?} is not supported, projected cost assumed $0",
            resource.resource_type
        )
    });

    // Window tags come from three layers: the resource itself, a JSON
    // document in resource_id, and the request's explicit tag field, in
    // rising precedence.
    let mut merged = actual::merge_tags(&resource.tags, request.resource_id.as_deref());
    for (key, value) in &request.tags {
        merged.insert(key.clone(), value.clone());
    }

    let prorated = actual::prorate(
        projected.cost_per_month,
        request.start,
        request.end,
        &merged,
        Utc::now(),
        assumption,
    )
    .map_err(|e| PluginError::InvalidResource {
        message: e.to_string(),
        trace_id: trace_id.clone(),
    })?;

    state.ensure_live(&trace_id)?;
    let response = ActualCostResponse {
        cost: prorated.cost,
        currency: "USD".to_string(),
        runtime_hours: prorated.runtime_hours,
        source: prorated.source_label(),
    };

    info!(
        duration_ms = started.elapsed().as_millis() as u64,
        runtime_hours = response.runtime_hours,
        "actual cost prorated"
    );
    Ok(Json(response))
}

pub(super) async fn pricing_spec(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PricingSpecRequest>,
) -> Result<Json<PricingSpecResponse>, PluginError> {
    let trace_id = trace_id_from(&headers);
    let _span = request_span("pricing_spec", &trace_id, &request.resource).entered();

    state.ensure_live(&trace_id)?;
    let catalog = state.catalog(&trace_id)?;
    let resource = &request.resource;
    validate_resource(resource, catalog, &trace_id)?;

    state.ensure_live(&trace_id)?;
    let rates = specs::rate_components(resource, catalog);

    Ok(Json(PricingSpecResponse {
        service: resource.service_kind().to_string(),
        sku: resource.sku.clone(),
        region: resource.region.clone(),
        currency: "USD".to_string(),
        rates,
    }))
}

pub(super) async fn recommendations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RecommendationsRequest>,
) -> Result<Json<RecommendationsResponse>, PluginError> {
    let trace_id = trace_id_from(&headers);
    let started = Instant::now();

    state.ensure_live(&trace_id)?;
    if request.target_resources.len() > MAX_RECOMMENDATION_BATCH {
        return Err(PluginError::InvalidResource {
            message: format!(
                "batch of {} exceeds the {MAX_RECOMMENDATION_BATCH}-element cap",
                request.target_resources.len()
            ),
            trace_id,
        });
    }
    let catalog = state.catalog(&trace_id)?;
    let profile = request.usage_profile.unwrap_or_default();

    // Elements validate independently; one bad resource never fails the
    // batch.
    let mut results = Vec::with_capacity(request.target_resources.len());
    for (index, resource) in request.target_resources.iter().enumerate() {
        state.ensure_live(&trace_id)?;
        let result = match validate_resource(resource, catalog, &trace_id) {
            Ok(()) => RecommendationResult {
                index,
                recommendations: recommend::recommend(resource, catalog, profile),
                error: None,
            },
            Err(e) => RecommendationResult {
                index,
                recommendations: Vec::new(),
                error: Some(ElementError { code: e.code().to_string(), message: e.to_string() }),
            },
        };
        results.push(result);
    }

    info!(
        trace_id = %trace_id,
        duration_ms = started.elapsed().as_millis() as u64,
        batch_size = results.len(),
        "recommendations computed"
    );
    Ok(Json(RecommendationsResponse { results }))
}

fn validate_resource(
    resource: &ResourceDescriptor,
    catalog: &PricingCatalog,
    trace_id: &str,
) -> Result<(), PluginError> {
    if !resource.provider.is_empty() && resource.provider != "aws" {
        return Err(PluginError::InvalidResource {
            message: format!("provider {:?} is not served by this plugin", resource.provider),
            trace_id: trace_id.to_string(),
        });
    }
    if resource.resource_type.trim().is_empty() {
        return Err(PluginError::InvalidResource {
            message: "resource_type is required".to_string(),
            trace_id: trace_id.to_string(),
        });
    }
    if resource.region.trim().is_empty() {
        return Err(PluginError::InvalidResource {
            message: "region is required".to_string(),
            trace_id: trace_id.to_string(),
        });
    }
    if resource.region != catalog.region() {
        return Err(PluginError::UnsupportedRegion {
            plugin_region: catalog.region().to_string(),
            required_region: resource.region.clone(),
            trace_id: trace_id.to_string(),
        });
    }
    Ok(())
}

fn unsupported(reason: String) -> SupportsResponse {
    SupportsResponse { supported: false, reason: Some(reason), supported_metrics: Vec::new() }
}

fn request_span(
    operation: &'static str,
    trace_id: &str,
    resource: &ResourceDescriptor,
) -> tracing::Span {
    tracing::info_span!(
        "rpc",
        operation,
        trace_id = %trace_id,
        plugin_name = PLUGIN_NAME,
        plugin_version = PLUGIN_VERSION,
        resource_type = %resource.resource_type,
    )
}
