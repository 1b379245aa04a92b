//! Raw Price List parsing.
//!
//! Each parser filters a service's product map, derives a composite key, and
//! extracts the sole OnDemand price dimension (or, for tiered services, the
//! ordered dimension list). The documents arrive exactly as pricing-gen wrote
//! them: full product attributes, terms reduced to OnDemand.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use super::types::*;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed price list document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub(crate) struct PriceListDocument {
    #[serde(default)]
    pub products: HashMap<String, Product>,
    #[serde(default)]
    pub terms: Terms,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Product {
    #[serde(rename = "productFamily", default)]
    pub product_family: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Terms {
    #[serde(rename = "OnDemand", default)]
    pub on_demand: HashMap<String, HashMap<String, Term>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Term {
    #[serde(rename = "priceDimensions", default)]
    pub price_dimensions: HashMap<String, PriceDimension>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PriceDimension {
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "beginRange", default)]
    pub begin_range: String,
    #[serde(rename = "endRange", default)]
    pub end_range: String,
    #[serde(rename = "pricePerUnit", default)]
    pub price_per_unit: HashMap<String, String>,
}

impl PriceListDocument {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// USD rate of the sole OnDemand price dimension for a SKU.
    fn sole_rate(&self, sku: &str) -> Option<f64> {
        self.terms
            .on_demand
            .get(sku)?
            .values()
            .next()?
            .price_dimensions
            .values()
            .next()
            .and_then(PriceDimension::usd)
    }

    /// All OnDemand dimensions for a SKU, ordered by their begin range.
    fn dimensions(&self, sku: &str) -> Vec<&PriceDimension> {
        let mut dims: Vec<&PriceDimension> = self
            .terms
            .on_demand
            .get(sku)
            .into_iter()
            .flat_map(|terms| terms.values())
            .flat_map(|term| term.price_dimensions.values())
            .collect();
        dims.sort_by(|a, b| {
            parse_range(&a.begin_range)
                .partial_cmp(&parse_range(&b.begin_range))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        dims
    }

    fn tiers(&self, sku: &str) -> Vec<PriceTier> {
        self.dimensions(sku)
            .into_iter()
            .filter_map(|dim| {
                Some(PriceTier {
                    lower_bound: parse_range(&dim.begin_range),
                    upper_bound: parse_range(&dim.end_range),
                    rate_usd: dim.usd()?,
                })
            })
            .collect()
    }
}

impl PriceDimension {
    fn usd(&self) -> Option<f64> {
        self.price_per_unit.get("USD")?.parse().ok()
    }
}

fn parse_range(raw: &str) -> f64 {
    if raw.eq_ignore_ascii_case("inf") {
        f64::INFINITY
    } else {
        raw.parse().unwrap_or(0.0)
    }
}

fn attr<'a>(product: &'a Product, name: &str) -> Option<&'a str> {
    product.attributes.get(name).map(String::as_str)
}

/// EC2 compute index plus the region tag extracted from product metadata.
/// The region tag is the authoritative identifier for mismatch checks.
pub struct Ec2Index {
    pub instances: HashMap<String, InstancePrice>,
    pub region: Option<String>,
}

pub fn parse_ec2(raw: &str) -> Result<Ec2Index, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut instances = HashMap::new();
    let mut region = None;

    for (sku, product) in &doc.products {
        if product.product_family != "Compute Instance" {
            continue;
        }
        if attr(product, "operatingSystem") != Some("Linux")
            || attr(product, "tenancy") != Some("Shared")
            || attr(product, "preInstalledSw") != Some("NA")
            || attr(product, "capacitystatus") != Some("Used")
        {
            continue;
        }
        let Some(instance_type) = attr(product, "instanceType") else {
            continue;
        };
        let Some(rate) = doc.sole_rate(sku) else {
            continue;
        };
        if rate <= 0.0 {
            continue;
        }
        if region.is_none() {
            region = attr(product, "regionCode").map(str::to_string);
        }
        let vcpu = attr(product, "vcpu").and_then(|v| v.parse().ok()).unwrap_or(1);
        instances.insert(
            instance_type.to_string(),
            InstancePrice {
                instance_type: instance_type.to_string(),
                vcpu,
                hourly_rate_usd: rate,
            },
        );
    }

    if instances.is_empty() {
        return Err(ParseError::Invalid(
            "no on-demand Linux/Shared compute instances found".into(),
        ));
    }
    Ok(Ec2Index { instances, region })
}

pub fn parse_ebs(raw: &str) -> Result<HashMap<String, VolumePrice>, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut volumes = HashMap::new();

    for (sku, product) in &doc.products {
        if product.product_family != "Storage" {
            continue;
        }
        let Some(volume_type) = attr(product, "volumeApiName") else {
            continue;
        };
        let Some(rate) = doc.sole_rate(sku) else {
            continue;
        };
        if rate <= 0.0 {
            continue;
        }
        volumes.insert(
            volume_type.to_string(),
            VolumePrice {
                volume_type: volume_type.to_string(),
                rate_per_gb_month_usd: rate,
            },
        );
    }

    if volumes.is_empty() {
        return Err(ParseError::Invalid("no EBS volume storage rates found".into()));
    }
    Ok(volumes)
}

/// RDS instance index keyed `{instance_type}:{engine}` (engine lowercased),
/// plus the Single-AZ storage sub-index keyed by volume type.
#[derive(Default)]
pub struct RdsIndex {
    pub instances: HashMap<String, DbInstancePrice>,
    pub storage: HashMap<String, VolumePrice>,
}

pub fn parse_rds(raw: &str) -> Result<RdsIndex, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut index = RdsIndex::default();

    for (sku, product) in &doc.products {
        match product.product_family.as_str() {
            "Database Instance" => {
                // Multi-AZ is modeled as a factor on the Single-AZ rate, so
                // only Single-AZ products populate the index.
                if attr(product, "deploymentOption") != Some("Single-AZ") {
                    continue;
                }
                let (Some(instance_type), Some(engine)) =
                    (attr(product, "instanceType"), attr(product, "databaseEngine"))
                else {
                    continue;
                };
                let Some(rate) = doc.sole_rate(sku) else {
                    continue;
                };
                if rate <= 0.0 {
                    continue;
                }
                let engine = engine.to_lowercase();
                index.instances.insert(
                    format!("{instance_type}:{engine}"),
                    DbInstancePrice {
                        instance_type: instance_type.to_string(),
                        engine,
                        deployment_option: "Single-AZ".to_string(),
                        hourly_rate_usd: rate,
                    },
                );
            }
            "Database Storage" => {
                if attr(product, "deploymentOption") != Some("Single-AZ") {
                    continue;
                }
                let Some(volume_type) = attr(product, "volumeType") else {
                    continue;
                };
                let Some(rate) = doc.sole_rate(sku) else {
                    continue;
                };
                index.storage.insert(
                    volume_type.to_string(),
                    VolumePrice {
                        volume_type: volume_type.to_string(),
                        rate_per_gb_month_usd: rate,
                    },
                );
            }
            _ => {}
        }
    }

    if index.instances.is_empty() {
        return Err(ParseError::Invalid("no RDS instance rates found".into()));
    }
    Ok(index)
}

pub fn parse_elasticache(raw: &str) -> Result<HashMap<String, CacheNodePrice>, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut nodes = HashMap::new();

    for (sku, product) in &doc.products {
        if product.product_family != "Cache Instance" {
            continue;
        }
        let (Some(instance_type), Some(engine)) =
            (attr(product, "instanceType"), attr(product, "cacheEngine"))
        else {
            continue;
        };
        let Some(rate) = doc.sole_rate(sku) else {
            continue;
        };
        if rate <= 0.0 {
            continue;
        }
        let engine = engine.to_lowercase();
        nodes.insert(
            format!("{instance_type}:{engine}"),
            CacheNodePrice {
                instance_type: instance_type.to_string(),
                engine,
                hourly_rate_usd: rate,
            },
        );
    }

    if nodes.is_empty() {
        return Err(ParseError::Invalid("no ElastiCache node rates found".into()));
    }
    Ok(nodes)
}

pub fn parse_s3(raw: &str) -> Result<HashMap<String, StorageClassPrice>, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut classes = HashMap::new();

    for (sku, product) in &doc.products {
        if product.product_family != "Storage" {
            continue;
        }
        let Some(volume_type) = attr(product, "volumeType") else {
            continue;
        };
        let Some(rate) = doc.sole_rate(sku) else {
            continue;
        };
        if rate <= 0.0 {
            continue;
        }
        classes.insert(
            volume_type.to_string(),
            StorageClassPrice {
                storage_class: volume_type.to_string(),
                rate_per_gb_month_usd: rate,
            },
        );
    }

    if classes.is_empty() {
        return Err(ParseError::Invalid("no S3 storage class rates found".into()));
    }
    Ok(classes)
}

pub fn parse_lambda(raw: &str) -> Result<LambdaRates, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut rates = LambdaRates::default();

    for (sku, product) in &doc.products {
        let Some(group) = attr(product, "group") else {
            continue;
        };
        let Some(rate) = doc.sole_rate(sku) else {
            continue;
        };
        match group {
            "AWS-Lambda-Requests" => rates.x86_64.rate_per_request_usd = rate,
            "AWS-Lambda-Duration" => rates.x86_64.rate_per_gb_second_usd = rate,
            "AWS-Lambda-Requests-ARM" => rates.arm64.rate_per_request_usd = rate,
            "AWS-Lambda-Duration-ARM" => rates.arm64.rate_per_gb_second_usd = rate,
            _ => {}
        }
    }

    if rates.x86_64.rate_per_gb_second_usd <= 0.0 {
        return Err(ParseError::Invalid("no Lambda duration rate found".into()));
    }
    Ok(rates)
}

pub fn parse_dynamodb(raw: &str) -> Result<DynamoDbRates, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut rates = DynamoDbRates::default();

    for (sku, product) in &doc.products {
        let group = attr(product, "group").unwrap_or_default();
        let Some(rate) = doc.sole_rate(sku) else {
            continue;
        };
        match (product.product_family.as_str(), group) {
            ("Amazon DynamoDB PayPerRequest Throughput", "DDB-ReadUnits") => {
                rates.read_request_usd = rate
            }
            ("Amazon DynamoDB PayPerRequest Throughput", "DDB-WriteUnits") => {
                rates.write_request_usd = rate
            }
            ("Provisioned IOPS", "DDB-ReadUnits") => rates.rcu_hour_usd = rate,
            ("Provisioned IOPS", "DDB-WriteUnits") => rates.wcu_hour_usd = rate,
            ("Database Storage", _) => rates.storage_gb_month_usd = rate,
            _ => {}
        }
    }

    if rates.read_request_usd <= 0.0 && rates.rcu_hour_usd <= 0.0 {
        return Err(ParseError::Invalid("no DynamoDB throughput rates found".into()));
    }
    Ok(rates)
}

pub fn parse_elb(raw: &str) -> Result<HashMap<String, LoadBalancerPrice>, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut alb = LoadBalancerPrice { lb_type: "alb".into(), ..Default::default() };
    let mut nlb = LoadBalancerPrice { lb_type: "nlb".into(), ..Default::default() };

    for (sku, product) in &doc.products {
        let price = match product.product_family.as_str() {
            "Load Balancer-Application" => &mut alb,
            "Load Balancer-Network" => &mut nlb,
            _ => continue,
        };
        for dim in doc.dimensions(sku) {
            let Some(rate) = dim.usd() else { continue };
            match dim.unit.as_str() {
                "Hrs" => price.fixed_hourly_usd = rate,
                "LCU-Hrs" | "NLCU-Hrs" => price.capacity_unit_hourly_usd = rate,
                _ => {}
            }
        }
    }

    if alb.fixed_hourly_usd <= 0.0 && nlb.fixed_hourly_usd <= 0.0 {
        return Err(ParseError::Invalid("no load balancer hourly rates found".into()));
    }
    let mut balancers = HashMap::new();
    balancers.insert("alb".to_string(), alb);
    balancers.insert("nlb".to_string(), nlb);
    Ok(balancers)
}

pub fn parse_natgw(raw: &str) -> Result<NatGatewayPrice, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut price = NatGatewayPrice::default();

    for (sku, product) in &doc.products {
        if product.product_family != "NAT Gateway" {
            continue;
        }
        let usagetype = attr(product, "usagetype").unwrap_or_default();
        let Some(rate) = doc.sole_rate(sku) else {
            continue;
        };
        if usagetype.contains("Hours") {
            price.hourly_usd = rate;
        } else if usagetype.contains("Bytes") {
            price.data_processed_gb_usd = rate;
        }
    }

    if price.hourly_usd <= 0.0 {
        return Err(ParseError::Invalid("no NAT gateway hourly rate found".into()));
    }
    Ok(price)
}

pub fn parse_cloudwatch(raw: &str) -> Result<CloudWatchRates, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut rates = CloudWatchRates::default();

    for (sku, product) in &doc.products {
        match product.product_family.as_str() {
            "Metric" => rates.custom_metrics = doc.tiers(sku),
            "Data Payload" => rates.log_ingestion_gb = doc.tiers(sku),
            "Storage Snapshot" => rates.log_storage_gb = doc.tiers(sku),
            _ => {}
        }
    }

    if rates.custom_metrics.is_empty() && rates.log_ingestion_gb.is_empty() {
        return Err(ParseError::Invalid("no CloudWatch rates found".into()));
    }
    Ok(rates)
}

pub fn parse_eks(raw: &str) -> Result<HashMap<String, ClusterPrice>, ParseError> {
    let doc = PriceListDocument::parse(raw)?;
    let mut clusters = HashMap::new();

    for (sku, product) in &doc.products {
        if product.product_family != "Compute" {
            continue;
        }
        let usagetype = attr(product, "usagetype").unwrap_or_default();
        if !usagetype.contains("AmazonEKS") {
            continue;
        }
        let Some(rate) = doc.sole_rate(sku) else {
            continue;
        };
        let support_type = if usagetype.to_lowercase().contains("extendedsupport") {
            "extended"
        } else {
            "standard"
        };
        clusters.insert(
            support_type.to_string(),
            ClusterPrice {
                support_type: support_type.to_string(),
                hourly_rate_usd: rate,
            },
        );
    }

    if clusters.is_empty() {
        return Err(ParseError::Invalid("no EKS cluster rates found".into()));
    }
    Ok(clusters)
}
