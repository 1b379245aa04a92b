//! Compile-time pricing data.
//!
//! The actual bindings live in a build-script-generated unit: one per region
//! feature, plus a synthetic fallback when no region feature is selected.
//! Every unit constructs the same `EmbeddedBlobs` value, so a data set that
//! misses a service fails to compile rather than failing at runtime.

/// Raw Price List documents, one per service, as produced by pricing-gen
/// (terms filtered to OnDemand, everything else untouched).
pub struct EmbeddedBlobs {
    pub ec2: &'static str,
    pub ebs: &'static str,
    pub rds: &'static str,
    pub eks: &'static str,
    pub lambda: &'static str,
    pub s3: &'static str,
    pub dynamodb: &'static str,
    pub elasticache: &'static str,
    pub elb: &'static str,
    pub natgw: &'static str,
    pub cloudwatch: &'static str,
}

include!(concat!(env!("OUT_DIR"), "/embedded_blobs.rs"));

/// Region short code baked into this binary, `None` on fallback builds.
pub fn compiled_region() -> Option<&'static str> {
    EMBEDDED_REGION
}

/// The raw documents for this build.
pub fn blobs() -> EmbeddedBlobs {
    embedded_blobs()
}
