//! Canonical list of regions the release matrix builds binaries for.
//!
//! The order here is the order of the release matrix. Each entry names the
//! cargo feature that selects the region's embedded pricing data; build.rs
//! resolves the feature back to the short code.

pub struct Region {
    pub short_code: &'static str,
    pub full_name: &'static str,
    pub feature: &'static str,
}

pub const REGIONS: &[Region] = &[
    Region { short_code: "us-east-1", full_name: "US East (N. Virginia)", feature: "region-us-east-1" },
    Region { short_code: "us-east-2", full_name: "US East (Ohio)", feature: "region-us-east-2" },
    Region { short_code: "us-west-1", full_name: "US West (N. California)", feature: "region-us-west-1" },
    Region { short_code: "us-west-2", full_name: "US West (Oregon)", feature: "region-us-west-2" },
    Region { short_code: "ca-central-1", full_name: "Canada (Central)", feature: "region-ca-central-1" },
    Region { short_code: "sa-east-1", full_name: "South America (Sao Paulo)", feature: "region-sa-east-1" },
    Region { short_code: "eu-west-1", full_name: "Europe (Ireland)", feature: "region-eu-west-1" },
    Region { short_code: "eu-west-2", full_name: "Europe (London)", feature: "region-eu-west-2" },
    Region { short_code: "eu-west-3", full_name: "Europe (Paris)", feature: "region-eu-west-3" },
    Region { short_code: "eu-central-1", full_name: "Europe (Frankfurt)", feature: "region-eu-central-1" },
    Region { short_code: "eu-north-1", full_name: "Europe (Stockholm)", feature: "region-eu-north-1" },
    Region { short_code: "eu-south-1", full_name: "Europe (Milan)", feature: "region-eu-south-1" },
    Region { short_code: "ap-south-1", full_name: "Asia Pacific (Mumbai)", feature: "region-ap-south-1" },
    Region { short_code: "ap-southeast-1", full_name: "Asia Pacific (Singapore)", feature: "region-ap-southeast-1" },
    Region { short_code: "ap-southeast-2", full_name: "Asia Pacific (Sydney)", feature: "region-ap-southeast-2" },
    Region { short_code: "ap-northeast-1", full_name: "Asia Pacific (Tokyo)", feature: "region-ap-northeast-1" },
    Region { short_code: "ap-northeast-2", full_name: "Asia Pacific (Seoul)", feature: "region-ap-northeast-2" },
    Region { short_code: "ap-northeast-3", full_name: "Asia Pacific (Osaka)", feature: "region-ap-northeast-3" },
    Region { short_code: "ap-east-1", full_name: "Asia Pacific (Hong Kong)", feature: "region-ap-east-1" },
    Region { short_code: "me-south-1", full_name: "Middle East (Bahrain)", feature: "region-me-south-1" },
];

pub fn find(short_code: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.short_code == short_code)
}
