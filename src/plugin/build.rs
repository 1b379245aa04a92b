use std::env;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Fixed service set. Must stay in sync with `EmbeddedBlobs` in
/// src/embedded.rs - the generated constructor populates every field, so a
/// drift in either direction fails to compile.
const SERVICES: &[&str] = &[
    "ec2",
    "ebs",
    "rds",
    "eks",
    "lambda",
    "s3",
    "dynamodb",
    "elasticache",
    "elb",
    "natgw",
    "cloudwatch",
];

fn main() {
    println!("cargo:rerun-if-changed=data");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR"));

    let mut regions = selected_regions();
    regions.sort();
    if regions.len() > 1 {
        // Release builds enable exactly one region feature. Blanket feature
        // sweeps (--all-features) still have to compile, so take the first
        // in sorted order instead of failing the build.
        println!(
            "cargo:warning=multiple region features enabled ({}); using {}",
            regions.join(", "),
            regions[0]
        );
    }

    let unit = match regions.first() {
        Some(region) => region_unit(&manifest_dir, region),
        None => fallback_unit(&manifest_dir),
    };

    std::fs::write(out_dir.join("embedded_blobs.rs"), unit).expect("write embedded_blobs.rs");
}

/// Region features are named `region-<short-code>`; cargo exposes them as
/// `CARGO_FEATURE_REGION_<CODE>` with dashes mapped to underscores.
fn selected_regions() -> Vec<String> {
    env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_REGION_")
                .map(|code| code.to_lowercase().replace('_', "-"))
        })
        .collect()
}

fn region_unit(manifest_dir: &Path, region: &str) -> String {
    let data_dir = manifest_dir.join("data").join("pricing");

    let missing: Vec<String> = SERVICES
        .iter()
        .filter(|service| !data_dir.join(blob_file(service, region)).exists())
        .map(|service| blob_file(service, region))
        .collect();

    if !missing.is_empty() {
        // A region build without generated pricing data cannot produce a
        // usable binary; fall back to the synthetic data set so development
        // builds and CI keep compiling.
        println!(
            "cargo:warning=region {region} selected but pricing data is missing \
             ({}); run pricing-gen first. Falling back to synthetic data.",
            missing.join(", ")
        );
        return fallback_unit(manifest_dir);
    }

    let mut unit = String::new();
    writeln!(
        unit,
        "/// Pricing blobs for the {region} release binary, generated at build time."
    )
    .unwrap();
    writeln!(
        unit,
        "pub(crate) const EMBEDDED_REGION: Option<&str> = Some({region:?});"
    )
    .unwrap();
    writeln!(
        unit,
        "pub(crate) fn embedded_blobs() -> EmbeddedBlobs {{\n    EmbeddedBlobs {{"
    )
    .unwrap();
    for service in SERVICES {
        let path = data_dir.join(blob_file(service, region));
        writeln!(
            unit,
            "        {service}: include_str!({:?}),",
            path.display()
        )
        .unwrap();
    }
    unit.push_str("    }\n}\n");
    unit
}

fn fallback_unit(manifest_dir: &Path) -> String {
    let data_dir = manifest_dir.join("data").join("fallback");

    let mut unit = String::new();
    unit.push_str("/// Synthetic pricing blobs for builds without a region feature.\n");
    unit.push_str("/// Development and CI only; release binaries always embed real data.\n");
    unit.push_str("pub(crate) const EMBEDDED_REGION: Option<&str> = None;\n");
    unit.push_str("pub(crate) fn embedded_blobs() -> EmbeddedBlobs {\n    EmbeddedBlobs {\n");
    for service in SERVICES {
        let path = data_dir.join(format!("{service}.json"));
        writeln!(
            unit,
            "        {service}: include_str!({:?}),",
            path.display()
        )
        .unwrap();
    }
    unit.push_str("    }\n}\n");
    unit
}

fn blob_file(service: &str, region: &str) -> String {
    format!("{service}_{region}.json")
}
