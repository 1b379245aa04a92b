//! The fixed service set and its bulk Price List offer codes.

pub const PRICE_LIST_BASE_URL: &str = "https://pricing.us-east-1.amazonaws.com/offers/v1.0/aws";

/// (service tag, offer code). EBS pricing lives inside the AmazonEC2 offer;
/// NAT gateway pricing inside AmazonVPC.
pub const SERVICES: &[(&str, &str)] = &[
    ("ec2", "AmazonEC2"),
    ("ebs", "AmazonEC2"),
    ("rds", "AmazonRDS"),
    ("eks", "AmazonEKS"),
    ("lambda", "AWSLambda"),
    ("s3", "AmazonS3"),
    ("dynamodb", "AmazonDynamoDB"),
    ("elasticache", "AmazonElastiCache"),
    ("elb", "AWSELB"),
    ("natgw", "AmazonVPC"),
    ("cloudwatch", "AmazonCloudWatch"),
];

pub fn offer_url(offer_code: &str, region: &str) -> String {
    format!("{PRICE_LIST_BASE_URL}/{offer_code}/current/{region}/index.json")
}

pub fn output_file(service: &str, region: &str) -> String {
    format!("{service}_{region}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_set_is_complete_and_unique() {
        assert_eq!(SERVICES.len(), 11);
        let mut tags: Vec<_> = SERVICES.iter().map(|(tag, _)| *tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 11);
    }

    #[test]
    fn urls_follow_the_bulk_api_layout() {
        assert_eq!(
            offer_url("AmazonEC2", "us-east-1"),
            "https://pricing.us-east-1.amazonaws.com/offers/v1.0/aws/AmazonEC2/current/us-east-1/index.json"
        );
    }

    #[test]
    fn output_files_pair_service_and_region() {
        assert_eq!(output_file("ec2", "eu-west-1"), "ec2_eu-west-1.json");
    }
}
