#![allow(dead_code)]

use rdap_gateway_analysis::application::services::{AnalysisOptions, AnalysisOutcome, AnalysisService};
use rdap_gateway_analysis::domain::entities::{PatternCatalog, ProviderPatterns, RegistrarRecord};

pub const RRPPROXY: &str = "RRPProxy";

pub fn record(id: u32, name: &str, domains: Option<u64>, rdap_url: Option<&str>) -> RegistrarRecord {
    RegistrarRecord::new(id, name.to_string(), domains, rdap_url.map(str::to_string))
}

/// Acme and Beta on rrpproxy, Gamma self-hosted.
pub fn sample_records() -> Vec<RegistrarRecord> {
    vec![
        record(1, "Acme", Some(100), Some("https://rdap.rrpproxy.net")),
        record(2, "Beta", Some(50), Some("https://rdap.rrpproxy.net")),
        record(3, "Gamma", Some(200), Some("https://self.example.com")),
    ]
}

pub fn rrpproxy_catalog() -> PatternCatalog {
    PatternCatalog::new(1, vec![ProviderPatterns::new(RRPPROXY, &["rrpproxy.net"])]).unwrap()
}

pub fn two_provider_catalog() -> PatternCatalog {
    PatternCatalog::new(
        1,
        vec![
            ProviderPatterns::new(RRPPROXY, &["rrpproxy.net"]),
            ProviderPatterns::new("Gransy", &["rdap.gransy.com"]),
        ],
    )
    .unwrap()
}

pub fn analyze(catalog: PatternCatalog, records: Vec<RegistrarRecord>) -> AnalysisOutcome {
    AnalysisService::new(AnalysisOptions::default()).run(catalog, records)
}

/// A registrar table as it comes out of the spreadsheet export.
pub const SOURCE_TABLE: &str = "\
IANA ID,Name,Domain count,rdap_url,Category
1,Acme,100,https://rdap.rrpproxy.net,Accredited
2,Beta,50,https://rdap.rrpproxy.net/,Accredited
3,Gamma,200,https://self.example.com,Accredited
4,Delta,\"1,000\",https://rdap.shared-host.io/rdap,Accredited
5,Epsilon,10,https://rdap.shared-host.io,
6,Zeta,,,
7,Eta,5,rdap.gransy.com,
";
