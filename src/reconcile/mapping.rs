use std::collections::BTreeMap;

/// Scheme used for every published endpoint.
pub const ENDPOINT_SCHEME: &str = "http";

/// Domain name to the endpoints serving it, in discovery order.
///
/// Repeated endpoints are kept; the registry tolerates duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointMapping {
    domains: BTreeMap<String, Vec<String>>,
}

impl EndpointMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, domain: &str, endpoint: String) {
        self.domains
            .entry(domain.to_string())
            .or_default()
            .push(endpoint);
    }

    pub fn get(&self, domain: &str) -> Option<&[String]> {
        self.domains.get(domain).map(Vec::as_slice)
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    pub fn endpoint_count(&self) -> usize {
        self.domains.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.domains
            .iter()
            .map(|(domain, endpoints)| (domain.as_str(), endpoints.as_slice()))
    }
}

/// Format an endpoint as `http://address:port`.
pub fn format_endpoint(address: &str, host_port: u16) -> String {
    format!("{}://{}:{}", ENDPOINT_SCHEME, address, host_port)
}
