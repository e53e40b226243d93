//! Container port allow-list
//!
//! Parsed once at startup into a set of port numbers. Membership is exact:
//! `8080` in the list does not admit port `80` or `8`.

use crate::DiscoveryError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PORTS: &str = "80,8080,2368,8983";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortAllowList {
    ports: BTreeSet<u16>,
}

impl PortAllowList {
    pub fn new(ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            ports: ports.into_iter().collect(),
        }
    }

    pub fn contains(&self, port: u16) -> bool {
        self.ports.contains(&port)
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }
}

impl Default for PortAllowList {
    fn default() -> Self {
        Self::new([80, 8080, 2368, 8983])
    }
}

impl FromStr for PortAllowList {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ports = BTreeSet::new();

        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let port = entry.parse::<u16>().map_err(|e| {
                DiscoveryError::ConfigError(format!("Invalid port '{}' in allow-list: {}", entry, e))
            })?;
            ports.insert(port);
        }

        Ok(Self { ports })
    }
}

impl fmt::Display for PortAllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .ports
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "{}", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_skips_empty_entries() {
        let list: PortAllowList = " 80, 8080,,2368 ".parse().expect("valid list");
        assert_eq!(list.len(), 3);
        assert!(list.contains(80));
        assert!(list.contains(8080));
        assert!(list.contains(2368));
    }

    #[test]
    fn test_membership_is_exact() {
        let list: PortAllowList = "8080,280".parse().expect("valid list");
        assert!(!list.contains(8));
        assert!(!list.contains(80));
        assert!(!list.contains(808));
        assert!(list.contains(280));
    }

    #[test]
    fn test_invalid_entry_is_config_error() {
        let err = "80,http".parse::<PortAllowList>().unwrap_err();
        assert!(matches!(err, DiscoveryError::ConfigError(_)));
        assert!(err.to_string().contains("http"));

        assert!("70000".parse::<PortAllowList>().is_err());
    }

    #[test]
    fn test_default_list_matches_default_flag() {
        let parsed: PortAllowList = DEFAULT_PORTS.parse().unwrap();
        assert_eq!(parsed, PortAllowList::default());
        assert_eq!(parsed.to_string(), "80,2368,8080,8983");
    }
}
