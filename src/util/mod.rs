//! # Utility Module
//!
//! Configuration and provider-list parsing.

mod config;

pub use config::*;

use crate::Provider;

/// Parse provider string like "tcp -h 127.0.0.1 -p 10000 -w 100 -l 12"
///
/// `-w` sets the weight and `-l` the observed latency; both are optional.
/// Unknown flags such as `-t` are skipped.
pub fn parse_provider_string(s: &str) -> Option<Provider> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.is_empty() {
        return None;
    }

    match parts[0].to_lowercase().as_str() {
        "tcp" | "udp" | "ssl" => {}
        _ => return None,
    }

    let mut provider = Provider::new(String::new(), 0);

    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "-h" if i + 1 < parts.len() => {
                provider.host = parts[i + 1].to_string();
                i += 2;
            }
            "-p" if i + 1 < parts.len() => {
                provider.port = parts[i + 1].parse().unwrap_or(0);
                i += 2;
            }
            "-w" if i + 1 < parts.len() => {
                provider.weight = parts[i + 1].parse().ok()?;
                i += 2;
            }
            "-l" if i + 1 < parts.len() => {
                provider.observed_latency = parts[i + 1].parse().ok()?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    if provider.host.is_empty() || provider.port == 0 {
        return None;
    }

    Some(provider)
}

/// Parse interface name with providers
/// Format: "com.service.Hello" or "com.service.Hello@tcp -h 127.0.0.1 -p 10000:tcp -h ..."
///
/// Every parsed provider is tagged with the interface name.
pub fn parse_provider_list(spec: &str) -> (String, Vec<Provider>) {
    let (name, rest) = match spec.split_once('@') {
        Some((name, rest)) => (name.trim(), Some(rest)),
        None => (spec.trim(), None),
    };

    let providers = rest
        .map(|rest| {
            rest.split(':')
                .filter_map(|s| parse_provider_string(s.trim()))
                .map(|p| p.with_interface(name))
                .collect()
        })
        .unwrap_or_default();

    (name.to_string(), providers)
}
