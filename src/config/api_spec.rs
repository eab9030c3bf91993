//! Parses the `-a` API spec: `[<host>]:<port>[/<prefix>]`. Host may be
//! empty (bind all interfaces), an IPv4, a bracketed IPv6, or a hostname.

use crate::config::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSpec {
    pub host: String,
    pub port: u16,
    pub prefix: String,
}

pub fn parse_api_spec(spec: &str) -> Result<ApiSpec, ConfigError> {
    let (addr_part, prefix) = match spec.find('/') {
        Some(pos) => (&spec[..pos], spec[pos..].to_owned()),
        None => (spec, String::new()),
    };

    if let Some(rest) = addr_part.strip_prefix('[') {
        let (host, rest) = rest
            .split_once(']')
            .ok_or_else(|| ConfigError::InvalidApiSpec(spec.to_owned()))?;
        let port_str = rest
            .strip_prefix(':')
            .ok_or_else(|| ConfigError::InvalidApiSpec(spec.to_owned()))?;
        let port: u16 = port_str
            .parse()
            .map_err(|_| ConfigError::InvalidApiSpec(spec.to_owned()))?;
        return Ok(ApiSpec {
            host: host.to_owned(),
            port,
            prefix,
        });
    }

    let colon = addr_part
        .rfind(':')
        .ok_or_else(|| ConfigError::InvalidApiSpec(spec.to_owned()))?;
    let host = &addr_part[..colon];
    let port_str = &addr_part[colon + 1..];
    let port: u16 = port_str
        .parse()
        .map_err(|_| ConfigError::InvalidApiSpec(spec.to_owned()))?;

    Ok(ApiSpec {
        host: host.to_owned(),
        port,
        prefix,
    })
}

impl ApiSpec {
    pub fn bind_addr(&self) -> String {
        let host = if self.host.is_empty() { "0.0.0.0" } else { &self.host };
        format!("{host}:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_host_binds_all_interfaces() {
        let a = parse_api_spec(":8080").unwrap();
        assert_eq!(a.host, "");
        assert_eq!(a.port, 8080);
        assert_eq!(a.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn ipv4_host_with_prefix() {
        let a = parse_api_spec("127.0.0.1:8080/api").unwrap();
        assert_eq!(a.host, "127.0.0.1");
        assert_eq!(a.port, 8080);
        assert_eq!(a.prefix, "/api");
    }

    #[test]
    fn bracketed_ipv6_host() {
        let a = parse_api_spec("[::1]:9000").unwrap();
        assert_eq!(a.host, "::1");
        assert_eq!(a.port, 9000);
    }

    #[test]
    fn rejects_missing_port() {
        assert!(parse_api_spec("127.0.0.1").is_err());
    }
}
