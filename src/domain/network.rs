// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants
//!
//! Parsers for the address and port notations that appear in security group
//! rules. Rule structs keep the raw strings they were sent; these types are
//! only used to check that a string is well formed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4, 0-128 for IPv6)")]
    InvalidPrefixLength(u8),

    #[error("Expected an {expected} address, got {value}")]
    WrongFamily { expected: &'static str, value: String },

    #[error("Invalid port: {0} (must be 1-65535)")]
    InvalidPort(String),

    #[error("Invalid port range: {0}")]
    InvalidPortRange(String),
}

/// IP address with optional CIDR prefix
///
/// Invariants:
/// - Valid IP address format
/// - Prefix length within valid range for the address family
///
/// # Examples
///
/// ```rust
/// use cloud_inventory::domain::IpCidr;
///
/// let cidr = IpCidr::new("10.0.0.0/8").unwrap();
/// assert!(cidr.is_ipv4());
/// assert_eq!(cidr.prefix_length(), Some(8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpCidr {
    address: IpAddr,
    prefix_length: Option<u8>,
}

impl IpCidr {
    /// Parse `addr` or `addr/prefix`
    ///
    /// # Invariants
    /// - Valid IP address format
    /// - Prefix length 0-32 for IPv4, 0-128 for IPv6
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref();

        if let Some((addr_str, prefix_str)) = cidr.split_once('/') {
            let address = IpAddr::from_str(addr_str)
                .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;

            let prefix_length = prefix_str
                .parse::<u8>()
                .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;

            Self::from_parts(address, Some(prefix_length))
        } else {
            let address = IpAddr::from_str(cidr)
                .map_err(|_| NetworkError::InvalidIpAddress(cidr.to_string()))?;

            Ok(Self {
                address,
                prefix_length: None,
            })
        }
    }

    /// Parse and require an IPv4 address
    pub fn ipv4(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let parsed = Self::new(cidr.as_ref())?;
        if !parsed.is_ipv4() {
            return Err(NetworkError::WrongFamily {
                expected: "IPv4",
                value: cidr.as_ref().to_string(),
            });
        }
        Ok(parsed)
    }

    /// Parse and require an IPv6 address
    pub fn ipv6(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let parsed = Self::new(cidr.as_ref())?;
        if !parsed.is_ipv6() {
            return Err(NetworkError::WrongFamily {
                expected: "IPv6",
                value: cidr.as_ref().to_string(),
            });
        }
        Ok(parsed)
    }

    /// Create from separate address and prefix
    pub fn from_parts(address: IpAddr, prefix_length: Option<u8>) -> Result<Self, NetworkError> {
        if let Some(prefix) = prefix_length {
            let max_prefix = match address {
                IpAddr::V4(_) => 32,
                IpAddr::V6(_) => 128,
            };

            if prefix > max_prefix {
                return Err(NetworkError::InvalidPrefixLength(prefix));
            }
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn prefix_length(&self) -> Option<u8> {
        self.prefix_length
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(self.address, IpAddr::V4(_))
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self.address, IpAddr::V6(_))
    }

    /// Get as CIDR notation string
    pub fn as_cidr(&self) -> String {
        if let Some(prefix) = self.prefix_length {
            format!("{}/{}", self.address, prefix)
        } else {
            self.address.to_string()
        }
    }
}

impl fmt::Display for IpCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_cidr())
    }
}

impl FromStr for IpCidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Inclusive port range, `80` or `8000-8080`
///
/// Invariants:
/// - Both bounds in 1-65535
/// - `from <= to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRange {
    from: u16,
    to: u16,
}

impl PortRange {
    pub fn new(from: u16, to: u16) -> Result<Self, NetworkError> {
        if from == 0 || to == 0 {
            return Err(NetworkError::InvalidPort("0".to_string()));
        }
        if from > to {
            return Err(NetworkError::InvalidPortRange(format!("{from}-{to}")));
        }
        Ok(Self { from, to })
    }

    pub fn single(port: u16) -> Result<Self, NetworkError> {
        Self::new(port, port)
    }

    pub fn from_port(&self) -> u16 {
        self.from
    }

    pub fn to_port(&self) -> u16 {
        self.to
    }

    fn parse_port(raw: &str) -> Result<u16, NetworkError> {
        raw.trim()
            .parse::<u16>()
            .map_err(|_| NetworkError::InvalidPort(raw.to_string()))
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{}", self.from, self.to)
        }
    }
}

impl FromStr for PortRange {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((from, to)) => Self::new(Self::parse_port(from)?, Self::parse_port(to)?)
                .map_err(|_| NetworkError::InvalidPortRange(s.to_string())),
            None => Self::single(Self::parse_port(s)?),
        }
    }
}

/// Port expression used by TCloud and HuaWei rules
///
/// `ALL`, a single port, a range, or a comma separated list of ports/ranges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortSpec {
    All,
    List(Vec<PortRange>),
}

impl PortSpec {
    /// Keyword accepted for "every port"
    pub const ALL: &'static str = "ALL";

    pub fn is_all(&self) -> bool {
        matches!(self, PortSpec::All)
    }
}

impl FromStr for PortSpec {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(Self::ALL) {
            return Ok(PortSpec::All);
        }
        if s.trim().is_empty() {
            return Err(NetworkError::InvalidPort(s.to_string()));
        }

        let ranges = s
            .split(',')
            .map(PortRange::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PortSpec::List(ranges))
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::All => write!(f, "{}", Self::ALL),
            PortSpec::List(ranges) => {
                let parts: Vec<String> = ranges.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_cidr() {
        let ip = IpCidr::new("192.168.1.0/24").unwrap();
        assert_eq!(ip.address().to_string(), "192.168.1.0");
        assert_eq!(ip.prefix_length(), Some(24));
        assert!(ip.is_ipv4());
        assert_eq!(ip.as_cidr(), "192.168.1.0/24");
    }

    #[test]
    fn test_ip_without_prefix() {
        let ip = IpCidr::new("192.168.1.10").unwrap();
        assert_eq!(ip.prefix_length(), None);
        assert_eq!(ip.as_cidr(), "192.168.1.10");
    }

    #[test]
    fn test_ipv6_cidr() {
        let ip = IpCidr::new("2001:db8::/32").unwrap();
        assert!(ip.is_ipv6());
        assert_eq!(ip.prefix_length(), Some(32));
    }

    #[test]
    fn test_invalid_cidr() {
        assert!(IpCidr::new("999.999.999.999").is_err());
        assert!(IpCidr::new("192.168.1.0/33").is_err());
        assert!(IpCidr::new("2001:db8::1/129").is_err());
        assert!(IpCidr::new("10.0.0.0/abc").is_err());
    }

    #[test]
    fn test_family_checks() {
        assert!(IpCidr::ipv4("0.0.0.0/0").is_ok());
        assert!(IpCidr::ipv4("::/0").is_err());
        assert!(IpCidr::ipv6("::/0").is_ok());
        assert!(IpCidr::ipv6("10.0.0.0/8").is_err());
    }

    #[test]
    fn test_port_range() {
        let single: PortRange = "22".parse().unwrap();
        assert_eq!(single.from_port(), 22);
        assert_eq!(single.to_port(), 22);

        let range: PortRange = "8000-8080".parse().unwrap();
        assert_eq!(range.to_string(), "8000-8080");

        assert!("0".parse::<PortRange>().is_err());
        assert!("65536".parse::<PortRange>().is_err());
        assert!("90-80".parse::<PortRange>().is_err());
        assert!("http".parse::<PortRange>().is_err());
    }

    #[test]
    fn test_port_spec() {
        assert!("ALL".parse::<PortSpec>().unwrap().is_all());
        assert!("all".parse::<PortSpec>().unwrap().is_all());

        let list: PortSpec = "80,443,8000-8080".parse().unwrap();
        assert_eq!(list.to_string(), "80,443,8000-8080");

        assert!("".parse::<PortSpec>().is_err());
        assert!("80,".parse::<PortSpec>().is_err());
    }
}
