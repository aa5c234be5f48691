use crate::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_PORT: u16 = 8080;

/// Where the HTTP listener binds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port`; accepted by `TcpListener::bind`, hostnames included.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Only succeeds for a literal IP host.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), DEFAULT_PORT)
    }
}

impl FromEnv for ServerConfig {
    /// `HOST` (all interfaces) and `PORT` (8080)
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self::new(
            env_or_default("HOST", &defaults.host),
            env_parse_or("PORT", defaults.port)?,
        ))
    }
}
