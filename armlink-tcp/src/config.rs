//! Configuration of [`TcpTransport`](crate::TcpTransport).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`TcpTransport`](crate::TcpTransport).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TcpTransportConfig {
    /// Address the server binds to.
    pub bind_addr: String,

    /// Port the server listens on. Use `0` to let the OS pick one.
    pub port: u16,
}

impl Default for TcpTransportConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5555,
        }
    }
}

impl TcpTransportConfig {
    /// Sets the bind address.
    pub fn bind_addr(mut self, v: impl Into<String>) -> Self {
        self.bind_addr = v.into();
        self
    }

    /// Sets the port.
    pub fn port(mut self, v: u16) -> Self {
        self.port = v;
        self
    }

    /// Constructs [`TcpTransportConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TcpTransportConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
