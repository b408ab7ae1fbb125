use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Serialize, Deserialize};

/// UDP transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdpConfig {
    /// Local address to bind to
    pub bind_addr: SocketAddr,
    /// Peer to reply to. When unset, replies go to the last sender.
    pub peer_addr: Option<SocketAddr>,
}

impl Default for UdpConfig {
    fn default() -> Self {
        UdpConfig {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, super::DEFAULT_PORT)),
            peer_addr: None,
        }
    }
}

/// Serial (USB CDC / HID bridge) transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyACM0`
    pub path: String,
    /// Line speed
    pub baud_rate: u32,
    /// Read/write timeout of the underlying port
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            path: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
            timeout: Duration::from_millis(10),
        }
    }
}

/// Configuration for a device link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Interval between engine iterations in the async run loop
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub tick_interval: Duration,
    /// Minimum spacing between controller state steps
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub setup_interval: Duration,
    /// UDP transport settings
    pub udp: UdpConfig,
    /// Serial transport settings
    pub serial: SerialConfig,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            tick_interval: Duration::from_millis(1),
            setup_interval: Duration::from_micros(500),
            udp: UdpConfig::default(),
            serial: SerialConfig::default(),
        }
    }
}
