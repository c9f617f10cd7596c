//! Network interface information.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// A network interface on the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    /// Interface name (e.g., "eth0", "en0", "Wi-Fi").
    pub name: String,
    /// Human-readable description (Windows only, empty on other platforms).
    pub description: String,
    /// IPv4 addresses assigned to this interface.
    pub ipv4_addresses: Vec<Ipv4Addr>,
    /// IPv6 addresses assigned to this interface.
    pub ipv6_addresses: Vec<Ipv6Addr>,
    /// Interface type (Ethernet, WiFi, Cellular, etc.).
    pub interface_type: InterfaceType,
    /// Whether the interface is currently up.
    pub is_up: bool,
    /// Interface index.
    pub index: u32,
}

/// Type of network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    /// Ethernet interface.
    Ethernet,
    /// Wireless (WiFi) interface.
    WiFi,
    /// Cellular or mobile broadband interface.
    Cellular,
    /// Loopback interface (localhost).
    Loopback,
    /// Virtual, bridge or tunnel interface.
    Virtual,
    /// Unknown interface type.
    Unknown,
}

impl InterfaceType {
    /// Classify an interface from its OS name and description.
    ///
    /// Operating systems do not report the link medium uniformly, so this
    /// relies on the naming conventions of Linux, macOS, iOS, Android and
    /// Windows. Ambiguous names such as macOS `en0` classify as Ethernet.
    pub fn classify(name: &str, description: &str) -> Self {
        const CELLULAR: &[&str] = &["wwan", "wwp", "rmnet", "ccmni", "pdp_ip", "ppp"];
        const WIFI: &[&str] = &["wlan", "wlp", "wlx", "wl", "wifi", "ath", "ap"];
        const VIRTUAL: &[&str] = &[
            "tun", "tap", "utun", "wg", "zt", "docker", "veth", "virbr", "br-", "bridge",
            "vmnet", "vboxnet", "awdl", "llw", "anpi", "gif", "stf",
        ];
        const ETHERNET: &[&str] = &["eth", "en", "em"];

        let name = name.to_ascii_lowercase();
        let description = description.to_ascii_lowercase();
        let starts = |prefixes: &[&str]| prefixes.iter().any(|prefix| name.starts_with(prefix));

        if name == "lo" || name.starts_with("lo0") || description.contains("loopback") {
            Self::Loopback
        } else if starts(CELLULAR)
            || name.contains("cellular")
            || description.contains("mobile broadband")
            || description.contains("cellular")
        {
            Self::Cellular
        } else if starts(VIRTUAL) || description.contains("virtual") || description.contains("vpn") {
            Self::Virtual
        } else if starts(WIFI)
            || name.contains("wi-fi")
            || description.contains("wireless")
            || description.contains("wi-fi")
            || description.contains("802.11")
        {
            Self::WiFi
        } else if starts(ETHERNET) || name.contains("ethernet") || description.contains("ethernet") {
            Self::Ethernet
        } else {
            Self::Unknown
        }
    }
}

impl std::fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterfaceType::Ethernet => write!(f, "Ethernet"),
            InterfaceType::WiFi => write!(f, "WiFi"),
            InterfaceType::Cellular => write!(f, "Cellular"),
            InterfaceType::Loopback => write!(f, "Loopback"),
            InterfaceType::Virtual => write!(f, "Virtual"),
            InterfaceType::Unknown => write!(f, "Unknown"),
        }
    }
}

impl From<netdev::Interface> for NetworkInterface {
    fn from(iface: netdev::Interface) -> Self {
        let description = iface.description.clone().unwrap_or_default();

        let interface_type = if iface.is_loopback() {
            InterfaceType::Loopback
        } else if iface.is_tun() {
            InterfaceType::Virtual
        } else {
            InterfaceType::classify(&iface.name, &description)
        };

        NetworkInterface {
            ipv4_addresses: iface.ipv4.iter().map(|net| net.addr()).collect(),
            ipv6_addresses: iface.ipv6.iter().map(|net| net.addr()).collect(),
            is_up: iface.is_up(),
            index: iface.index,
            name: iface.name,
            description,
            interface_type,
        }
    }
}

impl NetworkInterface {
    /// Get all network interfaces on the system.
    pub fn list() -> Vec<NetworkInterface> {
        netdev::get_interfaces()
            .into_iter()
            .map(NetworkInterface::from)
            .collect()
    }

    /// Get the default network interface (used for internet traffic).
    pub fn default_interface() -> Option<NetworkInterface> {
        netdev::get_default_interface()
            .ok()
            .map(NetworkInterface::from)
    }

    /// Get all IP addresses (both v4 and v6) for this interface.
    pub fn all_addresses(&self) -> Vec<IpAddr> {
        let mut addrs: Vec<IpAddr> = self
            .ipv4_addresses
            .iter()
            .copied()
            .map(IpAddr::V4)
            .collect();
        addrs.extend(self.ipv6_addresses.iter().copied().map(IpAddr::V6));
        addrs
    }

    /// Check if this interface has any IP addresses assigned.
    pub fn has_addresses(&self) -> bool {
        !self.ipv4_addresses.is_empty() || !self.ipv6_addresses.is_empty()
    }

    /// Check if this is the loopback interface.
    pub fn is_loopback(&self) -> bool {
        self.interface_type == InterfaceType::Loopback
    }

    /// Check if this is a cellular interface.
    pub fn is_cellular(&self) -> bool {
        self.interface_type == InterfaceType::Cellular
    }

    /// Whether this interface can carry traffic: up, not loopback, and
    /// addressed.
    pub fn is_usable(&self) -> bool {
        self.is_up && !self.is_loopback() && self.has_addresses()
    }
}
