use {
    crate::error::MemberAddressError,
    ipnet::IpNet,
    log::debug,
    serde::{
        de::{MapAccess, Visitor},
        Deserialize, Deserializer, Serialize,
    },
    serde_json::Value,
    std::{
        fmt::{Formatter, Result as FmtResult},
        net::IpAddr,
    },
};

pub const FIXED_ADDRESS_TYPE: &str = "fixed";

/// One entry from a server's address list as reported by Nova.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AddressDescriptor {
    /// Either "fixed" or "floating".
    #[serde(rename = "OS-EXT-IPS:type", default, skip_serializing_if = "Option::is_none")]
    pub ip_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
}

impl AddressDescriptor {
    pub fn fixed(addr: &str) -> Self {
        Self {
            ip_type: Some(FIXED_ADDRESS_TYPE.to_string()),
            addr: Some(addr.to_string()),
        }
    }

    pub fn floating(addr: &str) -> Self {
        Self {
            ip_type: Some("floating".to_string()),
            addr: Some(addr.to_string()),
        }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.ip_type.as_deref() == Some(FIXED_ADDRESS_TYPE)
    }
}

/// A fixed IP found on one of a server's networks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FixedIp {
    pub network: String,
    pub addr: IpAddr,
}

/// A server's addresses, keyed by network name, in the order the provider reported them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ServerAddresses {
    networks: Vec<(String, Vec<AddressDescriptor>)>,
}

impl ServerAddresses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_network(&mut self, name: &str, descriptors: Vec<AddressDescriptor>) {
        self.networks.push((name.to_string(), descriptors));
    }

    pub fn networks(&self) -> impl Iterator<Item = (&str, &[AddressDescriptor])> {
        self.networks.iter().map(|(name, descriptors)| (name.as_str(), descriptors.as_slice()))
    }

    /// Returns every usable fixed IP, network by network, in reported order.
    pub fn fixed_ips(&self) -> Vec<FixedIp> {
        let mut result = Vec::new();

        for (network, descriptors) in self.networks() {
            for descriptor in descriptors.iter().filter(|d| d.is_fixed()) {
                let Some(addr) = &descriptor.addr else {
                    continue;
                };

                match addr.parse::<IpAddr>() {
                    Ok(addr) => result.push(FixedIp {
                        network: network.to_string(),
                        addr,
                    }),
                    Err(e) => debug!("Ignoring fixed address {addr:?} on network {network}: {e}"),
                }
            }
        }

        result
    }
}

impl<'de> Deserialize<'de> for ServerAddresses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ServerAddressesVisitor)
    }
}

struct ServerAddressesVisitor;
impl<'de> Visitor<'de> for ServerAddressesVisitor {
    type Value = ServerAddresses;

    fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
        formatter.write_str("map of network names to address lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut result = ServerAddresses::new();

        while let Some((network, value)) = map.next_entry::<String, Value>()? {
            let descriptors = decode_descriptors(&network, value);
            result.networks.push((network, descriptors));
        }

        Ok(result)
    }
}

// Entries that don't look like an address descriptor are dropped rather than failing the whole server.
fn decode_descriptors(network: &str, value: Value) -> Vec<AddressDescriptor> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            debug!("Ignoring addresses for network {network}: expected a list, got {other}");
            return Vec::new();
        }
    };

    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            debug!("Ignoring address entry on network {network}: expected an object, got {item}");
            continue;
        }

        match serde_json::from_value::<AddressDescriptor>(item) {
            Ok(descriptor) => result.push(descriptor),
            Err(e) => debug!("Ignoring malformed address entry on network {network}: {e}"),
        }
    }

    result
}

/// Selects the fixed IP a server should be known by.
///
/// With no network CIDRs, the first fixed IP wins. Otherwise the CIDRs are tried in order and the first fixed IP
/// inside the earliest matching CIDR is returned.
pub fn get_server_fixed_ip(
    addresses: &ServerAddresses,
    name: &str,
    network_cidrs: &[IpNet],
) -> Result<IpAddr, MemberAddressError> {
    let fixed_ips = addresses.fixed_ips();

    if !network_cidrs.is_empty() {
        for cidr in network_cidrs {
            if let Some(fixed_ip) = fixed_ips.iter().find(|fixed_ip| cidr.contains(&fixed_ip.addr)) {
                debug!("Server {name} matched {cidr} with {} on network {}", fixed_ip.addr, fixed_ip.network);
                return Ok(fixed_ip.addr);
            }
        }
    } else if let Some(fixed_ip) = fixed_ips.first() {
        return Ok(fixed_ip.addr);
    }

    Err(MemberAddressError::FixedIpNotFound(name.to_string()))
}
