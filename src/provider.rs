use {
    serde::{Deserialize, Serialize},
    std::{
        convert::Infallible,
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// The cloud backend supplying volumes and addresses.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum VolumeProvider {
    Alicloud,
    Aws,
    Azure,
    DigitalOcean,
    External,
    Gce,
    Hetzner,
    OpenStack,
    Scaleway,

    /// A provider id this tool doesn't recognize. It has no capabilities.
    Other(String),
}

impl VolumeProvider {
    /// Indicates whether the network CIDR and IP filter options can be used with this provider.
    pub fn supports_network_cidr(&self) -> bool {
        matches!(self, Self::OpenStack)
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Alicloud => "alicloud",
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::DigitalOcean => "do",
            Self::External => "external",
            Self::Gce => "gce",
            Self::Hetzner => "hetzner",
            Self::OpenStack => "openstack",
            Self::Scaleway => "scaleway",
            Self::Other(id) => id,
        }
    }
}

impl From<&str> for VolumeProvider {
    fn from(s: &str) -> Self {
        match s {
            "alicloud" => Self::Alicloud,
            "aws" => Self::Aws,
            "azure" => Self::Azure,
            "do" => Self::DigitalOcean,
            "external" => Self::External,
            "gce" => Self::Gce,
            "hetzner" => Self::Hetzner,
            "openstack" => Self::OpenStack,
            "scaleway" => Self::Scaleway,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for VolumeProvider {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<VolumeProvider> for String {
    fn from(provider: VolumeProvider) -> Self {
        match provider {
            VolumeProvider::Other(id) => id,
            known => known.id().to_string(),
        }
    }
}

impl FromStr for VolumeProvider {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Display for VolumeProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.id())
    }
}
