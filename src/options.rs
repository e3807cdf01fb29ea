use {
    crate::{
        args::Args,
        cidr::{parse_ip_filter, parse_network_cidr},
        error::MemberAddressError,
        provider::VolumeProvider,
    },
    ipnet::IpNet,
    serde::{Deserialize, Serialize},
};

pub const NETWORK_CIDR_ENV: &str = "ETCD_MANAGER_NETWORK_CIDR";
pub const IP_FILTER_ENV: &str = "ETCD_MANAGER_IP_FILTER";
pub const VOLUME_PROVIDER_ENV: &str = "ETCD_MANAGER_VOLUME_PROVIDER";

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Options {
    /// Comma-separated networks a member address must fall into. Empty means any fixed IP is allowed.
    #[serde(default)]
    pub network_cidr: String,

    /// A single network used to filter addresses. Empty means no filter.
    #[serde(default)]
    pub ip_filter: String,

    /// The cloud backend in use.
    #[serde(default)]
    pub volume_provider: Option<VolumeProvider>,
}

/// Options whose network settings have been parsed and checked against the provider.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidatedOptions {
    pub network_cidrs: Vec<IpNet>,
    pub ip_filter: Option<IpNet>,
}

impl Options {
    /// Builds options from a snapshot of environment variables. Variables that aren't set leave the field at its
    /// default.
    pub fn from_env<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::default();

        for (key, value) in vars {
            match key.as_ref() {
                NETWORK_CIDR_ENV => options.network_cidr = value.into(),
                IP_FILTER_ENV => options.ip_filter = value.into(),
                VOLUME_PROVIDER_ENV => {
                    let id: String = value.into();
                    options.volume_provider = Some(VolumeProvider::from(id));
                }
                _ => (),
            }
        }

        options
    }

    /// Overlays the non-empty fields of `other` onto these options.
    pub fn merge(&mut self, other: Options) {
        if !other.network_cidr.is_empty() {
            self.network_cidr = other.network_cidr;
        }

        if !other.ip_filter.is_empty() {
            self.ip_filter = other.ip_filter;
        }

        if other.volume_provider.is_some() {
            self.volume_provider = other.volume_provider;
        }
    }

    /// Updates the options using the specified arguments from the command line.
    pub fn update_from_args(&mut self, args: &Args) {
        if let Some(network_cidr) = &args.network_cidr {
            self.network_cidr = network_cidr.clone();
        }

        if let Some(ip_filter) = &args.ip_filter {
            self.ip_filter = ip_filter.clone();
        }

        if let Some(volume_provider) = &args.volume_provider {
            self.volume_provider = Some(volume_provider.clone());
        }
    }

    /// Indicates whether the configured provider supports the network CIDR and IP filter options.
    pub fn supports_network_cidr(&self) -> bool {
        self.volume_provider.as_ref().is_some_and(VolumeProvider::supports_network_cidr)
    }

    pub fn validate(&self) -> Result<ValidatedOptions, MemberAddressError> {
        Ok(ValidatedOptions {
            network_cidrs: parse_network_cidr(self)?,
            ip_filter: parse_ip_filter(self)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{Options, IP_FILTER_ENV, NETWORK_CIDR_ENV, VOLUME_PROVIDER_ENV},
        crate::{error::MemberAddressError, provider::VolumeProvider},
    };

    #[test]
    fn from_env_defaults_to_empty() {
        let options = Options::from_env(Vec::<(String, String)>::new());
        assert_eq!(options.network_cidr, "");
        assert_eq!(options.ip_filter, "");
        assert_eq!(options.volume_provider, None);
    }

    #[test]
    fn from_env_reads_snapshot() {
        let options = Options::from_env([
            (NETWORK_CIDR_ENV, "192.168.0.0/16, 2001:db8::/64"),
            (IP_FILTER_ENV, "10.0.0.0/8"),
            (VOLUME_PROVIDER_ENV, "openstack"),
            ("HOME", "/root"),
        ]);

        assert_eq!(options.network_cidr, "192.168.0.0/16, 2001:db8::/64");
        assert_eq!(options.ip_filter, "10.0.0.0/8");
        assert_eq!(options.volume_provider, Some(VolumeProvider::OpenStack));
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let mut options = Options::from_env([(NETWORK_CIDR_ENV, "10.0.0.0/8"), (VOLUME_PROVIDER_ENV, "openstack")]);
        options.merge(Options {
            ip_filter: "10.1.0.0/16".to_string(),
            ..Options::default()
        });

        assert_eq!(options.network_cidr, "10.0.0.0/8");
        assert_eq!(options.ip_filter, "10.1.0.0/16");
        assert_eq!(options.volume_provider, Some(VolumeProvider::OpenStack));
    }

    #[test]
    fn validate_parses_both_fields() {
        let options = Options {
            network_cidr: "192.168.0.0/16, 2001:db8::/64".to_string(),
            ip_filter: "2001:db8::/64".to_string(),
            volume_provider: Some(VolumeProvider::OpenStack),
        };

        let validated = options.validate().unwrap();
        assert_eq!(validated.network_cidrs, vec!["192.168.0.0/16".parse().unwrap(), "2001:db8::/64".parse().unwrap()]);
        assert_eq!(validated.ip_filter, Some("2001:db8::/64".parse().unwrap()));
    }

    #[test]
    fn validate_reports_network_cidr_first() {
        let options = Options {
            network_cidr: "bogus".to_string(),
            ip_filter: "also-bogus".to_string(),
            volume_provider: Some(VolumeProvider::OpenStack),
        };

        assert_eq!(options.validate(), Err(MemberAddressError::InvalidCidr("bogus".to_string())));
    }

    #[test]
    fn config_file_keys_are_kebab_case() {
        let options: Options =
            toml::from_str("network-cidr = \"10.0.0.0/8\"\nvolume-provider = \"openstack\"\n").unwrap();
        assert_eq!(options.network_cidr, "10.0.0.0/8");
        assert_eq!(options.ip_filter, "");
        assert!(options.supports_network_cidr());
    }
}
