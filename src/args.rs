use {
    crate::{error::MemberAddressError, fixed_ip::ServerAddresses, options::Options, provider::VolumeProvider},
    clap::Parser,
    std::path::Path,
    tokio::fs::read_to_string,
    tower::BoxError,
};

#[derive(Clone, Debug, Parser)]
#[command(name = "member-address", author, version, about, long_about = None)]
pub struct Args {
    /// The config file to read, if any. Values here override the environment.
    #[arg(short = 'c', long = "config-file")]
    pub config_file: Option<String>,

    /// The volume provider in use. Network CIDRs and IP filters are only supported with "openstack".
    #[arg(short = 'p', long = "volume-provider")]
    pub volume_provider: Option<VolumeProvider>,

    /// Comma-separated networks the advertised address must fall into, tried in order.
    #[arg(short = 'n', long = "network-cidr")]
    pub network_cidr: Option<String>,

    /// A single network used to filter addresses.
    #[arg(short = 'f', long = "ip-filter")]
    pub ip_filter: Option<String>,

    /// JSON file holding the server's addresses as reported by the provider.
    #[arg(short = 'a', long = "addresses-file")]
    pub addresses_file: String,

    /// The name of the server whose address is being selected.
    pub server_name: String,
}

impl Args {
    /// Builds the options from the environment snapshot, then the config file, then these arguments.
    pub async fn load_options<I, K, V>(&self, env: I) -> Result<Options, BoxError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Options::from_env(env);

        if let Some(config_file) = &self.config_file {
            options.merge(read_config_file(Path::new(config_file)).await?);
        }

        options.update_from_args(self);
        Ok(options)
    }

    pub async fn load_server_addresses(&self) -> Result<ServerAddresses, BoxError> {
        let contents = read_to_string(&self.addresses_file).await?;
        Ok(serde_json::from_str::<ServerAddresses>(&contents)?)
    }
}

async fn read_config_file(config_path: &Path) -> Result<Options, BoxError> {
    let Some(ext) = config_path.extension() else {
        return Err(MemberAddressError::UnknownConfigFileExt(None).into());
    };

    let ext = ext.to_string_lossy();
    match &*ext {
        "toml" => {
            let file_contents = read_to_string(config_path).await?;
            Ok(toml::from_str::<Options>(&file_contents)?)
        }
        "json" | "yaml" | "yml" => {
            let file_contents = read_to_string(config_path).await?;
            Ok(serde_yaml::from_str::<Options>(&file_contents)?)
        }
        _ => Err(MemberAddressError::UnknownConfigFileExt(Some(ext.to_string())).into()),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::Args,
        crate::{
            error::MemberAddressError,
            options::{NETWORK_CIDR_ENV, VOLUME_PROVIDER_ENV},
            provider::VolumeProvider,
        },
        clap::Parser,
        std::{env::temp_dir, path::PathBuf},
    };

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = temp_dir().join(format!("member-address-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_command_line() {
        let args = Args::try_parse_from([
            "member-address",
            "-p",
            "openstack",
            "--network-cidr",
            "10.0.0.0/8",
            "-a",
            "addrs.json",
            "etcd-a",
        ])
        .unwrap();

        assert_eq!(args.volume_provider, Some(VolumeProvider::OpenStack));
        assert_eq!(args.network_cidr.as_deref(), Some("10.0.0.0/8"));
        assert_eq!(args.ip_filter, None);
        assert_eq!(args.addresses_file, "addrs.json");
        assert_eq!(args.server_name, "etcd-a");
    }

    #[test]
    fn addresses_file_is_required() {
        assert!(Args::try_parse_from(["member-address", "etcd-a"]).is_err());
    }

    #[tokio::test]
    async fn arguments_override_config_file_and_env() {
        let config = scratch_file("override.toml", "network-cidr = \"172.16.0.0/12\"\nip-filter = \"172.16.0.0/16\"\n");
        let args = Args::try_parse_from([
            "member-address",
            "-c",
            config.to_str().unwrap(),
            "-f",
            "172.16.1.0/24",
            "-a",
            "addrs.json",
            "etcd-a",
        ])
        .unwrap();

        let options =
            args.load_options([(NETWORK_CIDR_ENV, "10.0.0.0/8"), (VOLUME_PROVIDER_ENV, "openstack")]).await.unwrap();
        std::fs::remove_file(&config).unwrap();

        assert_eq!(options.network_cidr, "172.16.0.0/12");
        assert_eq!(options.ip_filter, "172.16.1.0/24");
        assert_eq!(options.volume_provider, Some(VolumeProvider::OpenStack));
    }

    #[tokio::test]
    async fn reads_yaml_config() {
        let config = scratch_file("config.yaml", "volume-provider: openstack\nnetwork-cidr: \"2001:db8::/64\"\n");
        let args =
            Args::try_parse_from(["member-address", "-c", config.to_str().unwrap(), "-a", "addrs.json", "etcd-a"])
                .unwrap();

        let options = args.load_options(Vec::<(String, String)>::new()).await.unwrap();
        std::fs::remove_file(&config).unwrap();

        assert_eq!(options.network_cidr, "2001:db8::/64");
        assert_eq!(options.validate().unwrap().network_cidrs, vec!["2001:db8::/64".parse().unwrap()]);
    }

    #[tokio::test]
    async fn rejects_unknown_config_extension() {
        let args =
            Args::try_parse_from(["member-address", "-c", "options.ini", "-a", "addrs.json", "etcd-a"]).unwrap();
        let err = args.load_options(Vec::<(String, String)>::new()).await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<MemberAddressError>(),
            Some(&MemberAddressError::UnknownConfigFileExt(Some("ini".to_string())))
        );
    }

    #[tokio::test]
    async fn loads_server_addresses() {
        let addrs = scratch_file(
            "addrs.json",
            r#"{"private": [{"OS-EXT-IPS:type": "fixed", "addr": "192.168.1.10"}]}"#,
        );
        let args = Args::try_parse_from(["member-address", "-a", addrs.to_str().unwrap(), "etcd-a"]).unwrap();

        let addresses = args.load_server_addresses().await.unwrap();
        std::fs::remove_file(&addrs).unwrap();

        assert_eq!(addresses.fixed_ips().len(), 1);
    }
}
