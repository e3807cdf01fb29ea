use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

#[derive(Debug, Eq, PartialEq)]
pub enum MemberAddressError {
    FixedIpNotFound(String),
    InvalidCidr(String),
    UnknownConfigFileExt(Option<String>),
    UnsupportedProvider {
        option: &'static str,
    },
}

impl Display for MemberAddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::FixedIpNotFound(name) => write!(f, "failed to find Fixed IP address for server {name}"),
            Self::InvalidCidr(cidr) => write!(f, "invalid CIDR address: {cidr}"),
            Self::UnknownConfigFileExt(ext) => match ext {
                Some(ext) => write!(f, "Unknown extension for configuration file: {ext}"),
                None => write!(f, "Configuration file has no extension"),
            },
            Self::UnsupportedProvider {
                option,
            } => write!(f, "{option} is only supported with provider 'openstack'"),
        }
    }
}

impl Error for MemberAddressError {}
