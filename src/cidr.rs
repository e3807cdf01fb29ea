use {
    crate::{error::MemberAddressError, options::Options},
    ipnet::IpNet,
    log::debug,
};

pub const NETWORK_CIDR_OPTION: &str = "network-cidr";
pub const IP_FILTER_OPTION: &str = "ip-filter";

/// Parses the comma-separated network CIDRs from the options, in the order given.
///
/// An empty option yields an empty list regardless of provider. Otherwise the provider must support network CIDRs
/// and every token must parse; the first bad token is returned in the error.
pub fn parse_network_cidr(options: &Options) -> Result<Vec<IpNet>, MemberAddressError> {
    if options.network_cidr.is_empty() {
        return Ok(Vec::new());
    }

    check_provider(options, NETWORK_CIDR_OPTION)?;

    let mut result = Vec::new();
    for token in options.network_cidr.split(',') {
        result.push(parse_cidr(token.trim())?);
    }

    debug!("Parsed network CIDRs: {result:?}");
    Ok(result)
}

/// Parses the single IP filter CIDR from the options. The text isn't split or trimmed.
pub fn parse_ip_filter(options: &Options) -> Result<Option<IpNet>, MemberAddressError> {
    if options.ip_filter.is_empty() {
        return Ok(None);
    }

    check_provider(options, IP_FILTER_OPTION)?;

    let filter = parse_cidr(&options.ip_filter)?;
    debug!("Parsed IP filter: {filter}");
    Ok(Some(filter))
}

fn check_provider(options: &Options, option: &'static str) -> Result<(), MemberAddressError> {
    if options.supports_network_cidr() {
        Ok(())
    } else {
        Err(MemberAddressError::UnsupportedProvider {
            option,
        })
    }
}

// Host bits are cleared so the result names the network itself.
fn parse_cidr(s: &str) -> Result<IpNet, MemberAddressError> {
    match s.parse::<IpNet>() {
        Ok(net) => Ok(net.trunc()),
        Err(_) => Err(MemberAddressError::InvalidCidr(s.to_string())),
    }
}
