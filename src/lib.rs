#![warn(clippy::all)]

//! Selects the fixed IP address a cluster member advertises when running on OpenStack.
//!
//! [`cidr`] parses the network CIDR and IP filter options, which are only accepted with the `openstack` volume
//! provider. [`fixed_ip`] picks one of a server's fixed IPs, optionally restricted to those networks.

pub mod args;
pub mod cidr;
pub mod error;
pub mod fixed_ip;
pub mod options;
pub mod provider;

pub use {
    cidr::{parse_ip_filter, parse_network_cidr},
    error::MemberAddressError,
    fixed_ip::{get_server_fixed_ip, AddressDescriptor, FixedIp, ServerAddresses},
    options::{Options, ValidatedOptions},
    provider::VolumeProvider,
};
