//! Shared and private domains.

/// The router group a domain is served by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouterGroupType {
    /// Routed by the HTTP router.
    #[default]
    Http,
    /// Routed by the TCP router; routes carry ports instead of hosts.
    Tcp,
}

/// A domain routes can be created under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Domain {
    /// Server-assigned GUID.
    pub guid: String,
    /// Fully qualified domain name.
    pub name: String,
    /// GUID of the router group, set only for TCP domains.
    pub router_group_guid: Option<String>,
    /// Router group type.
    pub router_group_type: RouterGroupType,
    /// `true` for shared domains, `false` for private ones.
    pub shared: bool,
    /// `true` for domains reachable only from inside the platform.
    pub internal: bool,
}

impl Domain {
    /// Returns `true` when routes under this domain are TCP routes.
    #[must_use]
    pub fn is_tcp(&self) -> bool {
        self.router_group_type == RouterGroupType::Tcp
    }
}
