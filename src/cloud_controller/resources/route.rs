//! Routes as stored by the Cloud Controller.

/// A route, referring to its domain by GUID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Server-assigned GUID, empty for routes not yet created.
    pub guid: String,
    /// Host name, empty for domain-level and TCP routes.
    pub host: String,
    /// GUID of the route's domain.
    pub domain_guid: String,
    /// Path suffix including the leading `/`, empty for none.
    pub path: String,
    /// Port, set only for TCP routes.
    pub port: Option<u16>,
    /// GUID of the owning space.
    pub space_guid: String,
}
