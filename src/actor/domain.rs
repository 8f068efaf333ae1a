//! Domain lookups with a per-actor GUID cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::ActionReply;
use crate::cloud_controller::{ApiReply, Domain, DomainClient, Filter, FilterField};
use crate::error::{ActionError, ApiError, ResourceKind};
use crate::warnings::{Warned, Warnings};

/// Domain lookups.
///
/// Domain GUID to domain bindings do not change, so every domain fetched by
/// GUID is remembered for the lifetime of the actor. The cache is never
/// invalidated.
pub struct DomainActor<C: ?Sized> {
    client: Arc<C>,
    cache: Mutex<HashMap<String, Domain>>,
}

impl<C: DomainClient + ?Sized> DomainActor<C> {
    /// Creates an actor with an empty cache.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Looks up a domain by GUID, trying shared domains before private ones.
    ///
    /// # Errors
    ///
    /// [`ActionError::NotFound`] when the GUID is neither a shared nor a
    /// private domain.
    pub async fn get_domain(&self, guid: &str) -> ActionReply<Domain> {
        let mut warnings = Warnings::new();
        let result = async {
            match warnings.absorb(self.get_shared_domain(guid).await) {
                Err(ActionError::NotFound { .. }) => {}
                other => return other,
            }
            warnings.absorb(self.get_private_domain(guid).await)
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Looks up a shared domain by GUID.
    ///
    /// # Errors
    ///
    /// [`ActionError::NotFound`] when no shared domain has this GUID.
    pub async fn get_shared_domain(&self, guid: &str) -> ActionReply<Domain> {
        if let Some(domain) = self.cached(guid) {
            return Warned::bare(Ok(domain));
        }
        let reply = self.client.get_shared_domain(guid).await;
        self.remember(guid, reply)
    }

    /// Looks up a private domain by GUID.
    ///
    /// # Errors
    ///
    /// [`ActionError::NotFound`] when no private domain has this GUID.
    pub async fn get_private_domain(&self, guid: &str) -> ActionReply<Domain> {
        if let Some(domain) = self.cached(guid) {
            return Warned::bare(Ok(domain));
        }
        let reply = self.client.get_private_domain(guid).await;
        self.remember(guid, reply)
    }

    /// Finds the shared domains and the organization's private domains among
    /// `names`. Shared domains come first.
    ///
    /// An empty `names` returns immediately without calling the server.
    pub async fn get_domains_by_name_and_organization(
        &self,
        names: &[String],
        org_guid: &str,
    ) -> ActionReply<Vec<Domain>> {
        if names.is_empty() {
            return Warned::bare(Ok(Vec::new()));
        }

        let filters = [Filter::within(FilterField::Name, names.iter().cloned())];
        let mut warnings = Warnings::new();
        let result: Result<Vec<Domain>, ActionError> = async {
            let mut domains = warnings.absorb(self.client.get_shared_domains(&filters).await)?;
            let private = warnings.absorb(
                self.client
                    .get_organization_private_domains(org_guid, &filters)
                    .await,
            )?;
            domains.extend(private);
            Ok(domains)
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Lists every domain usable by an organization: its private domains,
    /// then every shared domain.
    pub async fn get_organization_domains(&self, org_guid: &str) -> ActionReply<Vec<Domain>> {
        let mut warnings = Warnings::new();
        let result: Result<Vec<Domain>, ActionError> = async {
            let mut domains = warnings.absorb(
                self.client
                    .get_organization_private_domains(org_guid, &[])
                    .await,
            )?;
            let shared = warnings.absorb(self.client.get_shared_domains(&[]).await)?;
            domains.extend(shared);
            Ok(domains)
        }
        .await;
        Warned::new(result, warnings)
    }

    fn cached(&self, guid: &str) -> Option<Domain> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(guid)
            .cloned()
    }

    fn remember(&self, guid: &str, reply: ApiReply<Domain>) -> ActionReply<Domain> {
        reply.map(|result| match result {
            Ok(domain) => {
                self.cache
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(guid.to_owned(), domain.clone());
                Ok(domain)
            }
            Err(ApiError::ResourceNotFound { .. }) => {
                Err(ActionError::not_found(ResourceKind::Domain, guid))
            }
            Err(other) => Err(ActionError::Generic(other)),
        })
    }
}
