//! Admin buildpack operations.

use std::sync::Arc;

use super::lookup::exactly_one;
use super::{ActionReply, ActionResult};
use crate::cloud_controller::{Buildpack, BuildpackClient, Filter, FilterField};
use crate::error::{ActionError, ApiError, ResourceKind};
use crate::warnings::{Warned, Warnings};

/// Buildpack operations.
pub struct BuildpackActor<C: ?Sized> {
    client: Arc<C>,
}

impl<C: BuildpackClient + ?Sized> BuildpackActor<C> {
    /// Creates a buildpack actor.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Registers a buildpack.
    ///
    /// # Errors
    ///
    /// - [`ActionError::AlreadyExists`] when the name is taken.
    /// - [`ActionError::BuildpackAlreadyExistsWithoutStack`] when a
    ///   stackless buildpack with this name exists.
    pub async fn create_buildpack(&self, buildpack: &Buildpack) -> ActionReply<Buildpack> {
        let name = buildpack.name.as_str();
        self.client
            .create_buildpack(buildpack)
            .await
            .map_err(|error| match error {
                ApiError::BuildpackNameTaken { .. } => ActionError::AlreadyExists {
                    resource: ResourceKind::Buildpack,
                    identifier: name.to_owned(),
                },
                ApiError::BuildpackAlreadyExistsWithoutStack { .. } => {
                    ActionError::BuildpackAlreadyExistsWithoutStack {
                        name: name.to_owned(),
                    }
                }
                other => ActionError::Generic(other),
            })
    }

    /// Looks a buildpack up by name, narrowed to `stack` when it is not
    /// empty.
    ///
    /// Without a stack, several matches resolve to the one bound to no
    /// stack.
    ///
    /// # Errors
    ///
    /// - [`ActionError::NotFound`] when nothing matches.
    /// - [`ActionError::MultipleFound`] when several match and none can be
    ///   preferred.
    pub async fn get_buildpack_by_name_and_stack(
        &self,
        name: &str,
        stack: &str,
    ) -> ActionReply<Buildpack> {
        let mut filters = vec![Filter::equal(FilterField::Name, name)];
        if !stack.is_empty() {
            filters.push(Filter::equal(FilterField::Stack, stack));
        }

        self.client
            .get_buildpacks(&filters)
            .await
            .map(|result| -> ActionResult<Buildpack> {
                let mut found = result?;
                let stackless = if stack.is_empty() && found.len() > 1 {
                    found.iter().position(|candidate| candidate.stack.is_none())
                } else {
                    None
                };
                if let Some(position) = stackless {
                    return Ok(found.swap_remove(position));
                }
                exactly_one(found, ResourceKind::Buildpack, name)
            })
    }

    /// Renames the buildpack found by name and stack.
    pub async fn rename_buildpack(
        &self,
        old_name: &str,
        new_name: &str,
        stack: &str,
    ) -> ActionReply<Buildpack> {
        let mut warnings = Warnings::new();
        let result: ActionResult<Buildpack> = async {
            let mut buildpack =
                warnings.absorb(self.get_buildpack_by_name_and_stack(old_name, stack).await)?;
            new_name.clone_into(&mut buildpack.name);
            warnings.absorb(self.update_buildpack(&buildpack).await)
        }
        .await;
        Warned::new(result, warnings)
    }

    /// Saves changes to an existing buildpack.
    pub async fn update_buildpack(&self, buildpack: &Buildpack) -> ActionReply<Buildpack> {
        let name = buildpack.name.as_str();
        self.client
            .update_buildpack(buildpack)
            .await
            .map_err(|error| match error {
                ApiError::ResourceNotFound { .. } => {
                    ActionError::not_found(ResourceKind::Buildpack, name)
                }
                ApiError::BuildpackAlreadyExistsWithoutStack { .. } => {
                    ActionError::BuildpackAlreadyExistsWithoutStack {
                        name: name.to_owned(),
                    }
                }
                ApiError::BuildpackNameTaken { .. }
                | ApiError::BuildpackAlreadyExistsForStack { .. } => ActionError::AlreadyExists {
                    resource: ResourceKind::Buildpack,
                    identifier: name.to_owned(),
                },
                other => ActionError::Generic(other),
            })
    }
}
