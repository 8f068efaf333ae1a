//! Classification helpers shared by the actors.

use crate::cloud_controller::Resource;
use crate::error::{ActionError, ApiError, ResourceKind};

use super::ActionResult;

/// Takes the single result of a lookup that should be unique.
///
/// An empty list is [`ActionError::NotFound`]. More than one result is
/// [`ActionError::MultipleFound`] listing every GUID in the order received.
pub(super) fn exactly_one<T: Resource>(
    items: Vec<T>,
    resource: ResourceKind,
    identifier: &str,
) -> ActionResult<T> {
    let mut candidates = items.into_iter();
    match (candidates.next(), candidates.next()) {
        (None, _) => Err(ActionError::not_found(resource, identifier)),
        (Some(only), None) => Ok(only),
        (Some(first), Some(second)) => {
            let guids = [first, second]
                .iter()
                .chain(candidates.as_slice())
                .map(|candidate| candidate.guid().to_owned())
                .collect();
            Err(ActionError::MultipleFound {
                resource,
                identifier: identifier.to_owned(),
                guids,
            })
        }
    }
}

/// Turns `ResourceNotFound` into [`ActionError::NotFound`] for `identifier`.
pub(super) fn not_found_as(
    resource: ResourceKind,
    identifier: &str,
) -> impl FnOnce(ApiError) -> ActionError + '_ {
    move |error| match error {
        ApiError::ResourceNotFound { .. } => ActionError::not_found(resource, identifier),
        other => ActionError::Generic(other),
    }
}

/// Turns `NameTaken` into [`ActionError::AlreadyExists`] for `identifier`.
pub(super) fn name_taken_as(
    resource: ResourceKind,
    identifier: &str,
) -> impl FnOnce(ApiError) -> ActionError + '_ {
    move |error| match error {
        ApiError::NameTaken { .. } => ActionError::AlreadyExists {
            resource,
            identifier: identifier.to_owned(),
        },
        other => ActionError::Generic(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud_controller::Space;
    use rstest::rstest;

    fn space(guid: &str) -> Space {
        Space {
            guid: String::from(guid),
            name: String::from("dev"),
            ..Space::default()
        }
    }

    #[rstest]
    fn empty_lookup_is_not_found() {
        let error = exactly_one(Vec::<Space>::new(), ResourceKind::Space, "dev")
            .expect_err("lookup should fail");
        assert_eq!(error, ActionError::not_found(ResourceKind::Space, "dev"));
    }

    #[rstest]
    fn single_result_is_returned() {
        let found = exactly_one(vec![space("s-1")], ResourceKind::Space, "dev")
            .expect("lookup should succeed");
        assert_eq!(found.guid, "s-1");
    }

    #[rstest]
    #[case(&["s-1", "s-2"])]
    #[case(&["s-3", "s-1", "s-2"])]
    fn several_results_list_every_guid_in_order(#[case] guids: &[&str]) {
        let spaces = guids.iter().map(|guid| space(guid)).collect();
        let error = exactly_one(spaces, ResourceKind::Space, "dev").expect_err("lookup should fail");

        assert_eq!(
            error,
            ActionError::MultipleFound {
                resource: ResourceKind::Space,
                identifier: String::from("dev"),
                guids: guids.iter().map(|guid| String::from(*guid)).collect(),
            }
        );
    }

    #[rstest]
    fn not_found_as_only_rewrites_resource_not_found() {
        let classified = not_found_as(ResourceKind::Stack, "stack-guid")(ApiError::ResourceNotFound {
            message: String::from("gone"),
        });
        assert_eq!(classified, ActionError::not_found(ResourceKind::Stack, "stack-guid"));

        let forbidden = ApiError::Forbidden {
            message: String::from("no"),
        };
        let passed = not_found_as(ResourceKind::Stack, "stack-guid")(forbidden.clone());
        assert_eq!(passed, ActionError::Generic(forbidden));
    }

    #[rstest]
    fn name_taken_as_reports_already_exists() {
        let classified = name_taken_as(ResourceKind::Organization, "acme")(ApiError::NameTaken {
            message: String::from("taken"),
        });
        assert_eq!(
            classified,
            ActionError::AlreadyExists {
                resource: ResourceKind::Organization,
                identifier: String::from("acme"),
            }
        );
    }
}
