//! Classification of non-2xx Cloud Controller responses.
//!
//! The response body carries a stable `error_code` such as `CF-AppNameTaken`.
//! Together with the HTTP status it selects an [`ApiError`] variant, so
//! callers never need to look at the description text.

use serde::Deserialize;

use crate::error::ApiError;

/// Error body shape shared by every v2 endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    description: String,
    error_code: String,
}

/// Marker the server puts in the description when a stackless buildpack of
/// that name already exists.
const STACK_UNIQUE_MARKER: &str = "stack unique";

/// Maps a failed response to an [`ApiError`].
///
/// Bodies that are not JSON become [`ApiError::UnknownHttpSource`] carrying
/// the raw text.
pub(super) fn classify_error_response(
    status: u16,
    raw_body: &str,
    request_ids: Vec<String>,
) -> ApiError {
    let Ok(body) = serde_json::from_str::<ErrorBody>(raw_body) else {
        return ApiError::UnknownHttpSource {
            status,
            raw: raw_body.to_owned(),
        };
    };

    let message = body.description.clone();
    match status {
        400 => classify_bad_request(body),
        401 if body.error_code == "CF-InvalidAuthToken" => ApiError::InvalidAuthToken { message },
        401 => ApiError::Unauthorized { message },
        403 => ApiError::Forbidden { message },
        404 => ApiError::ResourceNotFound { message },
        422 if body.error_code == "CF-BuildpackNameStackTaken" => {
            ApiError::BuildpackAlreadyExistsForStack { message }
        }
        422 => ApiError::UnprocessableEntity { message },
        _ => ApiError::UnexpectedResponse {
            status,
            error_code: body.error_code,
            description: body.description,
            request_ids,
        },
    }
}

fn classify_bad_request(body: ErrorBody) -> ApiError {
    let ErrorBody {
        description: message,
        error_code,
    } = body;

    match error_code.as_str() {
        "CF-NotStaged" => ApiError::NotStaged { message },
        "CF-InstancesError" => ApiError::InstancesUnavailable { message },
        "CF-InvalidRelation" => ApiError::InvalidRelation { message },
        "CF-AppStoppedStatsError" => ApiError::ApplicationStopped { message },
        "CF-BuildpackInvalid" if message.contains(STACK_UNIQUE_MARKER) => {
            ApiError::BuildpackAlreadyExistsWithoutStack { message }
        }
        "CF-BuildpackNameTaken" => ApiError::BuildpackNameTaken { message },
        "CF-OrganizationNameTaken"
        | "CF-SpaceNameTaken"
        | "CF-ServiceInstanceNameTaken"
        | "CF-AppNameTaken"
        | "CF-RouteHostTaken" => ApiError::NameTaken { message },
        "CF-SecurityGroupNotBound" => ApiError::SecurityGroupNotBound { message },
        _ => ApiError::BadRequest { message },
    }
}
