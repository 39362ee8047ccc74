//! `WWW-Authenticate` construction (RFC 6750 section 3).

use fake_jwt_bearer_sdk::FakeJwtBearerError;

/// RFC 6750 error code reported for any failed authentication attempt.
pub const INVALID_TOKEN: &str = "invalid_token";

/// Build the `WWW-Authenticate` value for a challenge.
///
/// Empty parameters count as absent. With no parameters the value is the
/// bare `challenge` literal. A challenge that already carries parameters
/// (contains a space past its first character) gets a `,` before ours.
#[must_use]
pub fn www_authenticate(
    challenge: &str,
    error: Option<&str>,
    error_description: Option<&str>,
    error_uri: Option<&str>,
) -> String {
    let error = error.filter(|s| !s.is_empty());
    let error_description = error_description.filter(|s| !s.is_empty());
    let error_uri = error_uri.filter(|s| !s.is_empty());

    if error.is_none() && error_description.is_none() && error_uri.is_none() {
        return challenge.to_owned();
    }

    let mut value = challenge.to_owned();
    if challenge.find(' ').is_some_and(|index| index > 0) {
        value.push(',');
    }
    if let Some(error) = error {
        value.push_str(" error=\"");
        value.push_str(error);
        value.push('"');
    }
    if let Some(description) = error_description {
        if error.is_some() {
            value.push(',');
        }
        value.push_str(" error_description=\"");
        value.push_str(description);
        value.push('"');
    }
    if let Some(uri) = error_uri {
        if error.is_some() || error_description.is_some() {
            value.push(',');
        }
        value.push_str(" error_uri=\"");
        value.push_str(uri);
        value.push('"');
    }
    value
}

/// Human readable description of a failure, for `error_description`.
///
/// Only token-validation failures are described. One level of
/// [`FakeJwtBearerError::Aggregate`] is unwrapped and its sentences are joined
/// with `"; "`. Anything else yields an empty string.
#[must_use]
pub fn error_description(failure: &FakeJwtBearerError) -> String {
    let failures = match failure {
        FakeJwtBearerError::Aggregate(inner) => inner.as_slice(),
        single => std::slice::from_ref(single),
    };

    failures
        .iter()
        .filter_map(describe)
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe(failure: &FakeJwtBearerError) -> Option<String> {
    let sentence = match failure {
        FakeJwtBearerError::InvalidAudience { audience } => {
            format!("The audience '{}' is invalid", or_null(audience.as_deref()))
        }
        FakeJwtBearerError::InvalidIssuer { issuer } => {
            format!("The issuer '{}' is invalid", or_null(issuer.as_deref()))
        }
        FakeJwtBearerError::NoExpiration => "The token has no expiration".to_owned(),
        FakeJwtBearerError::InvalidLifetime {
            not_before,
            expires,
        } => format!(
            "The token lifetime is invalid; NotBefore: '{}', Expires: '{}'",
            or_null(not_before.as_deref()),
            or_null(expires.as_deref())
        ),
        FakeJwtBearerError::NotYetValid { not_before } => {
            format!("The token is not valid before '{not_before}'")
        }
        FakeJwtBearerError::Expired { expires } => format!("The token expired at '{expires}'"),
        FakeJwtBearerError::SignatureKeyNotFound => "The signature key was not found".to_owned(),
        FakeJwtBearerError::InvalidSignature => "The signature is invalid".to_owned(),
        _ => return None,
    };
    Some(sentence)
}

fn or_null(value: Option<&str>) -> &str {
    value.unwrap_or("(null)")
}
