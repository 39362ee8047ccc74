//! Inbound short-name to canonical claim-type aliases.
//!
//! Reproduces the conventional JWT-to-WS-Federation mapping table, limited to
//! the names test tokens actually use.

use fake_jwt_security::constants::claim_types;

const OBJECT_IDENTIFIER: &str = "http://schemas.microsoft.com/identity/claims/objectidentifier";
const SCOPE: &str = "http://schemas.microsoft.com/identity/claims/scope";
const TENANT_ID: &str = "http://schemas.microsoft.com/identity/claims/tenantid";
const AUTHN_CLASS_REFERENCE: &str = "http://schemas.microsoft.com/claims/authnclassreference";
const AUTHN_METHODS_REFERENCES: &str = "http://schemas.microsoft.com/claims/authnmethodsreferences";

/// Canonical claim type for an inbound short claim name, if one is known.
#[must_use]
pub fn map_inbound(short_name: &str) -> Option<&'static str> {
    let claim_type = match short_name {
        "actort" => claim_types::ACTOR,
        "acr" => AUTHN_CLASS_REFERENCE,
        "amr" => AUTHN_METHODS_REFERENCES,
        "auth_time" => claim_types::AUTHENTICATION_INSTANT,
        "authmethod" => claim_types::AUTHENTICATION_METHOD,
        "birthdate" => claim_types::DATE_OF_BIRTH,
        "email" => claim_types::EMAIL,
        "expiration" => claim_types::EXPIRATION,
        "family_name" => claim_types::SURNAME,
        "gender" => claim_types::GENDER,
        "given_name" => claim_types::GIVEN_NAME,
        "groups" => claim_types::GROUPS,
        "groupsid" => claim_types::GROUP_SID,
        "nameid" | "sub" => claim_types::NAME_IDENTIFIER,
        "oid" => OBJECT_IDENTIFIER,
        "primarysid" => claim_types::PRIMARY_SID,
        "role" | "roles" => claim_types::ROLE,
        "scp" => SCOPE,
        "tid" => TENANT_ID,
        "name" | "unique_name" => claim_types::NAME,
        "upn" => claim_types::UPN,
        "website" => claim_types::WEBPAGE,
        "winaccountname" => claim_types::WINDOWS_ACCOUNT_NAME,
        _ => return None,
    };
    Some(claim_type)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn conventional_names_map_to_canonical_types() {
        assert_eq!(map_inbound("sub"), Some(claim_types::NAME_IDENTIFIER));
        assert_eq!(map_inbound("role"), Some(claim_types::ROLE));
        assert_eq!(map_inbound("roles"), Some(claim_types::ROLE));
        assert_eq!(map_inbound("unique_name"), Some(claim_types::NAME));
        assert_eq!(map_inbound("name"), Some(claim_types::NAME));
        assert_eq!(map_inbound("actort"), Some(claim_types::ACTOR));
    }

    #[test]
    fn unknown_and_differently_cased_names_are_not_mapped() {
        assert_eq!(map_inbound("nickname"), None);
        assert_eq!(map_inbound("iss"), None);
        assert_eq!(map_inbound("Sub"), None);
    }
}
