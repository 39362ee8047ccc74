//! Claims mapping: decoded token content to [`ClaimsIdentity`].

use fake_jwt_bearer_sdk::FakeJwtBearerError;
use fake_jwt_security::constants::{
    AUTHENTICATION_TYPE, SHORT_CLAIM_TYPE_PROPERTY, claim_value_types,
};
use fake_jwt_security::{Claim, ClaimsIdentity, ClaimsIdentityBuilder};

use crate::config::ClaimsHandlerOptions;
use crate::domain::claim_type_map::map_inbound;
use crate::domain::decoder::{RawClaimSet, RawClaimValue};
use crate::domain::jwt::UnverifiedJwt;

/// Turns decoded token content into an identity.
///
/// Hosts may swap the default [`FakeJwtBearerClaimsHandler`] for their own
/// implementation when building the handler.
pub trait SecurityTokenClaimsHandler: Send + Sync {
    /// Build an identity from a strict JSON claim set.
    ///
    /// # Errors
    ///
    /// - `InvalidIssuerClaim` if `iss` is not a single string and the issuer
    ///   is not overridden
    /// - `UnsupportedValueKind` naming the first entry that is neither a
    ///   string nor an array of strings
    /// - `UnsupportedClaimType` if a claim resolves to the actor type
    fn create_claims_identity(
        &self,
        claims: &RawClaimSet,
    ) -> Result<ClaimsIdentity, FakeJwtBearerError>;

    /// Build an identity from a compact JWT without verifying it.
    ///
    /// An unreadable token yields an identity with no claims rather than an
    /// error.
    ///
    /// # Errors
    ///
    /// `UnsupportedClaimType` if a claim resolves to the actor type.
    fn create_claims_identity_from_token(
        &self,
        token: &str,
    ) -> Result<ClaimsIdentity, FakeJwtBearerError>;
}

/// Default claims handler driven by [`ClaimsHandlerOptions`].
#[derive(Debug, Clone, Default)]
pub struct FakeJwtBearerClaimsHandler {
    options: ClaimsHandlerOptions,
}

struct Issuers {
    issuer: String,
    original_issuer: String,
}

impl Issuers {
    fn asserted(issuer: &str) -> Self {
        Self {
            issuer: issuer.to_owned(),
            original_issuer: issuer.to_owned(),
        }
    }
}

/// One value about to become a claim.
struct ClaimEntry<'a> {
    key: &'a str,
    value: &'a str,
    value_type: &'a str,
}

impl FakeJwtBearerClaimsHandler {
    #[must_use]
    pub fn new(options: ClaimsHandlerOptions) -> Self {
        Self { options }
    }

    fn configured_issuers(&self) -> Issuers {
        Issuers {
            issuer: self.options.issuer.clone(),
            original_issuer: self.options.original_issuer.clone(),
        }
    }

    fn identity_builder(&self) -> ClaimsIdentityBuilder {
        ClaimsIdentity::builder()
            .authentication_type(AUTHENTICATION_TYPE)
            .name_claim_type(&self.options.name_claim_type)
            .role_claim_type(&self.options.role_claim_type)
    }

    /// Claim type `key` ends up with, or `None` when the key is filtered out.
    fn resolve_claim_type<'a>(&self, key: &'a str) -> Option<&'a str> {
        if !self.options.map_inbound_claims {
            return Some(key);
        }
        if self.options.inbound_claim_filter.contains(key) {
            return None;
        }
        Some(map_inbound(key).unwrap_or(key))
    }

    fn is_name_entry(&self, key: &str) -> bool {
        key == "name" || self.resolve_claim_type(key) == Some(self.options.name_claim_type.as_str())
    }

    fn create_claim(
        &self,
        entry: &ClaimEntry<'_>,
        issuers: &Issuers,
    ) -> Result<Option<Claim>, FakeJwtBearerError> {
        if !self.options.map_inbound_claims {
            let claim = Claim::new(
                entry.key,
                entry.value,
                entry.value_type,
                &issuers.issuer,
                &issuers.original_issuer,
            )?;
            return Ok(Some(claim));
        }

        if self.options.inbound_claim_filter.contains(entry.key) {
            return Ok(None);
        }

        let mapped = map_inbound(entry.key);
        let claim = Claim::new(
            mapped.unwrap_or(entry.key),
            entry.value,
            claim_value_types::STRING,
            &issuers.issuer,
            &issuers.original_issuer,
        )?;

        Ok(Some(match mapped {
            Some(_) => claim.with_property(SHORT_CLAIM_TYPE_PROPERTY, entry.key),
            None => claim,
        }))
    }

    fn build_identity(
        &self,
        entries: &[ClaimEntry<'_>],
        issuers: &Issuers,
    ) -> Result<ClaimsIdentity, FakeJwtBearerError> {
        // `sub` doubles as the name unless the token names the user itself.
        let add_name_from_sub = self.options.map_inbound_claims
            && !self.options.inbound_claim_filter.contains("sub")
            && !entries.iter().any(|entry| self.is_name_entry(entry.key));

        let mut claims = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(claim) = self.create_claim(entry, issuers)? {
                claims.push(claim);
            }
            if add_name_from_sub && entry.key == "sub" {
                claims.push(Claim::new(
                    &self.options.name_claim_type,
                    entry.value,
                    claim_value_types::STRING,
                    &issuers.issuer,
                    &issuers.original_issuer,
                )?);
            }
        }

        Ok(self.identity_builder().claims(claims).build())
    }
}

impl SecurityTokenClaimsHandler for FakeJwtBearerClaimsHandler {
    fn create_claims_identity(
        &self,
        claims: &RawClaimSet,
    ) -> Result<ClaimsIdentity, FakeJwtBearerError> {
        let issuers = if self.options.override_issuer {
            self.configured_issuers()
        } else {
            match claims.get("iss").map(RawClaimValue::as_single) {
                Some(Some(issuer)) => Issuers::asserted(issuer),
                Some(None) => return Err(FakeJwtBearerError::InvalidIssuerClaim),
                None => self.configured_issuers(),
            }
        };

        if let Some((key, _)) = claims.iter().find(|(_, value)| !value.is_supported()) {
            return Err(FakeJwtBearerError::unsupported_value_kind(key));
        }

        let entries: Vec<ClaimEntry<'_>> = claims
            .iter()
            .flat_map(|(key, value)| {
                value.values().map(move |value| ClaimEntry {
                    key,
                    value,
                    value_type: claim_value_types::STRING,
                })
            })
            .collect();

        self.build_identity(&entries, &issuers)
    }

    fn create_claims_identity_from_token(
        &self,
        token: &str,
    ) -> Result<ClaimsIdentity, FakeJwtBearerError> {
        let jwt = match UnverifiedJwt::parse(token) {
            Ok(jwt) => jwt,
            Err(error) => {
                tracing::debug!(
                    %error,
                    "Unreadable signed token, falling back to an empty identity"
                );
                return Ok(self.identity_builder().build());
            }
        };
        tracing::debug!(
            alg = jwt.algorithm().unwrap_or_default(),
            "Reading signed token without verification"
        );

        let issuers = match jwt.issuer() {
            Some(issuer) if !self.options.override_issuer => Issuers::asserted(&issuer),
            _ => self.configured_issuers(),
        };

        let flattened = jwt.claims();
        let entries: Vec<ClaimEntry<'_>> = flattened
            .iter()
            .map(|claim| ClaimEntry {
                key: &claim.claim_type,
                value: &claim.value,
                value_type: claim.value_type,
            })
            .collect();

        self.build_identity(&entries, &issuers)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use fake_jwt_bearer_sdk::client::FakeToken;
    use fake_jwt_security::constants::{DEFAULT_ISSUER, claim_types};

    fn set(pairs: &[(&str, RawClaimValue)]) -> RawClaimSet {
        pairs.iter().cloned().collect()
    }

    fn handler() -> FakeJwtBearerClaimsHandler {
        FakeJwtBearerClaimsHandler::default()
    }

    fn values<'a>(identity: &'a ClaimsIdentity, claim_type: &'a str) -> Vec<&'a str> {
        identity.find_all(claim_type).map(Claim::value).collect()
    }

    #[test]
    fn maps_conventional_claims() {
        let identity = handler()
            .create_claims_identity(&set(&[
                ("sub", "Bob".into()),
                ("role", vec!["R1", "R2"].into()),
            ]))
            .unwrap();

        assert_eq!(identity.authentication_type(), Some(AUTHENTICATION_TYPE));
        assert_eq!(values(&identity, claim_types::NAME_IDENTIFIER), ["Bob"]);
        assert_eq!(values(&identity, claim_types::ROLE), ["R1", "R2"]);
        assert!(identity.is_in_role("R2"));

        let sub = identity.find_first(claim_types::NAME_IDENTIFIER).unwrap();
        assert_eq!(sub.property(SHORT_CLAIM_TYPE_PROPERTY), Some("sub"));
        assert_eq!(sub.value_type(), claim_value_types::STRING);
        assert_eq!(sub.issuer(), DEFAULT_ISSUER);
        assert_eq!(sub.original_issuer(), DEFAULT_ISSUER);
    }

    #[test]
    fn sub_falls_back_to_name() {
        let identity = handler()
            .create_claims_identity(&set(&[("sub", "Bob".into())]))
            .unwrap();

        assert_eq!(identity.name(), Some("Bob"));
        assert_eq!(identity.claims().len(), 2);
        let name = identity.find_first(claim_types::NAME).unwrap();
        assert_eq!(name.property(SHORT_CLAIM_TYPE_PROPERTY), None);
    }

    #[test]
    fn explicit_name_suppresses_fallback() {
        let identity = handler()
            .create_claims_identity(&set(&[
                ("sub", "Bob".into()),
                ("unique_name", "Carol".into()),
            ]))
            .unwrap();

        assert_eq!(values(&identity, claim_types::NAME), ["Carol"]);
    }

    #[test]
    fn name_key_suppresses_fallback() {
        let identity = handler()
            .create_claims_identity(&set(&[("sub", "Bob".into()), ("name", "Carol".into())]))
            .unwrap();

        assert_eq!(values(&identity, claim_types::NAME), ["Carol"]);
        assert_eq!(identity.name(), Some("Carol"));
    }

    #[test]
    fn filtered_name_key_still_suppresses_fallback() {
        let options = ClaimsHandlerOptions {
            inbound_claim_filter: ["name".to_owned()].into(),
            ..ClaimsHandlerOptions::default()
        };
        let identity = FakeJwtBearerClaimsHandler::new(options)
            .create_claims_identity(&set(&[("sub", "Bob".into()), ("name", "Carol".into())]))
            .unwrap();

        assert_eq!(identity.name(), None);
        assert_eq!(identity.claims().len(), 1);
    }

    #[test]
    fn no_fallback_without_mapping() {
        let options = ClaimsHandlerOptions {
            map_inbound_claims: false,
            ..ClaimsHandlerOptions::default()
        };
        let identity = FakeJwtBearerClaimsHandler::new(options)
            .create_claims_identity(&set(&[("sub", "Bob".into()), ("role", "admin".into())]))
            .unwrap();

        assert_eq!(values(&identity, "sub"), ["Bob"]);
        assert_eq!(values(&identity, "role"), ["admin"]);
        assert_eq!(identity.name(), None);
        assert!(identity.claims().iter().all(|c| c.properties().is_empty()));
    }

    #[test]
    fn claim_count_matches_values() {
        let identity = handler()
            .create_claims_identity(&set(&[
                ("role", vec!["a", "b", "c"].into()),
                ("email", "bob@example.com".into()),
                ("empty", Vec::<&str>::new().into()),
            ]))
            .unwrap();

        assert_eq!(identity.claims().len(), 4);
    }

    #[test]
    fn asserted_issuer_wins_unless_overridden() {
        let claims = set(&[("iss", "X".into()), ("role", "r".into())]);

        let identity = handler().create_claims_identity(&claims).unwrap();
        assert!(identity.claims().iter().all(|c| c.issuer() == "X" && c.original_issuer() == "X"));

        let options = ClaimsHandlerOptions {
            override_issuer: true,
            issuer: "Y".to_owned(),
            original_issuer: "Y0".to_owned(),
            ..ClaimsHandlerOptions::default()
        };
        let identity = FakeJwtBearerClaimsHandler::new(options)
            .create_claims_identity(&claims)
            .unwrap();
        assert!(identity.claims().iter().all(|c| c.issuer() == "Y" && c.original_issuer() == "Y0"));
    }

    #[test]
    fn array_issuer_is_rejected() {
        let err = handler()
            .create_claims_identity(&set(&[("iss", vec!["a", "b"].into())]))
            .unwrap_err();
        assert_eq!(err, FakeJwtBearerError::InvalidIssuerClaim);
    }

    #[test]
    fn non_string_issuer_is_rejected_unless_overridden() {
        let claims = set(&[("iss", RawClaimValue::Unsupported(5.into()))]);

        let err = handler().create_claims_identity(&claims).unwrap_err();
        assert_eq!(err, FakeJwtBearerError::InvalidIssuerClaim);

        let options = ClaimsHandlerOptions {
            override_issuer: true,
            ..ClaimsHandlerOptions::default()
        };
        let err = FakeJwtBearerClaimsHandler::new(options)
            .create_claims_identity(&claims)
            .unwrap_err();
        assert_eq!(err, FakeJwtBearerError::unsupported_value_kind("iss"));
    }

    #[test]
    fn issuer_check_precedes_value_kind_check() {
        let claims = set(&[
            ("age", RawClaimValue::Unsupported(42.into())),
            ("iss", RawClaimValue::Unsupported(true.into())),
        ]);
        let err = handler().create_claims_identity(&claims).unwrap_err();
        assert_eq!(err, FakeJwtBearerError::InvalidIssuerClaim);
    }

    #[test]
    fn unsupported_value_is_rejected_with_claim_name() {
        let err = handler()
            .create_claims_identity(&set(&[
                ("sub", "Bob".into()),
                ("age", RawClaimValue::Unsupported(42.into())),
            ]))
            .unwrap_err();
        assert_eq!(err, FakeJwtBearerError::unsupported_value_kind("age"));
    }

    #[test]
    fn filtered_keys_produce_no_claim() {
        let options = ClaimsHandlerOptions {
            inbound_claim_filter: ["email".to_owned()].into(),
            ..ClaimsHandlerOptions::default()
        };
        let identity = FakeJwtBearerClaimsHandler::new(options)
            .create_claims_identity(&set(&[("email", "x@y".into()), ("role", "r".into())]))
            .unwrap();

        assert_eq!(identity.claims().len(), 1);
        assert_eq!(identity.find_all(claim_types::EMAIL).count(), 0);
    }

    #[test]
    fn actor_claim_is_rejected() {
        let err = handler()
            .create_claims_identity(&set(&[("actort", "delegate".into())]))
            .unwrap_err();
        assert_eq!(
            err,
            FakeJwtBearerError::UnsupportedClaimType {
                claim_type: claim_types::ACTOR.to_owned()
            }
        );
    }

    #[test]
    fn actor_uri_is_rejected_even_without_mapping() {
        let options = ClaimsHandlerOptions {
            map_inbound_claims: false,
            ..ClaimsHandlerOptions::default()
        };
        let err = FakeJwtBearerClaimsHandler::new(options)
            .create_claims_identity(&set(&[(claim_types::ACTOR, "delegate".into())]))
            .unwrap_err();
        assert!(matches!(err, FakeJwtBearerError::UnsupportedClaimType { .. }));
    }

    #[test]
    fn custom_name_and_role_types_flow_into_identity() {
        let options = ClaimsHandlerOptions {
            name_claim_type: claim_types::EMAIL.to_owned(),
            role_claim_type: "groups".to_owned(),
            map_inbound_claims: false,
            ..ClaimsHandlerOptions::default()
        };
        let identity = FakeJwtBearerClaimsHandler::new(options)
            .create_claims_identity(&set(&[("groups", "ops".into())]))
            .unwrap();

        assert_eq!(identity.name_claim_type(), claim_types::EMAIL);
        assert!(identity.is_in_role("ops"));
    }

    #[test]
    fn unreadable_signed_token_gives_empty_identity() {
        let identity = handler()
            .create_claims_identity_from_token("garbage")
            .unwrap();
        assert!(identity.claims().is_empty());
        assert_eq!(identity.authentication_type(), Some(AUTHENTICATION_TYPE));
    }

    #[test]
    fn signed_token_issuer_is_asserted_unless_overridden() {
        let token = FakeToken::user_with_roles("Bob", &["admin"])
            .claim("iss", "X")
            .to_unsigned_jwt();

        let identity = handler().create_claims_identity_from_token(&token).unwrap();
        assert!(identity.claims().iter().all(|c| c.issuer() == "X" && c.original_issuer() == "X"));

        let options = ClaimsHandlerOptions {
            override_issuer: true,
            issuer: "Y".to_owned(),
            original_issuer: "Y0".to_owned(),
            ..ClaimsHandlerOptions::default()
        };
        let identity = FakeJwtBearerClaimsHandler::new(options)
            .create_claims_identity_from_token(&token)
            .unwrap();
        assert!(!identity.claims().is_empty());
        assert!(identity.claims().iter().all(|c| c.issuer() == "Y" && c.original_issuer() == "Y0"));
        assert!(identity.is_in_role("admin"));
    }
}
