//! Well-known claim types, value types and defaults.

/// Issuer recorded on claims when nothing else is configured or asserted.
pub const DEFAULT_ISSUER: &str = "LOCAL AUTHORITY";

/// Authentication type tag carried by every identity the scheme builds.
pub const AUTHENTICATION_TYPE: &str = "FakeJwtBearer";

/// Claim property holding the short (pre-mapping) name of a mapped claim.
pub const SHORT_CLAIM_TYPE_PROPERTY: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claimproperties/ShortTypeName";

/// Canonical claim type URIs.
pub mod claim_types {
    /// Delegation actor. Never allowed on a claim.
    pub const ACTOR: &str = "http://schemas.xmlsoap.org/ws/2009/09/identity/claims/actor";
    pub const AUTHENTICATION_INSTANT: &str =
        "http://schemas.microsoft.com/ws/2008/06/identity/claims/authenticationinstant";
    pub const AUTHENTICATION_METHOD: &str =
        "http://schemas.microsoft.com/ws/2008/06/identity/claims/authenticationmethod";
    pub const DATE_OF_BIRTH: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/dateofbirth";
    pub const EMAIL: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
    pub const EXPIRATION: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/expiration";
    pub const GENDER: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/gender";
    pub const GIVEN_NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/givenname";
    pub const GROUPS: &str = "http://schemas.xmlsoap.org/claims/Group";
    pub const GROUP_SID: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/groupsid";
    pub const NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
    pub const NAME_IDENTIFIER: &str =
        "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
    pub const PRIMARY_SID: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/primarysid";
    pub const ROLE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
    pub const SURNAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/surname";
    pub const UPN: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/upn";
    pub const WEBPAGE: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/webpage";
    pub const WINDOWS_ACCOUNT_NAME: &str =
        "http://schemas.microsoft.com/ws/2008/06/identity/claims/windowsaccountname";
}

/// XML schema value-type hints attached to claim values.
pub mod claim_value_types {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const INTEGER64: &str = "http://www.w3.org/2001/XMLSchema#integer64";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const JSON: &str = "JSON";
    pub const JSON_ARRAY: &str = "JSON_ARRAY";
    pub const JSON_NULL: &str = "JSON_NULL";
}
