use serde::Serialize;

use crate::claim::Claim;
use crate::constants::claim_types;

/// An authenticated (or anonymous) identity: ordered claims plus the claim
/// types that designate its name and roles.
///
/// Built once per successful authentication and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimsIdentity {
    /// Authentication type tag. `None` means the identity is anonymous.
    authentication_type: Option<String>,
    /// Claim type looked up by [`ClaimsIdentity::name`].
    name_claim_type: String,
    /// Claim type looked up by [`ClaimsIdentity::is_in_role`].
    role_claim_type: String,
    claims: Vec<Claim>,
}

impl ClaimsIdentity {
    /// Create a new `ClaimsIdentity` builder
    #[must_use]
    pub fn builder() -> ClaimsIdentityBuilder {
        ClaimsIdentityBuilder::default()
    }

    /// Create an anonymous identity with no claims and no authentication type
    #[must_use]
    pub fn anonymous() -> Self {
        ClaimsIdentityBuilder::default().build()
    }

    #[must_use]
    pub fn authentication_type(&self) -> Option<&str> {
        self.authentication_type.as_deref()
    }

    /// An identity is authenticated when it carries a non-empty authentication type.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authentication_type
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }

    #[must_use]
    pub fn name_claim_type(&self) -> &str {
        &self.name_claim_type
    }

    #[must_use]
    pub fn role_claim_type(&self) -> &str {
        &self.role_claim_type
    }

    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Value of the first claim whose type is the identity's name claim type.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.find_first(&self.name_claim_type).map(Claim::value)
    }

    /// Whether any role claim carries `role`.
    #[must_use]
    pub fn is_in_role(&self, role: &str) -> bool {
        self.has_claim(&self.role_claim_type, role)
    }

    #[must_use]
    pub fn find_first(&self, claim_type: &str) -> Option<&Claim> {
        self.claims.iter().find(|c| c.claim_type() == claim_type)
    }

    pub fn find_all<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a Claim> + 'a {
        self.claims
            .iter()
            .filter(move |c| c.claim_type() == claim_type)
    }

    #[must_use]
    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.claims
            .iter()
            .any(|c| c.claim_type() == claim_type && c.value() == value)
    }
}

pub struct ClaimsIdentityBuilder {
    authentication_type: Option<String>,
    name_claim_type: String,
    role_claim_type: String,
    claims: Vec<Claim>,
}

impl Default for ClaimsIdentityBuilder {
    fn default() -> Self {
        Self {
            authentication_type: None,
            name_claim_type: claim_types::NAME.to_owned(),
            role_claim_type: claim_types::ROLE.to_owned(),
            claims: Vec::new(),
        }
    }
}

impl ClaimsIdentityBuilder {
    #[must_use]
    pub fn authentication_type(mut self, authentication_type: &str) -> Self {
        self.authentication_type = Some(authentication_type.to_owned());
        self
    }

    #[must_use]
    pub fn name_claim_type(mut self, name_claim_type: &str) -> Self {
        name_claim_type.clone_into(&mut self.name_claim_type);
        self
    }

    #[must_use]
    pub fn role_claim_type(mut self, role_claim_type: &str) -> Self {
        role_claim_type.clone_into(&mut self.role_claim_type);
        self
    }

    #[must_use]
    pub fn claim(mut self, claim: Claim) -> Self {
        self.claims.push(claim);
        self
    }

    #[must_use]
    pub fn claims(mut self, claims: impl IntoIterator<Item = Claim>) -> Self {
        self.claims.extend(claims);
        self
    }

    #[must_use]
    pub fn build(self) -> ClaimsIdentity {
        ClaimsIdentity {
            authentication_type: self.authentication_type,
            name_claim_type: self.name_claim_type,
            role_claim_type: self.role_claim_type,
            claims: self.claims,
        }
    }
}
