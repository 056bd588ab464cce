//! Caller context threaded through service calls for audit attribution.

/// Who is calling and from where. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// The user to attribute audit records to; `"anonymous"` when unset.
    pub fn actor(&self) -> &str {
        self.user_id.as_deref().unwrap_or("anonymous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_defaults_to_anonymous() {
        assert_eq!(RequestContext::anonymous().actor(), "anonymous");
        assert_eq!(RequestContext::for_user("u-1").actor(), "u-1");
    }
}
