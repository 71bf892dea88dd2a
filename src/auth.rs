use serde::Serialize;

/// Kind of identity that performed a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityType {
    Service,
    User,
}

impl IdentityType {
    pub const fn as_str(self) -> &'static str {
        match self {
            IdentityType::Service => "service",
            IdentityType::User => "user",
        }
    }
}

/// Identity information, e.g. the user or service id of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Auth {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub identity: String,
    pub identity_type: IdentityType,
}

impl Auth {
    pub fn new(identity_type: IdentityType, identity: impl Into<String>) -> Self {
        Auth {
            identity: identity.into(),
            identity_type,
        }
    }

    pub fn user(identity: impl Into<String>) -> Self {
        Auth::new(IdentityType::User, identity)
    }

    pub fn service(identity: impl Into<String>) -> Self {
        Auth::new(IdentityType::Service, identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_identity_type_lowercase() {
        let auth = Auth::user("tester-1");
        assert_eq!(
            serde_json::to_string(&auth).unwrap(),
            r#"{"identity":"tester-1","identity_type":"user"}"#
        );

        let auth = Auth::service("");
        assert_eq!(
            serde_json::to_string(&auth).unwrap(),
            r#"{"identity_type":"service"}"#
        );
    }
}
