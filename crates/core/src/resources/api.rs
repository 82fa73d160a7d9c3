//! Query service descriptors.

/// How clients authenticate against the GraphQL API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationType {
    ApiKey,
    AwsIam,
    AmazonCognitoUserPools,
    OpenidConnect,
}

impl AuthenticationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticationType::ApiKey => "API_KEY",
            AuthenticationType::AwsIam => "AWS_IAM",
            AuthenticationType::AmazonCognitoUserPools => "AMAZON_COGNITO_USER_POOLS",
            AuthenticationType::OpenidConnect => "OPENID_CONNECT",
        }
    }

    /// Returns true if this mode requires a provider-issued API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, AuthenticationType::ApiKey)
    }
}

/// A managed GraphQL API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSpec {
    pub name: String,
    pub authentication_type: AuthenticationType,
}

impl ApiSpec {
    pub fn new(name: impl Into<String>, authentication_type: AuthenticationType) -> Self {
        Self {
            name: name.into(),
            authentication_type,
        }
    }
}

/// A provider-issued key. The owning API is given to `Stack::add_api_key`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiKeySpec {
    pub description: Option<String>,
}

impl ApiKeySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
