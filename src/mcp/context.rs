use crate::connectors::ApiKeyIdentity;

/// Per-request data handed down to method handlers and tools
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<ApiKeyIdentity>,
    pub session_id: Option<String>,
}

impl RequestContext {
    pub fn new(identity: Option<ApiKeyIdentity>, session_id: Option<String>) -> Self {
        Self {
            identity,
            session_id,
        }
    }

    /// User id for log fields, `anonymous` when the gate attached no identity
    pub fn user_label(&self) -> &str {
        self.identity
            .as_ref()
            .and_then(|identity| identity.user_id.as_deref())
            .unwrap_or("anonymous")
    }
}
