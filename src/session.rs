use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{Error, Result};
use crate::summarize::Provider;

const CREDENTIAL_KEY: &str = "credential";

/// Provider selection plus its API key, scoped to one browser session. At most
/// one credential is active per session; saving replaces whatever was there.
/// Lives only in the in-memory session store, never in durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub service: Provider,
    pub api_key: String,
}

/// Store a credential in the session, replacing any previous one.
pub async fn save_credential(session: &Session, credential: Credential) -> Result<()> {
    session
        .insert(CREDENTIAL_KEY, credential)
        .await
        .map_err(|e| Error::Upstream(format!("session store error: {e}")))
}

/// Look up the session's saved credential, if any.
pub async fn load_credential(session: &Session) -> Result<Option<Credential>> {
    session
        .get::<Credential>(CREDENTIAL_KEY)
        .await
        .map_err(|e| Error::Upstream(format!("session store error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn fresh_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_load_without_save_is_none() {
        let session = fresh_session();
        assert_eq!(load_credential(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let session = fresh_session();
        let credential = Credential {
            service: Provider::Gemini,
            api_key: "gm-123".to_string(),
        };
        save_credential(&session, credential.clone()).await.unwrap();
        assert_eq!(load_credential(&session).await.unwrap(), Some(credential));
    }

    #[tokio::test]
    async fn test_second_save_wins() {
        let session = fresh_session();
        save_credential(
            &session,
            Credential {
                service: Provider::Gemini,
                api_key: "gm-123".to_string(),
            },
        )
        .await
        .unwrap();
        save_credential(
            &session,
            Credential {
                service: Provider::Claude,
                api_key: "sk-ant-456".to_string(),
            },
        )
        .await
        .unwrap();

        let loaded = load_credential(&session).await.unwrap().unwrap();
        assert_eq!(loaded.service, Provider::Claude);
        assert_eq!(loaded.api_key, "sk-ant-456");
    }
}
