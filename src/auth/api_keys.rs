use crate::types::{AppError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use utoipa::ToSchema;

const KEY_BYTES: usize = 32;
const PREFIX_LEN: usize = 8;

/// Hashes a key using SHA256 for storage; plaintext keys are never kept.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare two secrets through their digests so the comparison length is fixed.
fn secrets_match(expected: &str, provided: &str) -> bool {
    let a = Sha256::digest(expected.as_bytes());
    let b = Sha256::digest(provided.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Check an admin password against the configured one.
///
/// Key management is refused outright when no admin password is configured.
pub fn verify_admin(configured: Option<&str>, provided: Option<&str>) -> Result<()> {
    let Some(expected) = configured else {
        return Err(AppError::Auth(
            "Key management is disabled: no admin password configured".to_string(),
        ));
    };
    match provided {
        Some(password) if secrets_match(expected, password) => Ok(()),
        _ => {
            tracing::warn!("Invalid admin password used for API key management");
            Err(AppError::Auth("Invalid admin password".to_string()))
        }
    }
}

#[derive(Debug, Clone)]
struct ApiKeyRecord {
    id: String,
    key_hash: String,
    key_prefix: String,
    agent_id: String,
    agent_name: String,
    description: String,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl ApiKeyRecord {
    fn info(&self) -> ApiKeyInfo {
        ApiKeyInfo {
            id: self.id.clone(),
            key_prefix: self.key_prefix.clone(),
            agent_id: self.agent_id.clone(),
            agent_name: self.agent_name.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
            last_used_at: self.last_used_at,
            is_active: self.is_active,
        }
    }
}

/// Key metadata; never includes the key itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyInfo {
    pub id: String,
    pub key_prefix: String,
    pub agent_id: String,
    pub agent_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Returned once, at creation, with the plaintext key.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyCreated {
    pub key: String,
    #[serde(flatten)]
    pub info: ApiKeyInfo,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateApiKeyRequest {
    pub agent_id: String,
    pub agent_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AdminQuery {
    #[serde(default)]
    pub admin_password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyList {
    pub api_keys: Vec<ApiKeyInfo>,
}

/// Identity attached to a request authenticated with `X-API-Key`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedAgent {
    pub key_id: String,
    pub agent_id: String,
    pub agent_name: String,
}

/// In-memory registry of API keys issued to external agents.
#[derive(Default)]
pub struct ApiKeyRegistry {
    keys: RwLock<BTreeMap<String, ApiKeyRecord>>,
}

impl ApiKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new random key for an agent.
    pub fn create(&self, agent_id: &str, agent_name: &str, description: &str) -> Result<ApiKeyCreated> {
        if agent_id.trim().is_empty() || agent_name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "agent_id and agent_name are required".to_string(),
            ));
        }

        let key = hex::encode(rand::random::<[u8; KEY_BYTES]>());
        let record = ApiKeyRecord {
            id: uuid::Uuid::new_v4().to_string(),
            key_hash: hash_key(&key),
            key_prefix: key[..PREFIX_LEN].to_string(),
            agent_id: agent_id.to_string(),
            agent_name: agent_name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            is_active: true,
        };
        let info = record.info();
        self.keys.write().insert(record.id.clone(), record);

        tracing::info!(key_id = %info.id, agent_id, "Created API key");
        Ok(ApiKeyCreated { key, info })
    }

    pub fn list(&self) -> Vec<ApiKeyInfo> {
        self.keys.read().values().map(ApiKeyRecord::info).collect()
    }

    /// Deactivate a key. Revoked keys stay listed.
    pub fn revoke(&self, key_id: &str) -> Result<ApiKeyInfo> {
        let mut keys = self.keys.write();
        let record = keys
            .get_mut(key_id)
            .ok_or_else(|| AppError::NotFound("API key not found".to_string()))?;
        record.is_active = false;

        tracing::info!(key_id, agent_id = %record.agent_id, "Revoked API key");
        Ok(record.info())
    }

    /// Resolve a presented key to its agent and stamp its last use.
    pub fn authenticate(&self, key: &str) -> Result<AuthenticatedAgent> {
        let hash = hash_key(key);
        let mut keys = self.keys.write();
        let record = keys
            .values_mut()
            .find(|r| r.is_active && r.key_hash == hash)
            .ok_or_else(|| {
                let shown: String = key.chars().take(5).collect();
                tracing::warn!(key_prefix = %shown, "Invalid or inactive API key used");
                AppError::Auth("Invalid or inactive API key".to_string())
            })?;
        record.last_used_at = Some(Utc::now());

        Ok(AuthenticatedAgent {
            key_id: record.id.clone(),
            agent_id: record.agent_id.clone(),
            agent_name: record.agent_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_authenticate() {
        let registry = ApiKeyRegistry::new();
        let created = registry.create("agent-ext", "External", "testing").unwrap();

        assert_eq!(created.key.len(), KEY_BYTES * 2);
        assert!(created.key.starts_with(&created.info.key_prefix));

        let agent = registry.authenticate(&created.key).unwrap();
        assert_eq!(agent.agent_id, "agent-ext");
        assert!(registry.list()[0].last_used_at.is_some());
    }

    #[test]
    fn test_keys_are_stored_hashed() {
        let registry = ApiKeyRegistry::new();
        let created = registry.create("agent-ext", "External", "").unwrap();
        let keys = registry.keys.read();
        let record = keys.values().next().unwrap();

        assert_ne!(record.key_hash, created.key);
        assert_eq!(record.key_hash, hash_key(&created.key));
    }

    #[test]
    fn test_revoked_key_is_rejected() {
        let registry = ApiKeyRegistry::new();
        let created = registry.create("agent-ext", "External", "").unwrap();

        let info = registry.revoke(&created.info.id).unwrap();
        assert!(!info.is_active);
        assert!(matches!(
            registry.authenticate(&created.key),
            Err(AppError::Auth(_))
        ));
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn test_revoke_unknown_key() {
        let registry = ApiKeyRegistry::new();
        assert!(matches!(registry.revoke("nope"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_create_requires_agent() {
        let registry = ApiKeyRegistry::new();
        assert!(matches!(
            registry.create(" ", "External", ""),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_verify_admin() {
        assert!(verify_admin(Some("s3cret"), Some("s3cret")).is_ok());
        assert!(verify_admin(Some("s3cret"), Some("wrong")).is_err());
        assert!(verify_admin(Some("s3cret"), None).is_err());
        assert!(verify_admin(None, Some("anything")).is_err());
    }
}
