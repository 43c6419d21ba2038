use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::storage::{KeyValueStore, LEGACY_CONFIG_KEY, PROFILES_KEY, StorageError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_PROFILE_NAME: &str = "Default";

/// One named set of endpoint credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialProfile {
    pub id: String,
    pub name: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub model: String,
}

impl CredentialProfile {
    /// A fresh profile pointing at OpenAI with no key yet.
    pub fn new(name: impl Into<String>) -> Self {
        CredentialProfile {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty() && !self.model.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot delete the last remaining profile")]
    CannotDeleteLast,

    #[error("no profile with id or name '{0}'")]
    NotFound(String),

    #[error("stored profiles are unreadable: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// All profiles plus the id of the active one.
///
/// `active_profile_id` is `None` only while `profiles` is empty, and otherwise
/// always names a member of `profiles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStore {
    #[serde(default)]
    profiles: Vec<CredentialProfile>,
    #[serde(default)]
    active_profile_id: Option<String>,
}

impl ProfileStore {
    /// Store holding a single active default profile.
    pub fn seeded() -> Self {
        let mut store = ProfileStore::default();
        store.create_profile(DEFAULT_PROFILE_NAME);
        store
    }

    pub fn profiles(&self) -> &[CredentialProfile] {
        &self.profiles
    }

    pub fn active_profile_id(&self) -> Option<&str> {
        self.active_profile_id.as_deref()
    }

    pub fn active_profile(&self) -> Option<&CredentialProfile> {
        let id = self.active_profile_id.as_deref()?;
        self.get(id)
    }

    pub fn get(&self, id: &str) -> Option<&CredentialProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Look a profile up by exact id, then by exact name.
    pub fn resolve(&self, id_or_name: &str) -> Option<&CredentialProfile> {
        self.get(id_or_name)
            .or_else(|| self.profiles.iter().find(|p| p.name == id_or_name))
    }

    pub fn create_profile(&mut self, seed_name: &str) -> CredentialProfile {
        let profile = CredentialProfile::new(seed_name);
        self.profiles.push(profile.clone());
        if self.active_profile_id.is_none() {
            self.active_profile_id = Some(profile.id.clone());
        }
        profile
    }

    /// Replace the profile with the same id. Unknown ids are ignored.
    pub fn update_profile(&mut self, profile: CredentialProfile) {
        match self.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(slot) => *slot = profile,
            None => log::debug!("update_profile: no profile with id {}", profile.id),
        }
    }

    pub fn delete_profile(&mut self, id: &str) -> Result<(), ProfileError> {
        if self.profiles.len() <= 1 {
            return Err(ProfileError::CannotDeleteLast);
        }

        let before = self.profiles.len();
        self.profiles.retain(|p| p.id != id);
        if self.profiles.len() == before {
            log::debug!("delete_profile: no profile with id {id}");
            return Ok(());
        }

        if self.active_profile_id.as_deref() == Some(id) {
            self.active_profile_id = self.profiles.first().map(|p| p.id.clone());
        }
        Ok(())
    }

    /// Make `id` active. Unknown ids leave the store untouched.
    pub fn set_active_profile(&mut self, id: &str) {
        if self.get(id).is_some() {
            self.active_profile_id = Some(id.to_string());
        } else {
            log::debug!("set_active_profile: no profile with id {id}");
        }
    }

    /// Restore the active-id invariant after reading untrusted data.
    fn repair(&mut self) {
        let dangling = match self.active_profile_id.as_deref() {
            Some(id) => self.get(id).is_none(),
            None => true,
        };
        if dangling {
            self.active_profile_id = self.profiles.first().map(|p| p.id.clone());
        }
    }

    /// Read the store, seeding a default profile when none exist yet.
    pub fn load(kv: &dyn KeyValueStore) -> Result<Self, ProfileError> {
        if let Some(value) = kv.get(PROFILES_KEY)? {
            let mut store: ProfileStore =
                serde_json::from_value(value).map_err(ProfileError::Decode)?;
            if !store.profiles.is_empty() {
                store.repair();
                return Ok(store);
            }
        }

        let mut store = ProfileStore::seeded();
        if let Some(legacy) = kv.get(LEGACY_CONFIG_KEY)? {
            log::info!("Migrating legacy API config into the default profile");
            if let Some(profile) = store.profiles.first_mut() {
                apply_legacy(profile, &legacy);
            }
        }
        Ok(store)
    }

    pub fn save(&self, kv: &mut dyn KeyValueStore) -> Result<(), ProfileError> {
        let value = serde_json::to_value(self).map_err(|source| StorageError::Encode {
            key: PROFILES_KEY.into(),
            source,
        })?;
        kv.set(PROFILES_KEY, value)?;
        Ok(())
    }
}

/// Overlay non-empty legacy fields onto a default profile.
fn apply_legacy(profile: &mut CredentialProfile, legacy: &Value) {
    let field = |name: &str| {
        legacy
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(base_url) = field("baseURL") {
        profile.base_url = base_url;
    }
    if let Some(api_key) = field("apiKey") {
        profile.api_key = api_key;
    }
    if let Some(model) = field("model") {
        profile.model = model;
    }
}
