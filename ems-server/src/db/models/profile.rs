//! Profile Model
//!
//! Auth identity with role tag. Login resolves a profile by email; the
//! stored work id must match the one entered at login.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::Role;
use surrealdb::RecordId;

/// Profile ID type
pub type ProfileId = RecordId;

/// Profile model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProfileId>,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: Role,
    #[serde(default)]
    pub work_id: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    // Self-editable contact fields
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create profile payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCreate {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub work_id: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// Self-service contact field update (the only profile fields a user may edit)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileContactUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}

impl Profile {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Record id as "profile:xxx" string (empty for unsaved rows)
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = Profile::hash_password("s3cret-pass").unwrap();
        let profile = Profile {
            id: None,
            full_name: "Test".into(),
            email: "t@example.com".into(),
            hash_pass: hash,
            role: Role::Employee,
            work_id: None,
            department: None,
            phone: None,
            address: None,
            emergency_contact: None,
            is_active: true,
            created_at: 0,
        };
        assert!(profile.verify_password("s3cret-pass").unwrap());
        assert!(!profile.verify_password("wrong").unwrap());
    }
}
