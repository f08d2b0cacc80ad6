use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub display_name: String,
    pub email: String,
}

impl User {
    pub fn new(id: String, display_name: String, email: String) -> Self {
        Self { id, created_at: Utc::now(), display_name, email }
    }
}

pub type UserList = HashMap<String, User>;

/// The whole persisted document: id counter plus every record keyed by id.
///
/// Every key in `list` equals its record's `id`, and `increment` is never
/// below the numeric value of an issued id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStore {
    #[serde(default)]
    pub increment: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub list: UserList,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<UserList, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<UserList>::deserialize(deserializer)?.unwrap_or_default())
}

impl UserStore {
    /// Bump the counter and hand out its decimal form as the next id.
    ///
    /// Ids are never reused; if the caller drops the id before saving,
    /// the counter value is simply skipped. A counter already at `u64::MAX`
    /// has no next id and is left unchanged.
    pub fn allocate_id(&mut self) -> Result<String, ModelError> {
        self.increment = self
            .increment
            .checked_add(1)
            .ok_or(ModelError::CounterExhausted(self.increment))?;
        Ok(self.increment.to_string())
    }

    pub fn lookup(&self, id: &str) -> Result<&User, ModelError> {
        self.list.get(id).ok_or_else(|| ModelError::NotFound(id.to_string()))
    }

    /// Insert or overwrite the record under its own id.
    pub fn put(&mut self, user: User) {
        self.list.insert(user.id.clone(), user);
    }

    /// Allocate an id and insert a fresh record for it.
    pub fn create(&mut self, display_name: String, email: String) -> Result<&User, ModelError> {
        let id = self.allocate_id()?;
        self.list.insert(id.clone(), User::new(id.clone(), display_name, email));
        Ok(&self.list[&id])
    }

    /// Remove a record; an absent id is not an error.
    pub fn remove(&mut self, id: &str) -> Option<User> {
        self.list.remove(id)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
