use chrono::Utc;
use tracing::info;

use hunt_types::models::User;

use crate::error::{HuntError, HuntResult};
use crate::store::{Persistence, StoreError};

const MAX_NAME_LEN: usize = 50;

pub struct UserService<'a> {
    store: &'a dyn Persistence,
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a dyn Persistence) -> Self {
        Self { store }
    }

    /// `id` is minted by the caller; it is stored as given.
    pub fn register(&self, id: &str, name: &str) -> HuntResult<User> {
        let name = validate_username(name)?;

        if self.store.find_user_by_name(name)?.is_some() {
            return Err(name_taken());
        }

        let user = match self.store.create_user(id, name, Utc::now()) {
            Ok(user) => user,
            Err(StoreError::Duplicate(_)) => return Err(name_taken()),
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.id, username = %user.name, "User registered");
        Ok(user)
    }

    pub fn profile(&self, id: &str) -> HuntResult<User> {
        self.store.find_user_by_id(id)?.ok_or_else(user_not_found)
    }

    pub fn rename(&self, id: &str, name: &str) -> HuntResult<User> {
        let name = validate_username(name)?;

        let current = self.profile(id)?;
        if current.name == name {
            return Ok(current);
        }

        if self
            .store
            .find_user_by_name(name)?
            .is_some_and(|other| other.id != id)
        {
            return Err(name_taken());
        }

        match self.store.rename_user(id, name) {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(user_not_found()),
            Err(StoreError::Duplicate(_)) => Err(name_taken()),
            Err(e) => Err(e.into()),
        }
    }

    /// True when a user with this id exists.
    pub fn exists(&self, id: &str) -> HuntResult<bool> {
        Ok(self.store.find_user_by_id(id)?.is_some())
    }
}

/// Names are 1 to 50 characters of ASCII letters, digits, `-` and `_`,
/// after trimming surrounding whitespace.
pub fn validate_username(name: &str) -> HuntResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HuntError::Validation("Username is required".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(HuntError::Validation(format!(
            "Username must be {} characters or less",
            MAX_NAME_LEN
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(HuntError::Validation(
            "Username can only contain letters, numbers, hyphens, and underscores".to_string(),
        ));
    }
    Ok(name)
}

fn name_taken() -> HuntError {
    HuntError::Conflict("This username is already registered".to_string())
}

fn user_not_found() -> HuntError {
    HuntError::NotFound("User not found".to_string())
}
