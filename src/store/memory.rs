//! In-memory user store.

use std::sync::Arc;
use tokio::sync::Mutex;
use log::{debug, info};

use crate::store::error::Error;
use crate::store::user::User;

/// A user store shared between request handlers.
///
/// One lock guards every operation, so concurrent requests are applied one
/// at a time.
pub type SharedUserStore = Arc<Mutex<UserStore>>;

/// An ordered, in-memory collection of users.
///
/// Ids are handed out from a counter that only ever increases, so an id is
/// never reused after its user is deleted. Records keep insertion order and
/// are looked up by linear scan.
#[derive(Debug, Clone)]
pub struct UserStore {
    users: Vec<User>,
    next_id: u64,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Create an empty store. The first user created gets id 1.
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a store holding the two demo users.
    pub fn with_seed_users() -> Self {
        Self::from_users(vec![
            User::new("John Doe", "john@example.com").with_id(1),
            User::new("Jane Smith", "jane@example.com").with_id(2),
        ])
    }

    /// Create a store from existing records, keeping their ids.
    ///
    /// The counter starts at the record count + 1, or past the largest
    /// existing id if that is higher.
    pub fn from_users(users: Vec<User>) -> Self {
        let max_id = users.iter().map(|u| u.id).max().unwrap_or(0);
        let next_id = (users.len() as u64).max(max_id) + 1;
        Self { users, next_id }
    }

    /// Wrap the store for sharing between handlers.
    pub fn into_shared(self) -> SharedUserStore {
        Arc::new(Mutex::new(self))
    }

    /// The id the next created user will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// All users, in insertion order.
    pub fn list(&self) -> &[User] {
        debug!("Mock SQL: SELECT * FROM users");
        &self.users
    }

    /// Look up a user by id.
    pub fn get(&self, id: u64) -> Result<&User, Error> {
        debug!("Mock SQL: SELECT * FROM users WHERE id = {id}");
        self.users
            .iter()
            .find(|u| u.id == id)
            .ok_or(Error::NotFound(id))
    }

    /// Store a new user and return it with its assigned id.
    ///
    /// Any id on `user` is discarded. Contents are not validated.
    pub fn create(&mut self, mut user: User) -> User {
        debug!(
            "Mock SQL: INSERT INTO users (name, email) VALUES ('{name}', '{email}')",
            name = user.name,
            email = user.email,
        );

        user.id = self.next_id;
        self.next_id += 1;
        self.users.push(user.clone());

        info!("User created with ID: {id}", id = user.id);
        user
    }

    /// Replace every field of user `id` with `data`, keeping the id.
    pub fn update(&mut self, id: u64, mut data: User) -> Result<User, Error> {
        debug!(
            "Mock SQL: UPDATE users SET name = '{name}', email = '{email}' WHERE id = {id}",
            name = data.name,
            email = data.email,
        );

        let slot = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(Error::NotFound(id))?;

        data.id = id;
        *slot = data.clone();

        info!("User with ID {id} updated successfully");
        Ok(data)
    }

    /// Remove user `id`, keeping the order of the others.
    pub fn delete(&mut self, id: u64) -> Result<(), Error> {
        debug!("Mock SQL: DELETE FROM users WHERE id = {id}");

        let index = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(Error::NotFound(id))?;
        self.users.remove(index);

        info!("User with ID {id} deleted successfully");
        Ok(())
    }
}
