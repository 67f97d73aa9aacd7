//! User Repository

use async_trait::async_trait;
use shared::models::{User, UserCreate};
use shared::util::new_id;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, UidRow};
use crate::db::repository::{RepoError, RepoResult, UserDirectory};

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn find_by_uid(&self, id: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * OMIT id FROM users WHERE uid = $uid LIMIT 1")
            .bind(("uid", id.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * OMIT id FROM users")
            .await?
            .take(0)?;
        Ok(users)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * OMIT id FROM users WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    async fn find_role(&self, email: &str) -> RepoResult<Option<String>> {
        Ok(self.find_by_email(email).await?.and_then(|u| u.role))
    }

    async fn insert(&self, data: UserCreate) -> RepoResult<User> {
        // Check duplicate email
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                data.email
            )));
        }

        let user = User {
            id: new_id(),
            name: data.name,
            email: data.email,
            photo: data.photo,
            role: None,
        };
        self.base
            .db()
            .query(
                "CREATE type::thing('users', $uid) SET \
                 uid = $uid, name = $name, email = $email, photo = $photo \
                 RETURN NONE",
            )
            .bind(("uid", user.id.clone()))
            .bind(("name", user.name.clone()))
            .bind(("email", user.email.clone()))
            .bind(("photo", user.photo.clone()))
            .await?
            .check()?;
        Ok(user)
    }

    async fn set_role(&self, id: &str, role: &str) -> RepoResult<Option<User>> {
        self.base
            .db()
            .query("UPDATE users SET role = $role WHERE uid = $uid RETURN NONE")
            .bind(("uid", id.to_string()))
            .bind(("role", role.to_string()))
            .await?
            .check()?;
        self.find_by_uid(id).await
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("DELETE users WHERE uid = $uid RETURN BEFORE")
            .bind(("uid", id.to_string()))
            .await?;
        let removed: Vec<UidRow> = result.take(0)?;
        Ok(!removed.is_empty())
    }
}
