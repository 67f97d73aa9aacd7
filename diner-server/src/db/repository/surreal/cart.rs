//! Cart Repository

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use shared::models::{CartLine, CartLineCreate};
use shared::util::new_id;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, UidRow};
use crate::db::repository::{CartStore, RepoError, RepoResult};

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl CartStore for CartRepository {
    async fn find_all(&self) -> RepoResult<Vec<CartLine>> {
        let lines: Vec<CartLine> = self
            .base
            .db()
            .query("SELECT * OMIT id FROM cart")
            .await?
            .take(0)?;
        Ok(lines)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Vec<CartLine>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * OMIT id FROM cart WHERE email = $email")
            .bind(("email", email.to_string()))
            .await?;
        let lines: Vec<CartLine> = result.take(0)?;
        Ok(lines)
    }

    async fn insert(&self, line: CartLineCreate) -> RepoResult<CartLine> {
        let price = line
            .price
            .to_f64()
            .ok_or_else(|| RepoError::Validation(format!("Invalid price {}", line.price)))?;
        let line = CartLine {
            id: new_id(),
            user_email: line.user_email,
            menu_item_id: line.menu_item_id,
            name: line.name,
            image: line.image,
            price: line.price,
            quantity: line.quantity,
        };
        self.base
            .db()
            .query(
                "CREATE type::thing('cart', $uid) SET \
                 uid = $uid, email = $email, menuItemId = $menu_item_id, name = $name, \
                 image = $image, price = $price, quantity = $quantity \
                 RETURN NONE",
            )
            .bind(("uid", line.id.clone()))
            .bind(("email", line.user_email.clone()))
            .bind(("menu_item_id", line.menu_item_id.clone()))
            .bind(("name", line.name.clone()))
            .bind(("image", line.image.clone()))
            .bind(("price", price))
            .bind(("quantity", line.quantity))
            .await?
            .check()?;
        Ok(line)
    }

    async fn delete_owned(&self, id: &str, email: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("DELETE cart WHERE uid = $uid AND email = $email RETURN BEFORE")
            .bind(("uid", id.to_string()))
            .bind(("email", email.to_string()))
            .await?;
        let removed: Vec<UidRow> = result.take(0)?;
        Ok(!removed.is_empty())
    }
}
