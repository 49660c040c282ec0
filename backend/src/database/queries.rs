//! Drink store query functions.
//!
//! This module centralizes all operations on the drink table so that handlers
//! never touch the underlying map directly.

use super::models::{Drink, RecipePart};
use super::{DrinkStore, StoreError, Tables};

impl Tables {
    fn title_taken(&self, title: &str, except: Option<u64>) -> bool {
        self.drinks
            .values()
            .any(|drink| drink.title == title && Some(drink.id) != except)
    }
}

impl DrinkStore {
    pub async fn list(&self) -> Vec<Drink> {
        self.inner.read().await.drinks.values().cloned().collect()
    }

    pub async fn get(&self, id: u64) -> Result<Drink, StoreError> {
        self.inner
            .read()
            .await
            .drinks
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn insert(&self, title: String, recipe: Vec<RecipePart>) -> Result<Drink, StoreError> {
        let mut tables = self.inner.write().await;
        if tables.title_taken(&title, None) {
            return Err(StoreError::DuplicateTitle(title));
        }

        tables.last_id += 1;
        let drink = Drink {
            id: tables.last_id,
            title,
            recipe,
        };
        tables.drinks.insert(drink.id, drink.clone());
        Ok(drink)
    }

    /// Renames a drink and, when `recipe` is given, replaces its recipe.
    pub async fn update(
        &self,
        id: u64,
        title: String,
        recipe: Option<Vec<RecipePart>>,
    ) -> Result<Drink, StoreError> {
        let mut tables = self.inner.write().await;
        if !tables.drinks.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if tables.title_taken(&title, Some(id)) {
            return Err(StoreError::DuplicateTitle(title));
        }

        let drink = tables.drinks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        drink.title = title;
        if let Some(recipe) = recipe {
            drink.recipe = recipe;
        }
        Ok(drink.clone())
    }

    pub async fn delete(&self, id: u64) -> Result<Drink, StoreError> {
        self.inner
            .write()
            .await
            .drinks
            .remove(&id)
            .ok_or(StoreError::NotFound(id))
    }
}
