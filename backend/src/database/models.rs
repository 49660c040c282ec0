//! Rust structs that represent stored drinks and their API representations.
//!
//! `Drink` serializes as the full ("long") representation. `DrinkSummary` is
//! the public ("short") one: it keeps the colours and proportions of a recipe
//! but drops the ingredient names.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePart {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drink {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeSummary {
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkSummary {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<RecipeSummary>,
}

impl Drink {
    pub fn short(&self) -> DrinkSummary {
        DrinkSummary {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|part| RecipeSummary {
                    color: part.color.clone(),
                    parts: part.parts,
                })
                .collect(),
        }
    }
}
