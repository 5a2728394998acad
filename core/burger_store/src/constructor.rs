//! # Constructor slice
//!
//! The burger under construction: one optional bun and an ordered list of
//! fillings. Entries refer to the catalog by [`IngredientId`]; each filling
//! also carries its own [`InstanceId`](crate::types::InstanceId), minted by
//! the action constructor so the reducer itself stays deterministic.

use serde::Serialize;

use crate::errors::ConstructorError;
use crate::store::Reducer;
use crate::types::{ConstructorItem, Ingredient, IngredientId, InstanceId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConstructorState {
    pub bun: Option<IngredientId>,
    pub fillings: Vec<ConstructorItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorAction {
    SetBun(IngredientId),
    AddFilling(ConstructorItem),
    RemoveFilling(InstanceId),
    MoveFilling { from: usize, to: usize },
    Clear,
}

impl ConstructorAction {
    pub fn set_bun(ingredient: &Ingredient) -> Self {
        Self::SetBun(ingredient.id.clone())
    }

    pub fn add_filling(ingredient: &Ingredient) -> Self {
        Self::AddFilling(ConstructorItem::new(ingredient.id.clone()))
    }

    /// Buns take the bun slot; everything else is appended as a filling.
    pub fn add_ingredient(ingredient: &Ingredient) -> Self {
        if ingredient.is_bun() {
            Self::set_bun(ingredient)
        } else {
            Self::add_filling(ingredient)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetBun(_) => "burgerConstructor/setBun",
            Self::AddFilling(_) => "burgerConstructor/addFilling",
            Self::RemoveFilling(_) => "burgerConstructor/removeFilling",
            Self::MoveFilling { .. } => "burgerConstructor/moveFilling",
            Self::Clear => "burgerConstructor/clear",
        }
    }
}

impl Reducer for ConstructorState {
    type Action = ConstructorAction;
    type Error = ConstructorError;

    fn reduce(&self, action: ConstructorAction) -> Result<Self, ConstructorError> {
        let mut next = self.clone();

        match action {
            ConstructorAction::SetBun(id) => next.bun = Some(id),
            ConstructorAction::AddFilling(item) => next.fillings.push(item),
            ConstructorAction::RemoveFilling(instance_id) => {
                next.fillings.retain(|item| item.instance_id != instance_id)
            }
            ConstructorAction::MoveFilling { from, to } => {
                let len = next.fillings.len();
                for index in [from, to] {
                    if index >= len {
                        return Err(ConstructorError::IndexOutOfBounds { index, len });
                    }
                }
                let item = next.fillings.remove(from);
                next.fillings.insert(to, item);
            }
            ConstructorAction::Clear => next = Self::default(),
        }

        Ok(next)
    }
}

impl ConstructorState {
    pub fn is_empty(&self) -> bool {
        self.bun.is_none() && self.fillings.is_empty()
    }

    /// Ingredient ids in submission order: bun, fillings, bun.
    ///
    /// Returns `None` while no bun is selected.
    pub fn ingredient_ids_for_order(&self) -> Option<Vec<IngredientId>> {
        let bun = self.bun.as_ref()?;
        let mut ids = Vec::with_capacity(self.fillings.len() + 2);
        ids.push(bun.clone());
        ids.extend(self.fillings.iter().map(|item| item.ingredient.clone()));
        ids.push(bun.clone());
        Some(ids)
    }

    /// How many times `id` appears in the burger; a bun counts twice.
    pub fn count_of(&self, id: &IngredientId) -> usize {
        let buns = if self.bun.as_ref() == Some(id) { 2 } else { 0 };
        buns + self
            .fillings
            .iter()
            .filter(|item| &item.ingredient == id)
            .count()
    }

    /// Price of the draft against `catalog`. Entries missing from the
    /// catalog contribute nothing.
    pub fn total_price(&self, catalog: &[Ingredient]) -> u32 {
        let price_of = |id: &IngredientId| {
            catalog
                .iter()
                .find(|ingredient| &ingredient.id == id)
                .map_or(0, |ingredient| ingredient.price)
        };

        let bun = self.bun.as_ref().map_or(0, |id| price_of(id) * 2);
        bun + self
            .fillings
            .iter()
            .map(|item| price_of(&item.ingredient))
            .sum::<u32>()
    }
}
