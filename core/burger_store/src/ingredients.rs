//! Ingredient catalog slice.
//!
//! A failed reload keeps the previously loaded catalog alongside the error.

use std::convert::Infallible;

use serde::Serialize;

use crate::lifecycle::Lifecycle;
use crate::store::Reducer;
use crate::types::{Ingredient, IngredientId, IngredientType};

pub const LOAD_INGREDIENTS_FAILED: &str = "загрузка ингредиентов не удалась";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngredientsState {
    pub ingredients: Vec<Ingredient>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientsAction {
    Load(Lifecycle<Vec<Ingredient>>),
}

impl IngredientsAction {
    pub fn kind(&self) -> &'static str {
        "ingredients/getAll"
    }

    pub fn phase(&self) -> &'static str {
        let Self::Load(lifecycle) = self;
        lifecycle.phase()
    }
}

impl Reducer for IngredientsState {
    type Action = IngredientsAction;
    type Error = Infallible;

    fn reduce(&self, action: IngredientsAction) -> Result<Self, Infallible> {
        let mut next = self.clone();

        let IngredientsAction::Load(lifecycle) = action;
        match lifecycle {
            Lifecycle::Pending => next.is_loading = true,
            Lifecycle::Fulfilled(ingredients) => {
                next.is_loading = false;
                next.ingredients = ingredients;
                next.error = None;
            }
            Lifecycle::Rejected(_) => {
                next.is_loading = false;
                next.error = Some(LOAD_INGREDIENTS_FAILED.to_string());
            }
        }

        Ok(next)
    }
}

impl IngredientsState {
    pub fn find(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.ingredients.iter().find(|ingredient| &ingredient.id == id)
    }

    pub fn of_type(&self, kind: IngredientType) -> impl Iterator<Item = &Ingredient> {
        self.ingredients
            .iter()
            .filter(move |ingredient| ingredient.kind == kind)
    }
}
