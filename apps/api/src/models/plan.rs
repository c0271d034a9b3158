use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use super::{ShapeError, Validate};

/// A single named food item with its nutrition figures.
///
/// Dishes have no identity beyond `name`; exclusion checks compare names
/// exactly (case-sensitive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Dish {
    pub name: String,
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Dish {
    pub fn nutrition(&self) -> NutritionTotals {
        NutritionTotals {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionTotals {
    /// First field that is negative or not finite, if any.
    fn invalid_field(&self) -> Option<&'static str> {
        [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite() || *v < 0.0)
        .map(|(field, _)| field)
    }
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.calories += rhs.calories;
        self.protein += rhs.protein;
        self.carbs += rhs.carbs;
        self.fat += rhs.fat;
    }
}

/// A labelled group of dishes, e.g. "Breakfast".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Meal {
    pub name: String,
    pub dishes: Vec<Dish>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DailyPlan {
    pub day: u32,
    pub meals: Vec<Meal>,
    /// As reported by the model. Not guaranteed to match `summed_totals()`,
    /// and left untouched when a dish is swapped.
    pub daily_totals: NutritionTotals,
}

impl DailyPlan {
    /// Sum of every dish's figures across all meals of the day.
    pub fn summed_totals(&self) -> NutritionTotals {
        let mut totals = NutritionTotals::default();
        for dish in self.dishes() {
            totals += dish.nutrition();
        }
        totals
    }

    pub fn dishes(&self) -> impl Iterator<Item = &Dish> {
        self.meals.iter().flat_map(|m| m.dishes.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MealPlan {
    pub plan_title: String,
    pub daily_plans: Vec<DailyPlan>,
}

impl Validate for Dish {
    fn validate(&self) -> Result<(), ShapeError> {
        if self.name.trim().is_empty() {
            return Err(ShapeError::UnnamedDish);
        }
        match self.nutrition().invalid_field() {
            Some(field) => Err(ShapeError::InvalidFigure {
                dish: self.name.clone(),
                field,
            }),
            None => Ok(()),
        }
    }
}

impl Validate for DailyPlan {
    fn validate(&self) -> Result<(), ShapeError> {
        if self.day == 0 {
            return Err(ShapeError::InvalidDay(self.day));
        }
        for meal in &self.meals {
            if meal.dishes.is_empty() {
                return Err(ShapeError::EmptyMeal {
                    day: self.day,
                    meal: meal.name.clone(),
                });
            }
            meal.dishes.validate()?;
        }
        if let Some(field) = self.daily_totals.invalid_field() {
            return Err(ShapeError::InvalidTotal {
                day: self.day,
                field,
            });
        }
        Ok(())
    }
}

impl Validate for MealPlan {
    fn validate(&self) -> Result<(), ShapeError> {
        self.daily_plans.validate()
    }
}
