//! Swap-in-place: replaces one dish of a plan, copy-on-write.
//!
//! Day totals are deliberately NOT recalculated after a swap; they keep the
//! figures the model reported at generation time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::plan::{DailyPlan, Dish, MealPlan};

/// Zero-based position of a dish within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishCoordinate {
    pub day_index: usize,
    pub meal_index: usize,
    pub dish_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("dayIndex {index} is out of range (plan has {len} days)")]
    DayOutOfRange { index: usize, len: usize },

    #[error("mealIndex {index} is out of range (day has {len} meals)")]
    MealOutOfRange { index: usize, len: usize },

    #[error("dishIndex {index} is out of range (meal has {len} dishes)")]
    DishOutOfRange { index: usize, len: usize },
}

/// Resolves a coordinate to its day and dish.
pub fn locate(plan: &MealPlan, at: DishCoordinate) -> Result<(&DailyPlan, &Dish), SwapError> {
    let day = plan
        .daily_plans
        .get(at.day_index)
        .ok_or(SwapError::DayOutOfRange {
            index: at.day_index,
            len: plan.daily_plans.len(),
        })?;
    let meal = day.meals.get(at.meal_index).ok_or(SwapError::MealOutOfRange {
        index: at.meal_index,
        len: day.meals.len(),
    })?;
    let dish = meal.dishes.get(at.dish_index).ok_or(SwapError::DishOutOfRange {
        index: at.dish_index,
        len: meal.dishes.len(),
    })?;
    Ok((day, dish))
}

/// Returns a copy of `plan` with the dish at `at` replaced by `replacement`.
/// The input plan is never modified.
pub fn swap_dish(
    plan: &MealPlan,
    at: DishCoordinate,
    replacement: Dish,
) -> Result<MealPlan, SwapError> {
    locate(plan, at)?;

    let mut next = plan.clone();
    next.daily_plans[at.day_index].meals[at.meal_index].dishes[at.dish_index] = replacement;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::plan::fixtures::{dish, two_day_plan};

    const TARGET: DishCoordinate = DishCoordinate {
        day_index: 1,
        meal_index: 0,
        dish_index: 1,
    };

    #[test]
    fn test_swap_replaces_only_target_coordinate() {
        let before = two_day_plan();
        let replacement = dish("Avocado Toast", 320.0);

        let after = swap_dish(&before, TARGET, replacement.clone()).unwrap();

        for (d, day) in after.daily_plans.iter().enumerate() {
            for (m, meal) in day.meals.iter().enumerate() {
                for (i, dish) in meal.dishes.iter().enumerate() {
                    let at = DishCoordinate {
                        day_index: d,
                        meal_index: m,
                        dish_index: i,
                    };
                    if at == TARGET {
                        assert_eq!(dish, &replacement);
                    } else {
                        assert_eq!(dish, &before.daily_plans[d].meals[m].dishes[i]);
                    }
                }
            }
        }
        assert_eq!(after.plan_title, before.plan_title);
    }

    #[test]
    fn test_swap_keeps_daily_totals() {
        let before = two_day_plan();
        let after = swap_dish(&before, TARGET, dish("Avocado Toast", 320.0)).unwrap();

        assert_eq!(
            after.daily_plans[1].daily_totals,
            before.daily_plans[1].daily_totals
        );
        // The dishes now sum differently from the stale reported totals.
        assert_ne!(
            after.daily_plans[1].summed_totals(),
            after.daily_plans[1].daily_totals
        );
    }

    #[test]
    fn test_swap_leaves_input_untouched() {
        let before = two_day_plan();
        let snapshot = before.clone();
        let _ = swap_dish(&before, TARGET, dish("Avocado Toast", 320.0)).unwrap();
        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_swap_out_of_range() {
        let plan = two_day_plan();
        let bad_day = DishCoordinate {
            day_index: 2,
            ..TARGET
        };
        assert_eq!(
            swap_dish(&plan, bad_day, dish("X", 1.0)),
            Err(SwapError::DayOutOfRange { index: 2, len: 2 })
        );

        let bad_meal = DishCoordinate {
            meal_index: 5,
            ..TARGET
        };
        assert_eq!(
            locate(&plan, bad_meal).unwrap_err(),
            SwapError::MealOutOfRange { index: 5, len: 2 }
        );

        let bad_dish = DishCoordinate {
            dish_index: 2,
            ..TARGET
        };
        assert_eq!(
            locate(&plan, bad_dish).unwrap_err(),
            SwapError::DishOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn test_locate_returns_day_and_dish() {
        let plan = two_day_plan();
        let (day, dish) = locate(&plan, TARGET).unwrap();
        assert_eq!(day.day, 2);
        assert_eq!(dish.name, "Toast 2");
    }

    #[test]
    fn test_coordinate_deserializes_camel_case() {
        let at: DishCoordinate =
            serde_json::from_str(r#"{"dayIndex": 1, "mealIndex": 0, "dishIndex": 1}"#).unwrap();
        assert_eq!(at, TARGET);
    }
}
