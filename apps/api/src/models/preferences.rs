use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const MIN_CALORIES: u32 = 1000;
pub const MAX_CALORIES: u32 = 10000;
pub const MIN_MEALS_PER_DAY: u32 = 3;
pub const MAX_MEALS_PER_DAY: u32 = 5;
/// Longest plan a premium caller may request. Everyone else gets one day.
pub const MAX_PREMIUM_DAYS: u32 = 7;

/// Fitness goal selected on the preferences form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Goal {
    LoseWeight,
    #[default]
    MaintainWeight,
    GainMuscle,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::LoseWeight, Goal::MaintainWeight, Goal::GainMuscle];

    /// Wire value, identical to the serde representation.
    pub fn value(self) -> &'static str {
        match self {
            Goal::LoseWeight => "LOSE_WEIGHT",
            Goal::MaintainWeight => "MAINTAIN_WEIGHT",
            Goal::GainMuscle => "GAIN_MUSCLE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Goal::LoseWeight => "Lose Weight",
            Goal::MaintainWeight => "Maintain Weight",
            Goal::GainMuscle => "Gain Muscle",
        }
    }

    /// Phrase used inside prompts: "My primary goal is to {phrase}."
    pub fn phrase(self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose weight",
            Goal::MaintainWeight => "maintain my current weight",
            Goal::GainMuscle => "gain muscle",
        }
    }
}

/// A selectable value with its display label, served to form renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub value: &'static str,
    pub label: &'static str,
}

pub const DIETARY_RESTRICTION_OPTIONS: &[OptionEntry] = &[
    OptionEntry { value: "VEGETARIAN", label: "Vegetarian" },
    OptionEntry { value: "VEGAN", label: "Vegan" },
    OptionEntry { value: "GLUTEN_FREE", label: "Gluten-Free" },
    OptionEntry { value: "DAIRY_FREE", label: "Dairy-Free" },
    OptionEntry { value: "NUT_ALLERGY", label: "Nut Allergy" },
    OptionEntry { value: "PESCATARIAN", label: "Pescatarian" },
];

pub fn goal_options() -> Vec<OptionEntry> {
    Goal::ALL
        .iter()
        .map(|g| OptionEntry {
            value: g.value(),
            label: g.label(),
        })
        .collect()
}

/// Inputs collected from the preferences form.
///
/// Restrictions live in an ordered set: submission order does not matter,
/// duplicates collapse, and prompts render them in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub goal: Goal,
    pub calories: u32,
    pub meals_per_day: u32,
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<String>,
    pub days: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            goal: Goal::MaintainWeight,
            calories: 2000,
            meals_per_day: 3,
            dietary_restrictions: BTreeSet::new(),
            days: 1,
        }
    }
}

impl Preferences {
    /// Restriction tags joined with ", ", or `None` when there are none.
    pub fn restriction_list(&self) -> Option<String> {
        if self.dietary_restrictions.is_empty() {
            return None;
        }
        Some(
            self.dietary_restrictions
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// Checks the same bounds the form controls impose.
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_CALORIES..=MAX_CALORIES).contains(&self.calories) {
            return Err(format!(
                "calories must be between {MIN_CALORIES} and {MAX_CALORIES}, got {}",
                self.calories
            ));
        }
        if !(MIN_MEALS_PER_DAY..=MAX_MEALS_PER_DAY).contains(&self.meals_per_day) {
            return Err(format!(
                "mealsPerDay must be between {MIN_MEALS_PER_DAY} and {MAX_MEALS_PER_DAY}, got {}",
                self.meals_per_day
            ));
        }
        if !(1..=MAX_PREMIUM_DAYS).contains(&self.days) {
            return Err(format!(
                "days must be between 1 and {MAX_PREMIUM_DAYS}, got {}",
                self.days
            ));
        }
        if self.dietary_restrictions.iter().any(|r| r.trim().is_empty()) {
            return Err("dietaryRestrictions cannot contain blank tags".to_string());
        }
        Ok(())
    }

    /// Multi-day plans are a premium feature.
    pub fn check_tier(&self, premium: bool) -> Result<(), String> {
        if self.days > 1 && !premium {
            return Err(format!(
                "a {}-day plan requires a premium subscription; free plans cover 1 day",
                self.days
            ));
        }
        Ok(())
    }
}
