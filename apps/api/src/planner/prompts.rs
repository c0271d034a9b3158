//! Prompt Builder: renders preferences (and swap/search context) into the
//! natural-language instruction sent alongside each response schema.
//!
//! Every function here is pure: identical inputs give identical strings.

use crate::llm_client::prompts::{ARRAY_SCHEMA_INSTRUCTION, OBJECT_SCHEMA_INSTRUCTION};
use crate::models::plan::Dish;
use crate::models::preferences::Preferences;

/// Number of candidate dishes requested by a search.
pub const SEARCH_RESULT_COUNT: usize = 3;

/// Plan prompt template.
/// Replace: {goal}, {calories}, {meals_per_day}, {days}, {schema_instruction}, {restrictions}
const PLAN_PROMPT_TEMPLATE: &str = "Create a personalized meal plan for me.
My primary goal is to {goal}.
I want to consume approximately {calories} calories per day.
Please structure the plan for {meals_per_day} meals per day.
The plan should cover {days} day(s).{restrictions}

For each day, provide a list of meals (e.g., Breakfast, Lunch, Dinner).
For each meal, list the dishes.
For each dish, provide a short description and its nutritional information (calories, protein, carbs, fat).
Also calculate and provide the total nutritional values for each day. Each day's total calories should be close to {calories}.
Give the entire plan a creative and motivating title.
{schema_instruction}";

/// Alternative dish prompt template.
/// Replace: {goal}, {calories}, {dish_calories}, {schema_instruction}, {exclusions},
///          {restrictions}, {dish_name}
const ALTERNATIVE_PROMPT_TEMPLATE: &str = "Suggest an alternative dish for \"{dish_name}\".
My goal is to {goal} and my daily calorie target is around {calories} calories.
The original dish has {dish_calories} calories. The alternative should have a similar calorie count.
My dietary restrictions are: {restrictions}.
The new dish must not be \"{dish_name}\".{exclusions}
Please provide the name, a short description, and nutritional information (calories, protein, carbs, fat) for the new dish.
{schema_instruction}";

/// Search prompt template.
/// Replace: {count}, {schema_instruction}, {restrictions}, {query}
const SEARCH_PROMPT_TEMPLATE: &str = "Find {count} recipes that match the search term: \"{query}\".{restrictions}
For each recipe, provide a name, a short description, and its estimated nutritional information (calories, protein, carbs, fat).
Return exactly {count} recipes.
{schema_instruction}";

const EXCLUSION_PREFIX: &str = "The new dish must NOT be any of the following: ";

/// Fills `{name}` placeholders in a single left-to-right pass. Substituted
/// values are copied through as-is, so braces inside user text survive.
/// Unknown placeholders are left in place.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = tail.find('}').and_then(|close| {
            let key = &tail[1..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match hit {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Builds the full-plan prompt.
///
/// The restriction clause is present only when at least one restriction is set.
pub fn build_plan_prompt(preferences: &Preferences) -> String {
    let restrictions = preferences
        .restriction_list()
        .map(|list| format!("\nRespect the following dietary restrictions: {list}."))
        .unwrap_or_default();

    fill_template(
        PLAN_PROMPT_TEMPLATE,
        &[
            ("goal", preferences.goal.phrase()),
            ("calories", preferences.calories.to_string().as_str()),
            ("meals_per_day", preferences.meals_per_day.to_string().as_str()),
            ("days", preferences.days.to_string().as_str()),
            ("schema_instruction", OBJECT_SCHEMA_INSTRUCTION),
            ("restrictions", restrictions.as_str()),
        ],
    )
}

/// Names the model must avoid: every context dish except the one being
/// replaced, first occurrence order, duplicates removed.
pub fn exclusion_names<'a>(context: &'a [Dish], dish_to_replace: &Dish) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for dish in context {
        if dish.name != dish_to_replace.name && !names.contains(&dish.name.as_str()) {
            names.push(&dish.name);
        }
    }
    names
}

/// Builds the swap prompt for `dish_to_replace`, given the other dishes of its day.
pub fn build_alternative_dish_prompt(
    preferences: &Preferences,
    context: &[Dish],
    dish_to_replace: &Dish,
) -> String {
    let restrictions = preferences
        .restriction_list()
        .unwrap_or_else(|| "No specific dietary restrictions".to_string());

    let excluded = exclusion_names(context, dish_to_replace);
    let exclusions = if excluded.is_empty() {
        String::new()
    } else {
        format!("\n{EXCLUSION_PREFIX}{}.", excluded.join(", "))
    };

    fill_template(
        ALTERNATIVE_PROMPT_TEMPLATE,
        &[
            ("goal", preferences.goal.phrase()),
            ("calories", preferences.calories.to_string().as_str()),
            ("dish_calories", dish_to_replace.calories.to_string().as_str()),
            ("schema_instruction", OBJECT_SCHEMA_INSTRUCTION),
            ("exclusions", exclusions.as_str()),
            ("restrictions", restrictions.as_str()),
            ("dish_name", dish_to_replace.name.as_str()),
        ],
    )
}

/// Builds the recipe search prompt. The query is embedded verbatim.
pub fn build_search_prompt(preferences: &Preferences, query: &str) -> String {
    let restrictions = preferences
        .restriction_list()
        .map(|list| format!("\nRespect these dietary restrictions: {list}."))
        .unwrap_or_default();

    fill_template(
        SEARCH_PROMPT_TEMPLATE,
        &[
            ("count", SEARCH_RESULT_COUNT.to_string().as_str()),
            ("schema_instruction", ARRAY_SCHEMA_INSTRUCTION),
            ("restrictions", restrictions.as_str()),
            ("query", query),
        ],
    )
}
