//! Response schemas declared to Gemini's structured-output mode.
//!
//! These use the OpenAPI subset Gemini accepts (`type` names in upper case).
//! Field names must stay in sync with the serde names in `models::plan`.

use serde_json::{json, Value};

fn nutrition_properties() -> Value {
    json!({
        "calories": { "type": "NUMBER" },
        "protein": { "type": "NUMBER" },
        "carbs": { "type": "NUMBER" },
        "fat": { "type": "NUMBER" }
    })
}

/// A single dish: name, description and four nutrition figures, all required.
pub fn dish_schema() -> Value {
    let mut properties = nutrition_properties();
    properties["name"] = json!({ "type": "STRING" });
    properties["description"] = json!({ "type": "STRING" });

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": ["name", "description", "calories", "protein", "carbs", "fat"]
    })
}

/// Search results: an array of dishes.
pub fn dish_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": dish_schema()
    })
}

/// Full plan: title plus day-by-day meals and totals, every field required.
pub fn meal_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "planTitle": { "type": "STRING" },
            "dailyPlans": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "INTEGER" },
                        "meals": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "name": { "type": "STRING" },
                                    "dishes": { "type": "ARRAY", "items": dish_schema() }
                                },
                                "required": ["name", "dishes"]
                            }
                        },
                        "dailyTotals": {
                            "type": "OBJECT",
                            "properties": nutrition_properties(),
                            "required": ["calories", "protein", "carbs", "fat"]
                        }
                    },
                    "required": ["day", "meals", "dailyTotals"]
                }
            }
        },
        "required": ["planTitle", "dailyPlans"]
    })
}
