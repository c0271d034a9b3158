pub mod plan;
pub mod preferences;

use thiserror::Error;

/// Semantic problems found in a model response that parsed as JSON but does
/// not describe a usable plan or dish.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("dish '{dish}' has a negative or non-finite {field}")]
    InvalidFigure { dish: String, field: &'static str },

    #[error("daily totals for day {day} have a negative or non-finite {field}")]
    InvalidTotal { day: u32, field: &'static str },

    #[error("meal '{meal}' on day {day} has no dishes")]
    EmptyMeal { day: u32, meal: String },

    #[error("day numbers must start at 1, got {0}")]
    InvalidDay(u32),

    #[error("dish name must not be empty")]
    UnnamedDish,
}

/// Post-parse validation applied to every typed response before it is returned.
pub trait Validate {
    fn validate(&self) -> Result<(), ShapeError>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ShapeError> {
        self.iter().try_for_each(Validate::validate)
    }
}
