// Prompt refinement: naive prompt + selected filter answers → refined prompt.

pub mod handlers;
pub mod prompts;
pub mod refiner;
