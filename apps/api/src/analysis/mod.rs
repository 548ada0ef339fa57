// Resume analysis: one user action runs convert -> select prompt -> dispatch.
// All model calls go through llm_client via the Generator trait.

pub mod controller;
pub mod dispatcher;
pub mod form;
pub mod handlers;
pub mod prompts;
