// Study feedback endpoint: authenticate, normalize the survey payload,
// build the condition-specific prompt, and relay the model's reply.

pub mod auth;
pub mod handlers;
pub mod models;
pub mod payload;
pub mod prompts;
pub mod sanitize;
