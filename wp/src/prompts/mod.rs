//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for itinerary generation.
//!
//! Template loading chain:
//! 1. `<config_dir>/wayplan/prompts/{name}.pmt` (user override)
//! 2. `prompts/{name}.pmt` (project-local)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{PromptContext, PromptLoader};
