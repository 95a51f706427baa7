//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;
use crate::itinerary::TripRequest;

/// Context for rendering the itinerary template
///
/// List fields are pre-joined; the has_* booleans drive conditional lines
/// in the template.
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Destination display string
    pub destination: String,
    /// Trip length in days
    pub days: u32,
    /// Budget tier label
    pub budget: String,
    /// Traveler type label
    pub travelers: String,
    /// Pace label (relaxed / balanced / fast-paced)
    pub pace: String,
    /// Interests, ", "-joined
    pub interests: String,
    /// Dietary requirements, ", "-joined
    pub diet: String,
    pub has_interests: bool,
    pub has_diet: bool,
}

impl PromptContext {
    /// Build the render context from a trip request
    pub fn from_request(request: &TripRequest) -> Self {
        let interests = request
            .interests
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let diet = request.diet.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");

        Self {
            destination: request.destination_label(),
            days: request.days,
            budget: request.budget.to_string(),
            travelers: request.travelers.to_string(),
            pace: request.pace_label().to_string(),
            has_interests: !interests.is_empty(),
            has_diet: !diet.is_empty(),
            interests,
            diet,
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (`<config_dir>/wayplan/prompts/`)
    user_dir: Option<PathBuf>,
    /// Project-local directory (`prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at the given project directory
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        let project_root = project_root.as_ref();
        debug!(?project_root, "PromptLoader::new: called");

        let user_dir = dirs::config_dir().map(|p| p.join("wayplan").join("prompts"));
        let repo_dir = project_root.join("prompts");

        let mut hbs = Handlebars::new();
        // Prompts are plain text, not HTML
        hbs.register_escape_fn(handlebars::no_escape);

        Self {
            hbs,
            user_dir: user_dir.filter(|p| p.exists()),
            repo_dir: repo_dir.exists().then_some(repo_dir),
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        Self {
            hbs,
            user_dir: None,
            repo_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `<config_dir>/wayplan/prompts/{name}.pmt`
    /// 2. Project-local: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(ref repo_dir) = self.repo_dir {
            let path = repo_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found project-local prompt");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: using embedded");
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, destination = %context.destination, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the itinerary prompt for a trip request
    pub fn itinerary_prompt(&self, request: &TripRequest) -> Result<String> {
        self.render("itinerary", &PromptContext::from_request(request))
    }
}
