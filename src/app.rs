use crate::error::GenerationError;
use crate::generation::{GenerationRequest, GenerationResult};
use crate::i18n::Texts;
use crate::language::Language;
use crate::llm::LlmClient;
use crate::llm::prompt_builder;
use crate::page::{PageCollaborator, is_compare_page};
use crate::profiles::CredentialProfile;

/// What the result slot shows: a generated PR or a localized error in its place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrDetails {
    pub title: String,
    pub description: String,
    /// Set when the slot holds a localized error pair instead of a PR.
    pub failed: bool,
}

impl From<GenerationResult> for PrDetails {
    fn from(result: GenerationResult) -> Self {
        PrDetails {
            title: result.title,
            description: result.description,
            failed: false,
        }
    }
}

/// Everything the UI renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub current_url: String,
    pub is_pr_page: bool,
    pub config_valid: bool,
    pub selected_language: Language,
    pub show_settings: bool,
    pub is_loading: bool,
    pub is_generated: bool,
    pub pr_details: PrDetails,
}

#[derive(Debug, Clone)]
pub enum Event {
    TabChecked { url: String },
    ConfigChecked { valid: bool },
    LanguageSelected(Language),
    /// The `profile` and `language` commands; the panel closes when the process exits.
    SettingsOpened,
    GenerationStarted,
    GenerationFinished(PrDetails),
}

impl AppState {
    pub fn new(selected_language: Language) -> Self {
        AppState {
            selected_language,
            ..Default::default()
        }
    }

    pub fn update(self, event: Event) -> AppState {
        match event {
            Event::TabChecked { url } => AppState {
                is_pr_page: is_compare_page(&url),
                current_url: url,
                ..self
            },
            Event::ConfigChecked { valid } => AppState {
                config_valid: valid,
                ..self
            },
            Event::LanguageSelected(selected_language) => AppState {
                selected_language,
                ..self
            },
            Event::SettingsOpened => AppState {
                show_settings: true,
                ..self
            },
            Event::GenerationStarted if self.is_loading => {
                log::debug!("Ignoring generate request while one is in flight");
                self
            }
            Event::GenerationStarted => AppState {
                is_loading: true,
                ..self
            },
            Event::GenerationFinished(pr_details) => AppState {
                is_loading: false,
                is_generated: true,
                pr_details,
                ..self
            },
        }
    }
}

/// Run one generation attempt.
///
/// Order: profile check, commit fetch, username fetch, model call, form
/// write-back. The client is only built once the profile has been validated.
pub fn generate_pr<F>(
    profile: &CredentialProfile,
    page: &mut dyn PageCollaborator,
    page_url: Option<&str>,
    language: Language,
    connect: F,
) -> Result<GenerationResult, GenerationError>
where
    F: FnOnce(&CredentialProfile) -> Result<Box<dyn LlmClient>, GenerationError>,
{
    if !profile.is_valid() {
        return Err(GenerationError::ConfigInvalid);
    }

    let commits = page
        .fetch_commit_messages()
        .map_err(|e| GenerationError::Page(format!("{e:#}")))?;
    if commits.is_empty() {
        return Err(GenerationError::NoCommitsFound);
    }
    log::info!("Found {} commit(s)", commits.len());

    let username = page.fetch_username().unwrap_or_else(|e| {
        log::warn!("Could not determine author: {e:#}");
        None
    });

    let request = GenerationRequest::new(
        commits,
        page_url.map(str::to_string),
        username,
        language,
        profile.clone(),
    )?;
    let prompts = prompt_builder::pr_prompt(&request);

    let client = connect(request.profile())?;
    let result = client.generate_pr(&prompts)?;

    if let Err(e) = page.fill_form(&result.title, &result.description) {
        log::warn!("Could not fill the PR form: {e:#}");
    }

    Ok(result)
}

/// The top-level generate handler: every failure becomes displayable details.
pub fn generate_pr_details<F>(
    profile: &CredentialProfile,
    page: &mut dyn PageCollaborator,
    page_url: Option<&str>,
    language: Language,
    texts: &Texts,
    connect: F,
) -> PrDetails
where
    F: FnOnce(&CredentialProfile) -> Result<Box<dyn LlmClient>, GenerationError>,
{
    match generate_pr(profile, page, page_url, language, connect) {
        Ok(result) => result.into(),
        Err(err) => {
            log::error!("Error generating PR: {err}");
            error_details(&err, texts)
        }
    }
}

pub fn error_details(err: &GenerationError, texts: &Texts) -> PrDetails {
    match err {
        GenerationError::ConfigInvalid => PrDetails {
            title: texts.config_error.to_string(),
            description: texts.config_error_desc.to_string(),
            failed: true,
        },
        GenerationError::NoCommitsFound => PrDetails {
            title: texts.cannot_generate.to_string(),
            description: texts.no_commits.to_string(),
            failed: true,
        },
        other => PrDetails {
            title: texts.generation_failed.to_string(),
            description: format!(
                "{}: {}\n\n{}",
                texts.error_occurred, other, texts.check_api_config
            ),
            failed: true,
        },
    }
}
