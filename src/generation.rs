use crate::error::GenerationError;
use crate::language::Language;
use crate::profiles::CredentialProfile;

/// Everything needed to ask the model for one PR title/description.
///
/// Only constructible through [`GenerationRequest::new`], so a request always
/// carries at least one commit and a complete profile.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    commit_messages: Vec<String>,
    page_url: Option<String>,
    author_username: Option<String>,
    output_language: Language,
    profile: CredentialProfile,
}

impl GenerationRequest {
    pub fn new(
        commit_messages: Vec<String>,
        page_url: Option<String>,
        author_username: Option<String>,
        output_language: Language,
        profile: CredentialProfile,
    ) -> Result<Self, GenerationError> {
        if !profile.is_valid() {
            return Err(GenerationError::ConfigInvalid);
        }
        if commit_messages.is_empty() {
            return Err(GenerationError::NoCommitsFound);
        }

        Ok(GenerationRequest {
            commit_messages,
            page_url: page_url.filter(|u| !u.trim().is_empty()),
            author_username: author_username.filter(|u| !u.trim().is_empty()),
            output_language,
            profile,
        })
    }

    pub fn commit_messages(&self) -> &[String] {
        &self.commit_messages
    }

    pub fn page_url(&self) -> Option<&str> {
        self.page_url.as_deref()
    }

    pub fn author_username(&self) -> Option<&str> {
        self.author_username.as_deref()
    }

    pub fn output_language(&self) -> Language {
        self.output_language
    }

    pub fn profile(&self) -> &CredentialProfile {
        &self.profile
    }
}

/// A generated PR title plus Markdown description. Both are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_profile() -> CredentialProfile {
        let mut p = CredentialProfile::new("test");
        p.api_key = "sk-test".into();
        p
    }

    #[test]
    fn rejects_invalid_profile_before_checking_commits() {
        let err = GenerationRequest::new(
            vec![],
            None,
            None,
            Language::En,
            CredentialProfile::new("no key"),
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::ConfigInvalid));
    }

    #[test]
    fn rejects_empty_commit_list() {
        let err = GenerationRequest::new(vec![], None, None, Language::En, valid_profile())
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoCommitsFound));
    }

    #[test]
    fn blank_optionals_are_dropped() {
        let req = GenerationRequest::new(
            vec!["fix".into()],
            Some("  ".into()),
            Some(String::new()),
            Language::Ja,
            valid_profile(),
        )
        .unwrap();
        assert_eq!(req.page_url(), None);
        assert_eq!(req.author_username(), None);
        assert_eq!(req.output_language(), Language::Ja);
    }
}
