use crate::generation::GenerationRequest;
use crate::llm::prompts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

pub fn pr_prompt(request: &GenerationRequest) -> PromptPair {
    let mut system = String::from(request.output_language().prompt_directive());
    system.push('\n');
    system.push_str(prompts::PR_INSTRUCTIONS);

    let mut user = String::new();
    user.push_str(prompts::PR_USER_HEADER);
    user.push_str("\n\nCommits:\n");
    user.push_str(&render_commit_list(request.commit_messages()));

    let mut context = String::new();
    if let Some(username) = request.author_username() {
        context.push_str(&format!("Author: {username}\n"));
    }
    if let Some(url) = request.page_url() {
        context.push_str(&format!("URL: {url}\n"));
    }
    if !context.is_empty() {
        user.push('\n');
        user.push_str(&context);
    }

    user.push('\n');
    user.push_str(prompts::PR_JSON_CONTRACT);

    PromptPair { system, user }
}

/// 1-based numbered list, one commit per line, input order, text as given.
fn render_commit_list(commits: &[String]) -> String {
    let mut out = String::new();
    for (idx, commit) in commits.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", idx + 1, commit));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::profiles::CredentialProfile;

    fn request(
        commits: &[&str],
        url: Option<&str>,
        username: Option<&str>,
        lang: Language,
    ) -> GenerationRequest {
        let mut profile = CredentialProfile::new("t");
        profile.api_key = "sk".into();
        GenerationRequest::new(
            commits.iter().map(|c| c.to_string()).collect(),
            url.map(str::to_string),
            username.map(str::to_string),
            lang,
            profile,
        )
        .unwrap()
    }

    #[test]
    fn numbers_commits_without_optional_lines() {
        let prompts = pr_prompt(&request(&["fix bug", "add test"], None, None, Language::En));
        let lines: Vec<&str> = prompts.user.lines().collect();

        assert!(lines.contains(&"1. fix bug"));
        assert!(lines.contains(&"2. add test"));
        assert!(!lines.iter().any(|l| l.starts_with("Author:")));
        assert!(!lines.iter().any(|l| l.starts_with("URL:")));

        let first = prompts.user.find("1. fix bug").unwrap();
        let second = prompts.user.find("2. add test").unwrap();
        assert!(first < second);
    }

    #[test]
    fn includes_author_and_url_when_present() {
        let url = "https://github.com/acme/app/compare/main...feature";
        let prompts = pr_prompt(&request(&["init"], Some(url), Some("octocat"), Language::En));
        let lines: Vec<&str> = prompts.user.lines().collect();

        assert!(lines.contains(&"Author: octocat"));
        assert!(lines.contains(&format!("URL: {url}").as_str()));
    }

    #[test]
    fn system_prompt_pins_output_language() {
        for lang in Language::ALL {
            let prompts = pr_prompt(&request(&["x"], None, None, lang));
            assert!(prompts.system.starts_with(lang.prompt_directive()));
            assert!(prompts.system.contains("Markdown"));
        }
    }

    #[test]
    fn user_prompt_ends_with_json_contract() {
        let prompts = pr_prompt(&request(&["x"], None, None, Language::Ko));
        assert!(prompts.user.trim_end().ends_with('}'));
        assert!(prompts.user.contains("\"title\""));
        assert!(prompts.user.contains("\"description\""));
    }

    #[test]
    fn keeps_commit_text_verbatim() {
        let prompts = pr_prompt(&request(&["fix  login  redirect", "wip: a|b"], None, None, Language::En));
        assert!(prompts.user.contains("\n1. fix  login  redirect\n"));
        assert!(prompts.user.contains("\n2. wip: a|b\n"));
    }

    #[test]
    fn is_deterministic() {
        let req = request(&["a", "b"], None, Some("me"), Language::ZhTw);
        assert_eq!(pr_prompt(&req), pr_prompt(&req));
    }
}
