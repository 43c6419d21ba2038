use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::app::{AppState, PrDetails};
use crate::i18n::Texts;
use crate::language::Language;
use crate::profiles::{CredentialProfile, ProfileStore};

/// Title line plus the language selector the current view shows.
pub fn print_header(state: &AppState, texts: &Texts, ui_lang: Language) {
    println!("{} · {}", texts.app_title.bold(), texts.app_subtitle);
    if state.show_settings {
        println!("{}: {}", texts.system_language.bright_black(), ui_lang.label());
    } else {
        println!(
            "{}: {}",
            texts.output_language.bright_black(),
            state.selected_language.label()
        );
    }
    println!();
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal.
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_not_pr_page(texts: &Texts, url: &str) {
    println!("{} {}", "✗".red().bold(), texts.not_pr_page.red().bold());
    if !url.is_empty() {
        println!("  {}", url.bright_black());
    }
    println!("{}", texts.not_pr_page_desc);
    println!();
    println!("{}", texts.how_to_use.bold());
    for (idx, step) in texts.how_to_steps.iter().enumerate() {
        println!("  {}. {}", idx + 1, step);
    }
}

pub fn print_compare_page(url: &str) {
    println!("{} {}", "✓".green().bold(), url);
}

/// The result slot: a generated PR or the localized error shown in its place.
pub fn print_pr_details(state: &AppState, texts: &Texts, form_location: Option<&str>) {
    if !state.is_generated {
        return;
    }
    let details = &state.pr_details;
    let heading = result_heading(details, texts);
    let rule = "-".repeat(heading.chars().count());
    if details.failed {
        println!("{}", heading.red().bold());
        println!("{}", details.title.red().bold());
    } else {
        println!("{}", heading.cyan().bold());
        println!("{}", details.title.bold());
    }
    println!();
    println!("{}", details.description.trim_end());
    if details.failed {
        println!("{}", rule.red().bold());
    } else {
        println!("{}", rule.cyan().bold());
    }

    if let Some(location) = form_location {
        println!("{} {}: {}", "✓".green().bold(), texts.form_filled, location);
    }
}

/// Errors sit under the neutral app banner; only real output claims "generated".
fn result_heading(details: &PrDetails, texts: &Texts) -> String {
    let label = if details.failed {
        texts.app_title
    } else {
        texts.pr_ready
    };
    format!("----- {label} -----")
}

pub fn print_profiles(store: &ProfileStore, texts: &Texts) {
    for profile in store.profiles() {
        let active = store.active_profile_id() == Some(profile.id.as_str());
        print_profile(profile, texts, active);
        println!();
    }
}

pub fn print_profile(profile: &CredentialProfile, texts: &Texts, active: bool) {
    let marker = if active {
        format!(" ({})", texts.active_config).green().bold().to_string()
    } else {
        String::new()
    };
    println!("{}{}", profile.name.bold(), marker);
    println!("  {:<14} {}", "id", profile.id.bright_black());
    println!("  {:<14} {}", texts.config_name, profile.name);
    println!("  {:<14} {}", texts.api_base_url, or_not_set(&profile.base_url, texts));
    println!("  {:<14} {}", texts.api_key, mask_key(&profile.api_key, texts));
    println!("  {:<14} {}", texts.model_name, or_not_set(&profile.model, texts));
}

pub fn print_languages(current: Language) {
    for lang in Language::ALL {
        let line = format!("{:<6} {}", lang.tag(), lang.label());
        if lang == current {
            println!("* {}", line.green().bold());
        } else {
            println!("  {line}");
        }
    }
}

fn or_not_set(value: &str, texts: &Texts) -> String {
    if value.is_empty() {
        texts.not_set.yellow().to_string()
    } else {
        value.to_string()
    }
}

/// Show just enough of a key to tell profiles apart.
fn mask_key(key: &str, texts: &Texts) -> String {
    let chars: Vec<char> = key.chars().collect();
    match chars.len() {
        0 => texts.not_set.yellow().to_string(),
        n if n <= 8 => "*".repeat(n),
        n => {
            let head: String = chars[..3].iter().collect();
            let tail: String = chars[n - 4..].iter().collect();
            format!("{head}…{tail}")
        }
    }
}
