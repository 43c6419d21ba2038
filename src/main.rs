mod app;
mod cli_args;
mod config;
mod error;
mod generation;
mod git;
mod i18n;
mod language;
mod llm;
mod logging;
mod page;
mod profiles;
mod render;
mod setup;
mod storage;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::process::ExitCode;

use crate::app::{AppState, Event};
use crate::cli_args::{Cli, Command, GenerateArgs, ProfileCommand, ProfileFields};
use crate::config::Config;
use crate::i18n::Texts;
use crate::language::Language;
use crate::page::{CompareUrl, GitPage, ManualPage, PageCollaborator};
use crate::profiles::{CredentialProfile, ProfileError, ProfileStore};
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};

/// `--store :memory:` keeps settings for this run only.
const MEMORY_STORE: &str = ":memory:";

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let cfg = Config::from_sources(&cli)?;
    let mut kv = open_store(&cfg)?;

    let ui_lang = match cli.ui_lang {
        Some(lang) => lang,
        None => i18n::load_system_language(kv.as_ref())?,
    };
    let texts = i18n::texts(ui_lang);

    match &cli.command {
        Command::Generate(args) => run_generate(args, &cfg, kv.as_ref(), ui_lang),
        Command::Profile { action } => {
            let state = AppState::new(cfg.output_language).update(Event::SettingsOpened);
            render::print_header(&state, texts, ui_lang);
            run_profile(action, kv.as_mut(), texts)
        }
        Command::Language { lang } => run_language(*lang, ui_lang, &cfg, kv.as_mut()),
        Command::CheckUrl { url } => Ok(run_check_url(url, texts)),
    }
}

fn open_store(cfg: &Config) -> Result<Box<dyn KeyValueStore>> {
    if cfg.store_path.as_os_str() == MEMORY_STORE {
        log::debug!("Using in-memory settings store");
        return Ok(Box::new(MemoryStore::default()));
    }
    let store = JsonFileStore::open(&cfg.store_path)
        .with_context(|| "failed to open settings store")?;
    log::info!("Settings store: {:?}", store.path());
    Ok(Box::new(store))
}

fn run_generate(
    args: &GenerateArgs,
    cfg: &Config,
    kv: &dyn KeyValueStore,
    ui_lang: Language,
) -> Result<ExitCode> {
    let texts = i18n::texts(ui_lang);
    let mut state = AppState::new(cfg.output_language);
    if let Some(lang) = args.lang {
        state = state.update(Event::LanguageSelected(lang));
    }
    let language = state.selected_language;

    render::print_header(&state, texts, ui_lang);

    let compare = match &args.url {
        Some(url) => {
            state = state.update(Event::TabChecked { url: url.clone() });
            if !state.is_pr_page {
                render::print_not_pr_page(texts, &state.current_url);
                return Ok(ExitCode::FAILURE);
            }
            CompareUrl::parse(url)
        }
        None => None,
    };

    let profiles = ProfileStore::load(kv)?;
    let profile = profiles
        .active_profile()
        .cloned()
        .ok_or_else(|| anyhow!("no active profile"))?;
    state = state.update(Event::ConfigChecked {
        valid: profile.is_valid(),
    });
    if state.config_valid {
        log::info!("Using profile {:?}", profile.name);
    } else {
        log::warn!("Profile {:?} is incomplete", profile.name);
    }

    let mut page = build_page(args, compare.as_ref())?;
    let page_url = args.url.clone().or_else(|| {
        let base = args.base.as_deref()?;
        let head = args.head.clone().or_else(|| git::current_branch().ok())?;
        let repo = git::detect_repo_id()?;
        Some(format!("https://github.com/{repo}/compare/{base}...{head}"))
    });

    state = state.update(Event::GenerationStarted);
    let pb = state.is_loading.then(|| render::spinner(texts.generating));
    let details = app::generate_pr_details(
        &profile,
        page.as_mut(),
        page_url.as_deref(),
        language,
        texts,
        |p| setup::build_llm_client(p, args.no_model),
    );
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    state = state.update(Event::GenerationFinished(details));

    render::print_pr_details(&state, texts, page.form_location().as_deref());
    Ok(ExitCode::SUCCESS)
}

/// Commits on the command line win; otherwise read `base..head` from git.
fn build_page(
    args: &GenerateArgs,
    compare: Option<&CompareUrl>,
) -> Result<Box<dyn PageCollaborator>> {
    if !args.commits.is_empty() {
        return Ok(Box::new(ManualPage::new(
            args.commits.clone(),
            args.username.clone(),
            args.apply,
        )));
    }

    if let Some(c) = compare {
        log::debug!("Compare page for {}/{}", c.owner, c.repo);
    }
    let base = match (&args.base, compare) {
        (Some(base), _) => base.clone(),
        (None, Some(compare)) => match &compare.base {
            Some(base) => base.clone(),
            None => git::default_branch().unwrap_or_else(|| "main".to_string()),
        },
        (None, None) => bail!("nothing to summarize: pass --url, --base, or --commit"),
    };
    let head = match (&args.head, compare) {
        (Some(head), _) => head.clone(),
        (None, Some(compare)) => compare.head.clone(),
        (None, None) => git::current_branch().context("failed to determine current branch")?,
    };

    Ok(Box::new(GitPage::new(
        base,
        head,
        args.username.clone(),
        args.apply,
    )))
}

fn run_profile(
    action: &ProfileCommand,
    kv: &mut dyn KeyValueStore,
    texts: &Texts,
) -> Result<ExitCode> {
    let mut store = ProfileStore::load(kv)?;

    match action {
        ProfileCommand::List => {
            render::print_profiles(&store, texts);
            return Ok(ExitCode::SUCCESS);
        }
        ProfileCommand::Show => {
            let active = store
                .active_profile()
                .ok_or_else(|| anyhow!("no active profile"))?;
            render::print_profile(active, texts, true);
            return Ok(ExitCode::SUCCESS);
        }
        ProfileCommand::Add { name, fields } => {
            let mut profile = store.create_profile(name.as_deref().unwrap_or(texts.new_config));
            apply_fields(&mut profile, fields);
            store.update_profile(profile.clone());
            render::print_profile(&profile, texts, store.active_profile_id() == Some(profile.id.as_str()));
        }
        ProfileCommand::Update {
            profile,
            name,
            fields,
        } => {
            let mut updated = resolve(&store, profile)?;
            if let Some(name) = name {
                updated.name = name.clone();
            }
            apply_fields(&mut updated, fields);
            store.update_profile(updated.clone());
            render::print_profile(&updated, texts, store.active_profile_id() == Some(updated.id.as_str()));
        }
        ProfileCommand::Delete { profile } => {
            let target = resolve(&store, profile)?;
            match store.delete_profile(&target.id) {
                Ok(()) => println!("Deleted {:?}", target.name),
                Err(ProfileError::CannotDeleteLast) => bail!("{}", texts.cannot_delete_last),
                Err(e) => return Err(e.into()),
            }
        }
        ProfileCommand::Use { profile } => {
            let target = resolve(&store, profile)?;
            store.set_active_profile(&target.id);
            render::print_profile(&target, texts, true);
        }
    }

    store.save(kv)?;
    Ok(ExitCode::SUCCESS)
}

fn resolve(store: &ProfileStore, id_or_name: &str) -> Result<CredentialProfile> {
    store
        .resolve(id_or_name)
        .cloned()
        .ok_or_else(|| ProfileError::NotFound(id_or_name.to_string()).into())
}

fn apply_fields(profile: &mut CredentialProfile, fields: &ProfileFields) {
    if let Some(base_url) = &fields.base_url {
        profile.base_url = base_url.trim().to_string();
    }
    if let Some(api_key) = &fields.api_key {
        profile.api_key = api_key.trim().to_string();
    }
    if let Some(model) = &fields.model {
        profile.model = model.trim().to_string();
    }
}

fn run_language(
    lang: Option<Language>,
    current: Language,
    cfg: &Config,
    kv: &mut dyn KeyValueStore,
) -> Result<ExitCode> {
    let shown = match lang {
        Some(lang) => {
            i18n::save_system_language(kv, lang)?;
            log::info!("System language set to {lang}");
            lang
        }
        None => current,
    };
    let state = AppState::new(cfg.output_language).update(Event::SettingsOpened);
    render::print_header(&state, i18n::texts(shown), shown);
    render::print_languages(shown);
    Ok(ExitCode::SUCCESS)
}

fn run_check_url(url: &str, texts: &Texts) -> ExitCode {
    let state = AppState::default().update(Event::TabChecked {
        url: url.to_string(),
    });
    if state.is_pr_page {
        render::print_compare_page(&state.current_url);
        ExitCode::SUCCESS
    } else {
        render::print_not_pr_page(texts, &state.current_url);
        ExitCode::FAILURE
    }
}
