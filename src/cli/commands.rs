//! Command dispatch: turns parsed arguments into controller calls

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{secret_digest, verify_secret};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{expand_env_vars, Content, TopicCommand, TopicDocument, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{TopicStore, XmlTopicStore};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `topictree --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            print_completions(*shell);
            Ok(())
        }
        Commands::Config { command } => _config(cli, command),
        Commands::Init { title, force } => {
            let settings = load_settings(cli)?;
            _init(&settings, title.as_deref(), *force)
        }
        _ => {
            let container = ServiceContainer::new(load_settings(cli)?);
            dispatch(&container, command)
        }
    }
}

/// Settings from config files and environment, with `--file` applied last.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(file) = &cli.file {
        settings.data_file = PathBuf::from(expand_env_vars(&file.to_string_lossy()));
    }
    debug!("data file: {}", settings.data_file.display());
    Ok(settings)
}

/// Run a tree command against the container's store.
#[instrument(level = "debug", skip(container))]
pub fn dispatch(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    let mut controller = container.open_controller()?;

    match command {
        Commands::Tree { all } => {
            let mut view = controller.project();
            if *all {
                view.set_expanded_all(true);
            }
            output::info(&view.to_tree_string());
        }
        Commands::Search { key } => {
            let view = controller.filter(key);
            if view.children.is_empty() {
                output::warning(&format!("no topic matches {key:?}"));
            } else {
                output::info(&view.to_tree_string());
            }
        }
        Commands::Children { parent } => {
            for title in controller.get_children(parent.as_deref())? {
                output::info(&title);
            }
        }
        Commands::Add { title, parent } => {
            controller.apply(TopicCommand::Add {
                title: title.clone(),
                parent: parent.clone(),
            })?;
            output::success(&format!("added {title:?}"));
        }
        Commands::Rename { old, new } => {
            controller.apply(TopicCommand::Rename {
                from: old.clone(),
                to: new.clone(),
            })?;
            output::success(&format!("renamed {old:?} to {new:?}"));
        }
        Commands::Remove { title, password } => {
            let doomed = controller.subtree_size(title)?;
            authorize_removal(&container.settings, password.as_deref())?;
            controller.apply(TopicCommand::Remove {
                title: title.clone(),
            })?;
            output::success(&format!(
                "removed {title:?} and {} subtopic(s)",
                doomed.saturating_sub(1)
            ));
        }
        Commands::Move { title, to } => {
            controller.apply(TopicCommand::Move {
                title: title.clone(),
                parent: to.clone(),
            })?;
            let target = to.as_deref().unwrap_or("the root");
            output::success(&format!("moved {title:?} under {target}"));
        }
        Commands::Attach {
            title,
            kind,
            source,
            description,
        } => {
            controller.apply(TopicCommand::Attach {
                title: title.clone(),
                content: Content {
                    kind: *kind,
                    source: source.clone(),
                    description: description.clone(),
                },
            })?;
            output::success(&format!("attached {kind} content to {title:?}"));
        }
        Commands::Contents { title } => {
            let contents = controller.contents(title)?;
            output::header(title);
            if contents.is_empty() {
                output::detail("(no contents)");
            }
            for content in contents {
                output::detail(content);
            }
        }
        Commands::Init { .. } | Commands::Config { .. } | Commands::Completion { .. } => {
            return Err(CliError::Usage(
                "command does not operate on an open topic tree".to_string(),
            ));
        }
    }
    Ok(())
}

/// Removal gate: when a secret digest is configured the caller has to
/// present the matching secret, either via `--password` or at the prompt.
pub fn authorize_removal(settings: &Settings, password: Option<&str>) -> CliResult<()> {
    let Some(digest) = settings.removal_secret.as_deref() else {
        return Ok(());
    };
    let candidate = match password {
        Some(password) => password.to_string(),
        None => read_secret()?,
    };
    if verify_secret(&candidate, digest) {
        Ok(())
    } else {
        Err(CliError::Unauthorized("wrong removal secret".to_string()))
    }
}

fn read_secret() -> CliResult<String> {
    output::prompt("Removal secret:");
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| InfraError::io("read removal secret", e))?;
    Ok(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string())
}

#[instrument(level = "debug", skip(settings))]
fn _init(settings: &Settings, title: Option<&str>, force: bool) -> CliResult<()> {
    let store = XmlTopicStore::new(settings.data_file.clone());
    if store.exists() && !force {
        return Err(CliError::AlreadyExists(store.path().to_path_buf()));
    }
    let document = TopicDocument {
        title: title.unwrap_or_default().to_string(),
        topics: Vec::new(),
    };
    store.save(&document)?;
    output::success(&format!("created {}", store.location()));
    Ok(())
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: (no config directory)"),
            }
            if let Some(local) = &cli.config {
                output::detail(&format!("local:  {}", local.display()));
            }
            let settings = load_settings(cli)?;
            output::header("Topic document");
            output::detail(&settings.data_file.display());
        }
        ConfigCommands::HashSecret { secret } => {
            output::info(&secret_digest(secret));
        }
    }
    Ok(())
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
