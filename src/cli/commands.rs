//! Command dispatch and implementations

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::document::{sample_source, DocumentSource};
use crate::application::export::export_deck;
use crate::application::services::DocumentService;
use crate::application::svg::render_svg;
use crate::application::{ApplicationError, IoResultExt, Session};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::{output, repl};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{PyramidTree, Slide};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute the CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("get current directory", e)))?,
    };

    match &cli.command {
        Some(Commands::Completion { shell }) => {
            cmd_completion(*shell);
            Ok(())
        }
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cmd_config_show(&project_dir),
            ConfigCommands::Path => cmd_config_path(&project_dir),
        },
        Some(command) => {
            let settings = Settings::load(Some(&project_dir))?;
            let container = ServiceContainer::new(settings);
            dispatch(&container, command)
        }
        None => Err(CliError::Usage(
            "no command given (try 'pyramid --help')".to_string(),
        )),
    }
}

fn dispatch(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Analyze {
            file,
            text,
            title,
            output,
        } => {
            let source = analysis_source(
                container,
                file.as_deref(),
                text.as_deref(),
                title.as_deref(),
            )?;
            cmd_analyze(container, &source, output.as_deref())
        }
        Commands::Demo { output } => cmd_analyze(container, &sample_source(), output.as_deref()),
        Commands::Show { doc } => cmd_show(container, doc),
        Commands::Edit { doc, output } => cmd_edit(container, doc, output.as_deref()),
        Commands::Render { doc, output } => cmd_render(container, doc, output.as_deref()),
        Commands::Slides { doc } => cmd_slides(container, doc),
        Commands::Export { doc, output } => cmd_export(container, doc, output.as_deref()),
        Commands::Health => cmd_health(container),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn analysis_source(
    container: &ServiceContainer,
    file: Option<&Path>,
    text: Option<&Path>,
    title: Option<&str>,
) -> CliResult<DocumentSource> {
    match (file, text) {
        (Some(path), _) => Ok(DocumentSource::File(path.to_path_buf())),
        (None, Some(path)) => {
            let content = container
                .fs
                .read_to_string(path)
                .with_path_context("read text document", path)?;
            Ok(DocumentSource::Text {
                title: title.map(str::to_string),
                content,
            })
        }
        (None, None) => Err(ApplicationError::NoDocument.into()),
    }
}

fn load_session(container: &ServiceContainer, doc: &Path) -> CliResult<Session> {
    let (title, tree) = container.document_service().load(doc)?;
    let mut session = Session::new(container.settings.layout);
    session.open(title, tree);
    Ok(session)
}

fn loaded_tree(session: &Session) -> CliResult<&PyramidTree> {
    session
        .editor()
        .tree()
        .ok_or_else(|| CliError::Usage("no pyramid loaded".to_string()))
}

#[instrument(level = "debug", skip(container))]
fn cmd_analyze(
    container: &ServiceContainer,
    source: &DocumentSource,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let mut session = Session::new(container.settings.layout);
    session.analyze(&container.analysis_service(), source)?;
    let tree = loaded_tree(&session)?;
    let path = match output_path {
        Some(path) => path.to_path_buf(),
        None => DocumentService::default_path(&container.settings.output_dir, session.title()),
    };
    container
        .document_service()
        .save_tree(&path, session.title(), tree)?;

    output::header(session.title());
    output::info(&output::tree_view(tree));
    output::success(&format!("Saved {}", path.display()));
    Ok(())
}

fn cmd_show(container: &ServiceContainer, doc: &Path) -> CliResult<()> {
    let session = load_session(container, doc)?;
    output::header(session.title());
    output::info(&output::tree_view(loaded_tree(&session)?));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_edit(
    container: &ServiceContainer,
    doc: &Path,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let mut session = load_session(container, doc)?;
    let target: PathBuf = output_path.unwrap_or(doc).to_path_buf();
    let title = session.title().to_string();
    let documents = container.document_service();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let saves = repl::run(
        session.editor_mut(),
        stdin.lock(),
        &mut stdout,
        |tree| {
            documents.save_tree(&target, &title, tree)?;
            output::action("Saved", &target.display());
            Ok(())
        },
    )?;
    debug!("edit session finished with {} saves", saves);
    Ok(())
}

fn cmd_render(
    container: &ServiceContainer,
    doc: &Path,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let session = load_session(container, doc)?;
    let tree = loaded_tree(&session)?;
    let layout = session
        .editor()
        .layout()
        .ok_or_else(|| CliError::Usage("no layout computed".to_string()))?;
    let svg = render_svg(tree, layout);

    match output_path {
        Some(path) => {
            container
                .fs
                .ensure_parent(path)
                .with_path_context("create directory", path)?;
            container
                .fs
                .write(path, &svg)
                .with_path_context("write diagram", path)?;
            output::success(&format!("Rendered {}", path.display()));
        }
        None => output::info(&svg),
    }
    Ok(())
}

fn cmd_slides(container: &ServiceContainer, doc: &Path) -> CliResult<()> {
    let mut session = load_session(container, doc)?;
    let slides = session.show_slides();
    output::header(&format!("{} slides", slides.len()));
    for (i, slide) in slides.iter().enumerate() {
        output::info(&format!("{:>2}. {}", i + 1, slide.title()));
        match slide {
            Slide::Title { subtitle, .. } => output::detail(subtitle),
            Slide::Content { points, .. } => {
                for point in points {
                    output::detail(&format!("- {}", point));
                }
            }
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_export(container: &ServiceContainer, doc: &Path, dir: Option<&Path>) -> CliResult<()> {
    let session = load_session(container, doc)?;
    let dir = dir.unwrap_or(container.settings.output_dir.as_path());
    let path = export_deck(
        container.fs.as_ref(),
        dir,
        session.title(),
        loaded_tree(&session)?,
    )?;
    output::success(&format!("Exported {}", path.display()));
    Ok(())
}

fn cmd_health(container: &ServiceContainer) -> CliResult<()> {
    let health = container.analysis_service().health();
    output::action("status", &health.status);
    if health.has_api_key {
        output::success(&health.message);
    } else {
        output::failure(&health.message);
    }
    Ok(())
}

fn cmd_config_show(project_dir: &Path) -> CliResult<()> {
    let settings = Settings::load(Some(project_dir))?;
    output::info(&settings.redacted().to_toml()?);
    Ok(())
}

fn cmd_config_path(project_dir: &Path) -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::action("global", &path.display()),
        None => output::action("global", &"(no config directory)"),
    }
    output::action("local", &local_config_path(project_dir).display());
    Ok(())
}

fn cmd_completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
