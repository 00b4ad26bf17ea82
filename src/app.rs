//! Application orchestrator.
//! Loads/merges config, initializes logging, validates the catalog folder and
//! dispatches the subcommand to its workflow.

use anyhow::Result;
use tracing::{debug, error, info};

use take_over::cli::{Args, Command};
use take_over::output as out;
use take_over::workflows::{self, ListStyle, RestoreOptions, TakeOverRequest};
use take_over::{
    CONFIG_ENV, Catalog, Config, CreateOutcome, Executor, TakeOverError, default_config_path,
    load_config,
};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {cfg_env}\n"));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default take_over config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info(
                    "No config file exists there; built-in defaults apply. Example:\n\n<config>\n  <catalog_dir>/path/to/catalog</catalog_dir>\n  <storage_alias>%TAKEOVER_DB%</storage_alias>\n  <log_level>normal</log_level>\n  <log_file>/path/to/take_over.log</log_file>\n</config>\n",
                );
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

/// Log a failure with its stable code and kind when it is one of ours.
fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<TakeOverError>() {
        Some(te) => error!(code = te.code(), kind = te.kind(), error = %te, "command failed"),
        None => error!(error = ?e, "command failed"),
    }
}

fn dry_run_note(exec: &Executor) {
    if exec.is_dry_run() {
        out::print_dry_run(&format!(
            "{} action(s) planned; nothing was changed",
            exec.actions().len()
        ));
    }
}

fn dispatch(cfg: &Config, command: &Command) -> Result<()> {
    let mut catalog = Catalog::new(&cfg.catalog_dir);
    let mut exec = Executor::new(cfg.dry_run);

    match command {
        Command::Init { .. } => match workflows::init(&catalog, cfg.dry_run)? {
            CreateOutcome::Created if cfg.dry_run => {
                out::print_dry_run(&format!("would create {}", catalog.file_path().display()))
            }
            CreateOutcome::Created => {
                out::print_success(&format!("Created {}", catalog.file_path().display()))
            }
            CreateOutcome::AlreadyExists => out::print_warn(&format!(
                "Catalog already exists: {}",
                catalog.file_path().display()
            )),
        },

        Command::TakeOver {
            path,
            target,
            extensions,
            ..
        } => {
            let req = TakeOverRequest {
                path: path.clone(),
                storage_alias: target.clone().or_else(|| cfg.storage_alias.clone()),
                extensions: extensions.clone(),
            };
            let outcome = workflows::take_over(&mut catalog, &req, &mut exec)?;
            dry_run_note(&exec);
            if !exec.is_dry_run() {
                out::print_success(&format!(
                    "Took over {} as {} ({} file(s))",
                    path.display(),
                    outcome.id,
                    outcome.captured
                ));
            }
        }

        Command::SetLinks {
            name,
            target,
            force,
            ..
        } => {
            let report = workflows::set_links(
                &mut catalog,
                name.as_deref(),
                target.as_deref(),
                *force,
                &mut exec,
            )?;
            dry_run_note(&exec);
            info!(linked = report.done_count(), skipped = report.skipped_count(), "links set");
        }

        Command::UnsetLinks { name, .. } => {
            let report = workflows::unset_links(&mut catalog, name.as_deref(), &mut exec)?;
            dry_run_note(&exec);
            info!(removed = report.done_count(), "links removed");
        }

        Command::RestoreSource {
            name,
            remove,
            force,
            ..
        } => {
            let opts = RestoreOptions {
                remove: *remove,
                force: *force,
            };
            let report =
                workflows::restore_source(&mut catalog, name.as_deref(), opts, &mut exec)?;
            dry_run_note(&exec);
            info!(
                restored = report.done_count(),
                skipped = report.skipped_count(),
                "restore done"
            );
        }

        Command::RemoveSource { name, .. } => {
            let id = workflows::remove_source(&mut catalog, name, &mut exec)?;
            dry_run_note(&exec);
            if !exec.is_dry_run() {
                out::print_success(&format!("Removed {id}"));
            }
        }

        Command::Update { name, .. } => workflows::update(name)?,

        Command::List {
            verbose,
            very_verbose,
        } => {
            let style = if *very_verbose {
                ListStyle::VeryVerbose
            } else if *verbose {
                ListStyle::Verbose
            } else {
                ListStyle::Brief
            };
            for line in workflows::list(&mut catalog, style)? {
                out::print_user(&line);
            }
        }
    }
    Ok(())
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let Some(command) = args.command.as_ref() else {
        return Ok(());
    };

    // Config file first, then CLI overrides.
    let mut cfg = load_config()
        .map_err(|e| TakeOverError::InvalidConfig(format!("{e:#}")))?
        .unwrap_or_default();
    args.apply_overrides(&mut cfg);

    // A dry run must not write, so file logging is skipped.
    let log_file = if cfg.dry_run { None } else { cfg.log_file.as_deref() };
    let _guard = init_tracing(&cfg.log_level, log_file, args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    debug!(?args, "starting take_over");

    let result = cfg
        .validate()
        .map_err(|e| anyhow::Error::from(TakeOverError::InvalidConfig(format!("{e:#}"))))
        .and_then(|()| dispatch(&cfg, command));
    if let Err(e) = &result {
        report_error(e);
    }
    result
}
