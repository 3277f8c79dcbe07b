use anyhow::{Context, Result};
use clap::Parser;
use hudopen::{Action, Alerts, App, Launcher, Spawner, TerminalAlerts, HUD_ENV_VALUE, HUD_ENV_VAR};
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Launch an application with the Metal performance HUD enabled",
    long_about = "Opens an application with MTL_HUD_ENABLED=1 set in its environment. \
                  Without arguments an interactive session is started."
)]
struct Args {
    /// Path of the application to launch
    #[arg(index = 1, conflicts_with_all = ["browse", "list"])]
    path: Option<String>,

    /// Pick an installed application by name and launch it
    #[arg(short, long, value_name = "NAME", conflicts_with = "list")]
    browse: Option<String>,

    /// List the applications that --browse can pick from
    #[arg(long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Returns `Ok(false)` when a one-shot request failed after its alert was shown.
fn run(args: Args) -> Result<bool> {
    let mut app = App::new(Launcher::system(), TerminalAlerts);

    if args.list {
        for bundle in app.bundles() {
            println!("{}", bundle.display());
        }
        return Ok(true);
    }

    if let Some(query) = args.browse {
        if !app.browse(&query) {
            return Ok(false);
        }
        return Ok(launch_selection(&mut app));
    }

    if let Some(path) = args.path {
        app.state_mut().path = path;
        return Ok(launch_selection(&mut app));
    }

    interactive(&mut app)?;
    Ok(true)
}

fn launch_selection<S: Spawner, A: Alerts>(app: &mut App<S, A>) -> bool {
    match app.launch() {
        Ok(path) => {
            println!("Launched {} with {}={}", path.display(), HUD_ENV_VAR, HUD_ENV_VALUE);
            true
        }
        Err(_) => false,
    }
}

fn interactive<S: Spawner, A: Alerts>(app: &mut App<S, A>) -> Result<()> {
    println!("Metal HUD Launcher");
    println!("Applications are started with {}={}.", HUD_ENV_VAR, HUD_ENV_VALUE);
    println!(
        "Type a path to launch it, `browse <name>` to pick from {}, `launch` or an empty line to launch the selection, `quit` to exit.",
        app.filter()
    );
    println!("Use `open <path>` for a path named like one of these commands.");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        line.clear();
        if input.read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }

        match Action::parse(&line) {
            Action::Quit => break,
            Action::Browse(query) => {
                if app.browse(query) {
                    println!("Selected {}", app.state().path);
                }
            }
            Action::Launch => {
                launch_selection(app);
            }
            Action::Open(path) => {
                app.state_mut().path = path.to_string();
                launch_selection(app);
            }
        }
    }

    Ok(())
}
