use crate::browse::{self, BundleFilter};
use crate::error::LaunchError;
use crate::launcher::{Launcher, Spawner};
use log::debug;
use std::path::PathBuf;

/// Where user-facing problems are reported. None of them end the session.
pub trait Alerts {
    fn warning(&mut self, title: &str, message: &str);
    fn critical(&mut self, title: &str, message: &str);
}

/// Prints alerts to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalAlerts;

impl TerminalAlerts {
    fn render(severity: &str, title: &str, message: &str) -> String {
        format!("{}: [{}] {}", severity, title, message)
    }
}

impl Alerts for TerminalAlerts {
    fn warning(&mut self, title: &str, message: &str) {
        eprintln!("{}", Self::render("warning", title, message));
    }

    fn critical(&mut self, title: &str, message: &str) {
        eprintln!("{}", Self::render("error", title, message));
    }
}

/// What the user has entered so far.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AppState {
    pub path: String,
}

/// A line typed in the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Browse(&'a str),
    Launch,
    /// Replace the selection with this path and launch it.
    Open(&'a str),
    Quit,
}

impl<'a> Action<'a> {
    /// A blank line launches the current selection. `open <path>` always
    /// treats the rest of the line as a path, even one named like a command.
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match (command, rest) {
            ("browse", query) => Action::Browse(query),
            ("", _) | ("launch", "") | ("open", "") => Action::Launch,
            ("open", path) => Action::Open(path),
            ("quit" | "exit", "") => Action::Quit,
            _ => Action::Open(line),
        }
    }
}

/// Owns the selection and routes the browse and launch actions.
pub struct App<S, A> {
    state: AppState,
    launcher: Launcher<S>,
    alerts: A,
    roots: Vec<PathBuf>,
    filter: BundleFilter,
}

impl<S: Spawner, A: Alerts> App<S, A> {
    pub fn new(launcher: Launcher<S>, alerts: A) -> Self {
        Self {
            state: AppState::default(),
            launcher,
            alerts,
            roots: browse::default_roots(),
            filter: BundleFilter::platform_default(),
        }
    }

    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = roots;
        self
    }

    pub fn with_filter(mut self, filter: BundleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn launcher(&self) -> &Launcher<S> {
        &self.launcher
    }

    pub fn alerts(&self) -> &A {
        &self.alerts
    }

    pub fn filter(&self) -> &BundleFilter {
        &self.filter
    }

    pub fn bundles(&self) -> Vec<PathBuf> {
        browse::find_bundles(&self.roots, &self.filter)
    }

    /// Fills the selection with the best bundle matching `query`.
    ///
    /// Returns `false` and leaves the selection alone when nothing matches.
    pub fn browse(&mut self, query: &str) -> bool {
        debug!("Browsing {:?} for '{}' ({})", self.roots, query, self.filter);

        match browse::browse(query, &self.roots, &self.filter) {
            Some(path) => {
                self.state.path = path.to_string_lossy().into_owned();
                true
            }
            None => {
                self.alerts.warning(
                    "Warning",
                    &format!("No application matching '{}' was found", query.trim()),
                );
                false
            }
        }
    }

    /// Launches the current selection, raising an alert on failure.
    pub fn launch(&mut self) -> Result<PathBuf, LaunchError> {
        let result = self.launcher.launch(&self.state.path);

        if let Err(e) = &result {
            match e {
                LaunchError::EmptyPath => self
                    .alerts
                    .warning("Warning", "Select an application to launch first"),
                LaunchError::PathNotFound(_) => self
                    .alerts
                    .warning("Warning", "The selected application does not exist"),
                LaunchError::SpawnFailure { source, .. } => self.alerts.critical(
                    "Error",
                    &format!("Error launching application: {}", source),
                ),
            }
        }

        result
    }
}
