use crate::error::LaunchError;
use log::{debug, info};
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Environment variable the Metal runtime reads to draw its performance HUD.
pub const HUD_ENV_VAR: &str = "MTL_HUD_ENABLED";
pub const HUD_ENV_VALUE: &str = "1";

/// A validated path to the application that should be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    path: PathBuf,
}

impl LaunchRequest {
    /// Trims `input` and checks that it names something on disk.
    ///
    /// Existence is the only check: the entry is not inspected to see whether
    /// it really is an application bundle.
    pub fn new(input: &str) -> Result<Self, LaunchError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LaunchError::EmptyPath);
        }

        let path = PathBuf::from(trimmed);
        if !path.exists() {
            return Err(LaunchError::PathNotFound(path));
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// One invocation of the platform opener, environment included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Complete child environment (not a diff against the parent).
    pub env: BTreeMap<OsString, OsString>,
}

impl SpawnRequest {
    /// Builds the opener invocation for `path` on top of this process's environment.
    pub fn for_bundle(path: &Path) -> Self {
        Self::with_env(path, std::env::vars_os())
    }

    /// Builds the opener invocation for `path` on top of `inherited`.
    pub fn with_env<I>(path: &Path, inherited: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut env: BTreeMap<OsString, OsString> = inherited.into_iter().collect();
        env.insert(HUD_ENV_VAR.into(), HUD_ENV_VALUE.into());

        let (program, args) = opener_command(path);
        Self { program, args, env }
    }

    pub fn env_var(&self, key: &str) -> Option<&OsStr> {
        self.env.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

#[cfg(target_os = "macos")]
fn opener_command(path: &Path) -> (OsString, Vec<OsString>) {
    ("open".into(), vec![path.into()])
}

#[cfg(target_os = "windows")]
fn opener_command(path: &Path) -> (OsString, Vec<OsString>) {
    // The empty argument is the window title `start` expects before the target.
    (
        "cmd".into(),
        vec!["/C".into(), "start".into(), "".into(), path.into()],
    )
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(path: &Path) -> (OsString, Vec<OsString>) {
    ("xdg-open".into(), vec![path.into()])
}

/// Starts the process described by a [`SpawnRequest`].
pub trait Spawner {
    /// Returns once the OS has accepted the request. Must not wait for the child.
    fn spawn(&mut self, request: &SpawnRequest) -> io::Result<()>;
}

/// Spawns the opener as a detached child.
///
/// Finished children are reaped on the next spawn so they do not linger as
/// zombies. Their exit status is discarded.
#[derive(Debug, Default)]
pub struct SystemSpawner {
    children: Vec<Child>,
}

impl SystemSpawner {
    /// Starts the process for `request` and hands back its handle.
    pub fn spawn_child(&self, request: &SpawnRequest) -> io::Result<Child> {
        Command::new(&request.program)
            .args(&request.args)
            .env_clear()
            .envs(&request.env)
            .stdin(Stdio::null())
            .spawn()
    }

    /// Collects children that have exited and returns how many are still running.
    pub fn reap(&mut self) -> usize {
        self.children
            .retain_mut(|child| !matches!(child.try_wait(), Ok(Some(_)) | Err(_)));
        self.children.len()
    }

    /// Process ids of children not reaped yet.
    pub fn pids(&self) -> Vec<u32> {
        self.children.iter().map(Child::id).collect()
    }
}

impl Spawner for SystemSpawner {
    fn spawn(&mut self, request: &SpawnRequest) -> io::Result<()> {
        let pending = self.reap();
        if pending > 0 {
            debug!("{} earlier launches still running", pending);
        }

        let child = self.spawn_child(request)?;
        self.children.push(child);
        Ok(())
    }
}

/// Opens applications with the HUD variable set.
#[derive(Debug, Default)]
pub struct Launcher<S = SystemSpawner> {
    spawner: S,
}

impl Launcher<SystemSpawner> {
    pub fn system() -> Self {
        Self::new(SystemSpawner::default())
    }
}

impl<S: Spawner> Launcher<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Validates `input` and issues one open request for it.
    ///
    /// Success only means the opener was started; whether the application
    /// comes up (or shows the HUD) is not observed. Repeated calls are not
    /// deduplicated.
    pub fn launch(&mut self, input: &str) -> Result<PathBuf, LaunchError> {
        let request = LaunchRequest::new(input)?;
        let spawn = SpawnRequest::for_bundle(request.path());

        debug!(
            "Spawning {:?} {:?} with {}={}",
            spawn.program, spawn.args, HUD_ENV_VAR, HUD_ENV_VALUE
        );

        self.spawner
            .spawn(&spawn)
            .map_err(|source| LaunchError::SpawnFailure {
                program: spawn.program_name(),
                source,
            })?;

        info!("Launched {} with the Metal HUD enabled", request.path().display());
        Ok(request.into_path())
    }
}

/// Launches `path` through the system opener.
pub fn launch(path: &str) -> Result<PathBuf, LaunchError> {
    Launcher::system().launch(path)
}
