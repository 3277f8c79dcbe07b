use hudopen::{Alerts, App, LaunchError, Launcher, SpawnRequest, Spawner, HUD_ENV_VAR};
use std::ffi::OsStr;
use std::fs;
use std::io;
use tempfile::TempDir;

#[derive(Default)]
struct Recorder(Vec<SpawnRequest>);

impl Spawner for Recorder {
    fn spawn(&mut self, request: &SpawnRequest) -> io::Result<()> {
        self.0.push(request.clone());
        Ok(())
    }
}

#[derive(Default)]
struct Dialogs(Vec<(String, String)>);

impl Alerts for Dialogs {
    fn warning(&mut self, title: &str, message: &str) {
        self.0.push((title.to_string(), message.to_string()));
    }

    fn critical(&mut self, title: &str, message: &str) {
        self.0.push((title.to_string(), message.to_string()));
    }
}

fn new_app() -> App<Recorder, Dialogs> {
    App::new(Launcher::new(Recorder::default()), Dialogs::default()).with_roots(Vec::new())
}

#[test]
fn existing_bundle_is_opened_once_without_dialogs() {
    let dir = TempDir::new().unwrap();
    let calculator = dir.path().join("Calculator.app");
    fs::create_dir_all(calculator.join("Contents/MacOS")).unwrap();

    let mut app = new_app();
    app.state_mut().path = calculator.to_string_lossy().into_owned();
    app.launch().unwrap();

    let requests = &app.launcher().spawner().0;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].args.iter().any(|arg| arg == calculator.as_os_str()));
    assert_eq!(requests[0].env_var(HUD_ENV_VAR), Some(OsStr::new("1")));
    assert!(app.alerts().0.is_empty());
}

#[test]
fn empty_path_shows_a_warning() {
    let mut app = new_app();

    assert!(matches!(app.launch(), Err(LaunchError::EmptyPath)));
    assert_eq!(app.alerts().0.len(), 1);
    assert_eq!(app.alerts().0[0].0, "Warning");
    assert!(app.launcher().spawner().0.is_empty());
}

#[test]
fn nonexistent_bundle_shows_a_warning() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("DoesNotExist.app");

    let mut app = new_app();
    app.state_mut().path = missing.to_string_lossy().into_owned();

    match app.launch() {
        Err(LaunchError::PathNotFound(path)) => assert_eq!(path, missing),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(app.alerts().0.len(), 1);
    assert!(app.launcher().spawner().0.is_empty());
}

#[test]
fn every_launch_issues_its_own_request() {
    let dir = TempDir::new().unwrap();
    let chess = dir.path().join("Chess.app");
    fs::create_dir(&chess).unwrap();
    let input = chess.to_string_lossy().into_owned();

    let mut launcher = Launcher::new(Recorder::default());
    for _ in 0..3 {
        launcher.launch(&input).unwrap();
    }

    let requests = &launcher.spawner().0;
    assert_eq!(requests.len(), 3);
    for request in requests {
        assert_eq!(request.env_var(HUD_ENV_VAR), Some(OsStr::new("1")));
        for (key, value) in std::env::vars_os() {
            if key != HUD_ENV_VAR {
                assert_eq!(request.env.get(&key), Some(&value));
            }
        }
    }
}
