//! Interactive session.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use facegate::{
    AccessDecision, Devices, FacegateError, Gatekeeper, RolePrompt, SessionOptions,
};
use facegate_config::{CameraSource, FacegateConfig};
use facegate_store::StoreFile;
use facegate_vision::replay::ReplayScript;
use facegate_vision::{DistanceMatcher, TracingRenderer};

use crate::style::colors::SemanticStyle;
use crate::style::{
    print_error, print_hint, print_info_table, print_spacer, print_success, print_warn,
};

const PROMPT: &str = "facegate> ";

const HELP_TEXT: &str = r"
Commands:
  l, learn          Enroll the face in front of the camera
  f, toggle         Turn face recognition on or off
  h, hierarchy      Show the role hierarchy
  c, check [PATH]   Check access to a file path
  status            Show recognition state and current identity
  help              Show this help message
  q, quit           Save and exit
";

/// Command-line values that take precedence over configuration.
pub struct Overrides {
    pub script: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub active: bool,
}

pub fn run(project_dir: &Path, overrides: &Overrides) -> Result<()> {
    let mut config = super::load_config(project_dir, overrides.store.clone())?;
    if let Some(script) = &overrides.script {
        config.camera.replay_script = Some(script.clone());
        config.resolve_paths(project_dir);
    }
    if overrides.active {
        config.recognition.start_active = true;
    }

    let devices = open_devices(&config)?;
    let options = SessionOptions {
        frame_interval: config.recognition.frame_interval(),
        start_active: config.recognition.start_active,
        audit: true,
    };
    let mut session = Gatekeeper::start(StoreFile::new(&config.store.path), devices, options)
        .context("Failed to start session")?;

    println!("{}", "Facegate".header());
    println!("Identity store: {}", config.store.path.display());
    println!(
        "Recognition:    {}",
        if session.is_recognizing() { "on" } else { "off" }
    );
    print_hint("Type help for commands, q to quit.");
    print_spacer();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let outcome = repl(&session, &mut input);

    session.shutdown().context("Failed to shut down cleanly")?;
    println!("Identities saved. Goodbye!");
    outcome
}

fn open_devices(config: &FacegateConfig) -> Result<Devices> {
    match config.camera.source {
        CameraSource::Replay => {
            let path = config.camera.replay_script.as_ref().context(
                "No replay script configured; set camera.replay_script or pass --script",
            )?;
            let script = ReplayScript::load(path)?;
            let (camera, detector) = script
                .into_devices(config.camera.loop_replay)
                .context("Failed to open replay camera")?;
            Ok(Devices {
                camera: Box::new(camera),
                detector: Arc::new(detector),
                matcher: Box::new(DistanceMatcher::new(config.recognition.tolerance)),
                renderer: Box::new(TracingRenderer::new()),
            })
        }
    }
}

fn repl(session: &Gatekeeper, input: &mut dyn BufRead) -> Result<()> {
    let mut stdout = io::stdout();

    loop {
        print!("{PROMPT}");
        stdout.flush()?;

        let Some(line) = read_line(input)? else {
            println!();
            break;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (command, argument) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, Some(rest.trim())),
            None => (trimmed, None),
        };

        match command.to_lowercase().as_str() {
            "l" | "learn" | "enroll" => enroll(session, input),
            "f" | "toggle" => toggle(session),
            "h" | "hierarchy" => {
                super::roles::print_tree(session.hierarchy());
            }
            "c" | "check" => {
                let path = match argument {
                    Some(path) => path.to_string(),
                    None => {
                        print!("Enter the file path: ");
                        stdout.flush()?;
                        match read_line(input)? {
                            Some(path) => path.trim().to_string(),
                            None => break,
                        }
                    }
                };
                check(session, &path)?;
            }
            "status" => status(session),
            "help" | "?" => println!("{HELP_TEXT}"),
            "q" | "quit" | "exit" => break,
            other => {
                println!("Unknown command: {other}");
                println!("Type help for available commands.");
            }
        }
    }

    Ok(())
}

/// One line without its terminator; `None` at end of input.
fn read_line(input: &mut dyn BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

struct ConsolePrompt<'a> {
    input: &'a mut dyn BufRead,
}

impl RolePrompt for ConsolePrompt<'_> {
    fn request_role(&mut self) -> Option<String> {
        print!("Enter your role: ");
        io::stdout().flush().ok();
        match read_line(self.input) {
            Ok(line) => line,
            Err(e) => {
                print_error(&format!("Error reading input: {e}"));
                None
            }
        }
    }

    fn reject(&mut self, error: &FacegateError) {
        match error {
            FacegateError::InvalidRole { role, valid_roles } => {
                print_error(&format!("Invalid role '{role}'."));
                println!("Valid roles are: {}", valid_roles.join(", "));
            }
            other => print_error(&other.to_string()),
        }
    }
}

fn enroll(session: &Gatekeeper, input: &mut dyn BufRead) {
    println!("Look at the camera...");
    let mut prompt = ConsolePrompt { input };
    match session.enroll(&mut prompt) {
        Ok(enrolled) => {
            print_success(&format!(
                "You have been recognized as {}.",
                enrolled.role.role()
            ));
            if enrolled.replaced {
                print_hint("The previous face enrolled for this role was replaced.");
            }
        }
        Err(FacegateError::NoFaceDetected) => {
            print_error("No face detected. Please try again.");
        }
        Err(FacegateError::EnrollmentCancelled) => {
            print_warn("Enrollment cancelled.");
        }
        Err(e) => print_error(&format!("Enrollment failed: {e}")),
    }
}

fn toggle(session: &Gatekeeper) {
    match session.toggle_recognition() {
        Ok(true) => print_success("Face recognition started."),
        Ok(false) => print_success("Face recognition stopped."),
        Err(e) => print_error(&e.to_string()),
    }
}

fn check(session: &Gatekeeper, path: &str) -> Result<()> {
    println!(
        "Checking file access for {}...",
        session.current_identity().label().role()
    );
    match session.check_access(path)? {
        AccessDecision::Allowed { role, matched } => {
            print_success(&format!("Access granted to {path} for {role} (via {matched})."));
        }
        AccessDecision::Denied { role } => {
            print_error(&format!("Access denied to {path} for {role}."));
        }
        AccessDecision::NoIdentity => {
            print_warn("No recognized identity. Enroll (l) or turn on recognition (f) first.");
        }
    }
    Ok(())
}

fn status(session: &Gatekeeper) {
    let recognition = if session.is_halted() {
        "halted".error()
    } else if session.is_recognizing() {
        "on".success()
    } else {
        "off".muted()
    };
    let enrolled = session
        .store()
        .snapshot()
        .map_or_else(|e| format!("unavailable ({e})"), |store| store.len().to_string());

    print_info_table(&[
        ("Recognition", recognition),
        ("Current identity", session.current_identity().to_string()),
        ("Enrolled identities", enrolled),
        (
            "Identity store",
            session.store().file().path().display().to_string(),
        ),
    ]);
}
