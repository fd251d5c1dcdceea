//! Launching editors, file browsers and other external programs.

use crate::error::{LoliError, Result};
use log::{debug, warn};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

pub const PATH_PLACEHOLDER: &str = "{path}";

/// Build argv for `opener`. A `{path}` placeholder is substituted in place
/// (e.g. `gedit "{path}"`); otherwise the path becomes the last argument.
pub fn opener_command(opener: &str, path: &Path) -> Result<Vec<String>> {
    let words = shlex::split(opener.trim())
        .filter(|w| !w.is_empty())
        .ok_or_else(|| LoliError::InvalidOpener(opener.to_string()))?;
    let path = path.display().to_string();
    if opener.contains(PATH_PLACEHOLDER) {
        Ok(words
            .into_iter()
            .map(|w| w.replace(PATH_PLACEHOLDER, &path))
            .collect())
    } else {
        let mut argv = words;
        argv.push(path);
        Ok(argv)
    }
}

/// Run the command and wait for it. A missing program becomes
/// `OpenerNotFound`; a non-zero exit is only logged.
pub fn spawn(argv: &[String]) -> Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| LoliError::InvalidOpener(String::new()))?;
    debug!("spawning {argv:?}");
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|err| not_found_or(err, program))?;
    if !status.success() {
        warn!("{program} exited with {status}");
    }
    Ok(())
}

pub fn open_with(opener: &str, path: &Path) -> Result<()> {
    let argv = opener_command(opener, path)?;
    spawn(&argv)
}

/// Hand the path to the desktop's default application.
pub fn open_default(path: &Path) -> Result<()> {
    debug!("opening {} with system default", path.display());
    open::that(path).map_err(|err| not_found_or(err, "system opener"))
}

fn not_found_or(err: io::Error, program: &str) -> LoliError {
    if err.kind() == io::ErrorKind::NotFound {
        LoliError::OpenerNotFound(program.to_string())
    } else {
        LoliError::Io(err)
    }
}
