//! Reads the password and port the embedded cluster actually settled on.

use super::{BoxError, boxed};
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use postgresql_embedded::Settings;
use std::io::ErrorKind;

fn open_dir(path: &Utf8Path) -> Result<Dir, BoxError> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(boxed)
}

pub(super) fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    let raw_path = settings.password_file.to_string_lossy();
    let password_path = Utf8Path::new(raw_path.as_ref());
    let file_name = password_path
        .file_name()
        .ok_or_else(|| boxed(std::io::Error::other("password file path has no file name")))?;
    let parent = password_path.parent().unwrap_or_else(|| Utf8Path::new("."));

    match open_dir(parent)?.read_to_string(file_name) {
        Ok(contents) => {
            let password = contents.trim_end();
            if !password.is_empty() {
                password.clone_into(&mut settings.password);
            }
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(boxed(err)),
    }
}

/// The fourth line of `postmaster.pid` holds the port the server bound.
pub(super) fn sync_port_from_pid(settings: &mut Settings) -> Result<(), BoxError> {
    let raw_dir = settings.data_dir.to_string_lossy();
    let data_dir = open_dir(Utf8Path::new(raw_dir.as_ref()))?;
    let contents = match data_dir.read_to_string("postmaster.pid") {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(boxed(err)),
    };

    if let Some(port) = contents
        .lines()
        .nth(3)
        .and_then(|line| line.trim().parse::<u16>().ok())
    {
        settings.port = port;
    }
    Ok(())
}
