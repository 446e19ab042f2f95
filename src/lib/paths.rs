//! Shared helpers reused across modules (path validation, host naming).

use std::{
    collections::BTreeMap,
    ffi::{CStr, OsStr, OsString},
    path::Path,
};

use serde::Serializer;

/// Returns true if the path is non-empty and absolute.
pub fn is_nonempty_absolute(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_absolute()
}

/// File name of `path` without its final extension (`/a/b/query.fasta` → `query`).
pub fn base_name_without_extension(path: &Path) -> OsString {
    path.file_stem().map(OsStr::to_os_string).unwrap_or_default()
}

/// Serialize an OS string for display, replacing bytes that are not UTF-8.
pub fn serialize_lossy<S: Serializer>(
    value: &OsString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string_lossy())
}

pub fn serialize_lossy_seq<S: Serializer>(
    values: &[OsString],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|value| value.to_string_lossy()))
}

pub fn serialize_lossy_map<S: Serializer>(
    values: &BTreeMap<String, OsString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        values
            .iter()
            .map(|(key, value)| (key, value.to_string_lossy())),
    )
}

/// Node name of the current host, as reported by `gethostname(2)`.
pub fn hostname() -> std::io::Result<String> {
    let mut buffer = [0u8; 256];
    let result = unsafe { libc::gethostname(buffer.as_mut_ptr().cast(), buffer.len()) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    // Truncated names are not guaranteed to be NUL-terminated.
    buffer[buffer.len() - 1] = 0;
    let name = CStr::from_bytes_until_nul(&buffer)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    Ok(name.to_string_lossy().into_owned())
}
