//! Loading the directory from a seed file.

use crate::error::SeedError;
use hrdesk_access::{DirectorySeed, MemoryDirectory};
use rootcause::prelude::Report;
use std::path::Path;

/// Builds the directory from `path`, or an empty one when no path is given.
///
/// # Errors
///
/// Returns a `SeedError` if the file cannot be read or parsed.
pub fn load_directory(path: Option<&Path>) -> Result<MemoryDirectory, Report<SeedError>> {
    let Some(path) = path else {
        return Ok(MemoryDirectory::new());
    };

    let raw = std::fs::read_to_string(path).map_err(|e| SeedError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let seed: DirectorySeed = serde_json::from_str(&raw).map_err(|e| SeedError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let directory = MemoryDirectory::from_seed(seed);
    let (roles, employees, users) = directory.counts();
    tracing::info!(
        path = %path.display(),
        roles,
        employees,
        users,
        "Loaded directory seed"
    );
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrdesk_access::PrincipalDirectory;
    use hrdesk_core::UserId;
    use std::io::Write;

    #[test]
    fn no_path_gives_empty_directory() {
        let directory = load_directory(None).expect("load");
        assert_eq!(directory.counts(), (0, 0, 0));
    }

    #[test]
    fn loads_records_from_file() {
        let role = ulid::Ulid::new();
        let employee = ulid::Ulid::new();
        let user = ulid::Ulid::new();
        let json = format!(
            r#"{{
                "roles": [{{"id": "{role}", "title": "Accountant"}}],
                "employees": [{{"id": "{employee}", "fullname": "Judy Ray", "role_id": "{role}"}}],
                "users": [{{"id": "{user}", "name": "judy", "employee_id": "{employee}"}}]
            }}"#
        );
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write");

        let directory = load_directory(Some(file.path())).expect("load");
        assert_eq!(directory.counts(), (1, 1, 1));

        let principal = directory
            .principal(UserId::from_ulid(user))
            .expect("lookup")
            .expect("user exists");
        assert_eq!(principal.name(), "judy");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");

        let err = load_directory(Some(&path)).expect_err("file does not exist");
        assert!(matches!(err.current_context(), SeedError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"{ not json").expect("write");

        let err = load_directory(Some(file.path())).expect_err("invalid json");
        assert!(matches!(err.current_context(), SeedError::Parse { .. }));
    }
}
