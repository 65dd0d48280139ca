use std::path::{Path, PathBuf};

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("se", "ansab", "Ansab")
}

/// Hämta databassökväg
pub fn get_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("ansab.db"))
        .unwrap_or_else(|| PathBuf::from("ansab.db"))
}

/// Normalisera sökväg för visning
pub fn display_path(path: &Path) -> String {
    // Förkorta hemkatalogen till ~
    if let Some(home) = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()) {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Hämta filändelse
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
}

/// Kontrollera om en fil är JSON
pub fn is_json_file(path: &Path) -> bool {
    matches!(get_extension(path).as_deref(), Some("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_json_file() {
        assert!(is_json_file(Path::new("members.json")));
        assert!(is_json_file(Path::new("export.JSON")));
        assert!(!is_json_file(Path::new("members.csv")));
        assert!(!is_json_file(Path::new("members")));
    }

    #[test]
    fn test_database_path_file_name() {
        assert_eq!(
            get_database_path().file_name().and_then(|n| n.to_str()),
            Some("ansab.db")
        );
    }
}
