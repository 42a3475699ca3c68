//! Display labels for folders, breadcrumbs and providers.

/// Drop everything from the first `.` that is followed by at least one
/// character. Used by breadcrumb labels: `report.v2.pdf` becomes `report`.
pub fn trim_extensions(name: &str) -> &str {
    match name.find('.') {
        Some(pos) if pos + 1 < name.len() => &name[..pos],
        _ => name,
    }
}

/// Drop the last `.`-suffix. Used by tree node labels: `report.v2.pdf`
/// becomes `report.v2`.
pub fn trim_last_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[..pos],
        None => name,
    }
}

/// Human-readable name of a sync provider connection.
pub fn connection_label(provider: &str) -> &str {
    match provider {
        "Google" => "Google Drive",
        "Azure" => "Sharepoint",
        "DropBox" => "Dropbox",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_extensions() {
        assert_eq!(trim_extensions("report.v2.pdf"), "report");
        assert_eq!(trim_extensions("folder"), "folder");
        assert_eq!(trim_extensions("trailing."), "trailing.");
        assert_eq!(trim_extensions("a.b."), "a");
    }

    #[test]
    fn test_trim_last_extension() {
        assert_eq!(trim_last_extension("report.v2.pdf"), "report.v2");
        assert_eq!(trim_last_extension("folder"), "folder");
    }

    #[test]
    fn test_connection_label() {
        assert_eq!(connection_label("Google"), "Google Drive");
        assert_eq!(connection_label("Azure"), "Sharepoint");
        assert_eq!(connection_label("Notion"), "Notion");
    }
}
