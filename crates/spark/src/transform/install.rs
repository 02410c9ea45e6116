//! Package-install hint rewriting.
//!
//! Library-install calls embedded in cell content are replaced with a
//! commented installation hint; no executable install statement is produced.

use once_cell::sync::Lazy;
use regex::Regex;

/// Content prefix recognized as an install call (an optional comment marker
/// in front is tolerated, matching already-commented calls).
const INSTALL_CALL: &str = "dbutils.library.installPyPI";

static INSTALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(.*?)".*version\s*=\s*"(.*?)""#).expect("install hint pattern"));

/// Outcome of scanning one content line for an install call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallScan {
    /// The line is an install call with extractable package and version.
    Hint {
        /// Extracted package name.
        package: String,
        /// Extracted version string.
        version: String,
    },
    /// The line is an install call but its fields cannot be extracted;
    /// callers degrade it to ordinary content.
    Malformed,
    /// Not an install call.
    NotInstall,
}

/// Scans a content line for a library-install call.
pub fn scan_line(line: &str) -> InstallScan {
    let trimmed = line.trim_start();
    let call = trimmed
        .strip_prefix("# ")
        .unwrap_or(trimmed)
        .trim_start();
    if !call.starts_with(INSTALL_CALL) {
        return InstallScan::NotInstall;
    }
    match INSTALL_RE.captures(call) {
        Some(captures) => InstallScan::Hint {
            package: captures[1].to_string(),
            version: captures[2].to_string(),
        },
        None => InstallScan::Malformed,
    }
}

/// Renders the commented installation hint.
pub fn render_hint(package: &str, version: &str) -> String {
    format!("# !pip install {package}=={version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_package_and_version() {
        let scan = scan_line(r#"dbutils.library.installPyPI("seaborn", version = "0.9.0")"#);
        assert_eq!(
            scan,
            InstallScan::Hint {
                package: "seaborn".to_string(),
                version: "0.9.0".to_string(),
            }
        );
    }

    #[test]
    fn accepts_commented_install_calls() {
        let scan = scan_line(r#"# dbutils.library.installPyPI("pandas", version="1.1.5")"#);
        assert_eq!(
            scan,
            InstallScan::Hint {
                package: "pandas".to_string(),
                version: "1.1.5".to_string(),
            }
        );
    }

    #[test]
    fn install_call_without_version_is_malformed() {
        let scan = scan_line(r#"dbutils.library.installPyPI("seaborn")"#);
        assert_eq!(scan, InstallScan::Malformed);
    }

    #[test]
    fn ordinary_content_is_not_an_install() {
        assert_eq!(scan_line("x = 1"), InstallScan::NotInstall);
        assert_eq!(scan_line(""), InstallScan::NotInstall);
        // Mentioning the call in a string is still matched by prefix only.
        assert_eq!(
            scan_line(r#"print("dbutils.library.installPyPI")"#),
            InstallScan::NotInstall
        );
    }

    #[test]
    fn hint_renders_pip_install_line() {
        assert_eq!(
            render_hint("seaborn", "0.9.0"),
            "# !pip install seaborn==0.9.0"
        );
    }
}
