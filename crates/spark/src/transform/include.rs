//! Inclusion-directive path algebra.
//!
//! `%run` arguments are relative paths: a leading `./` stays at the
//! document's folder, each leading `../` climbs one folder. The emitted
//! module identifier is the dotted remainder after those tokens; segment
//! characters invalid in an identifier are normalized away.

/// A resolved inclusion target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    /// Dotted module identifier.
    pub module: String,
    /// Folders climbed by leading `../` tokens.
    pub levels_up: usize,
}

/// Parses an inclusion argument into a module identifier.
///
/// Returns `None` when the argument cannot be tokenized into path segments
/// (empty, or nothing left after separators), which callers degrade to a
/// passthrough content line.
///
/// # Examples
///
/// ```
/// use nbx_spark::transform::include::parse_include;
///
/// let inc = parse_include("./sub/helper").unwrap();
/// assert_eq!(inc.module, "sub.helper");
/// assert_eq!(inc.levels_up, 0);
///
/// let inc = parse_include("../shared/utils").unwrap();
/// assert_eq!(inc.module, "shared.utils");
/// assert_eq!(inc.levels_up, 1);
/// ```
pub fn parse_include(arg: &str) -> Option<Include> {
    // Quotes around the whole argument come off before token handling so a
    // quoted `./` prefix still counts.
    let mut rest = arg.trim().trim_matches(|c| c == '"' || c == '\'');
    let mut levels_up = 0;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("../") {
            levels_up += 1;
            rest = stripped;
        } else {
            break;
        }
    }
    // Workspace-absolute arguments drop the leading slash.
    rest = rest.trim_start_matches('/');

    let segments: Vec<String> = rest
        .split('/')
        .map(sanitize_segment)
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        return None;
    }
    Some(Include {
        module: segments.join("."),
        levels_up,
    })
}

/// Normalizes one path segment into identifier characters: quotes and
/// whitespace are removed, hyphens become underscores.
fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| *c != '"' && *c != '\'' && !c.is_whitespace())
        .map(|c| if c == '-' { '_' } else { c })
        .collect()
}

/// Renders an import-all statement for the given target language comment
/// conventions: python form by default, scala import syntax for scala.
pub fn render_import(module: &str, scala: bool) -> String {
    if scala {
        format!("import {module}._")
    } else {
        format!("from {module} import *")
    }
}
