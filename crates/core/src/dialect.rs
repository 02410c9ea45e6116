//! Dialect detection and fixed token tables.
//!
//! Every export carries one of three comment dialects, chosen by the host
//! language of the exported document. The dialect fixes every structural
//! token of the file: the header line, the cell separator, the title
//! annotation, and the directive marker.

use crate::language::Language;

/// Comment dialect of a notebook export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `#`-commented exports (python source files).
    Python,
    /// `--`-commented exports (sql source files).
    Sql,
    /// `//`-commented exports (scala source files).
    Scala,
}

/// All dialects in detection order.
pub const ALL_DIALECTS: [Dialect; 3] = [Dialect::Python, Dialect::Sql, Dialect::Scala];

impl Dialect {
    /// Comment marker framing every structural token of this dialect.
    pub fn marker(self) -> &'static str {
        match self {
            Dialect::Python => "#",
            Dialect::Sql => "--",
            Dialect::Scala => "//",
        }
    }

    /// Exact header text expected as the first non-blank line of an export.
    pub fn header(self) -> &'static str {
        match self {
            Dialect::Python => "# Databricks notebook source",
            Dialect::Sql => "-- Databricks notebook source",
            Dialect::Scala => "// Databricks notebook source",
        }
    }

    /// Cell separator prefix. Full separator lines read
    /// `<marker> COMMAND ----------` but are matched on this prefix.
    pub fn separator_prefix(self) -> &'static str {
        match self {
            Dialect::Python => "# COMMAND",
            Dialect::Sql => "-- COMMAND",
            Dialect::Scala => "// COMMAND",
        }
    }

    /// Title annotation prefix, a no-op directive carrying a display title.
    pub fn title_prefix(self) -> &'static str {
        match self {
            Dialect::Python => "# DBTITLE",
            Dialect::Sql => "-- DBTITLE",
            Dialect::Scala => "// DBTITLE",
        }
    }

    /// Directive marker prefix. Directive and continuation lines start with
    /// this token followed by a space (or nothing, for a blank continuation).
    pub fn magic_prefix(self) -> &'static str {
        match self {
            Dialect::Python => "# MAGIC",
            Dialect::Sql => "-- MAGIC",
            Dialect::Scala => "// MAGIC",
        }
    }

    /// Host language this dialect belongs to, used as the document default
    /// when the file extension gives no better answer.
    pub fn host_language(self) -> Language {
        match self {
            Dialect::Python => Language::Python,
            Dialect::Sql => Language::Sql,
            Dialect::Scala => Language::Scala,
        }
    }

    /// Detects the dialect whose header matches the given line, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbx_core::Dialect;
    ///
    /// assert_eq!(
    ///     Dialect::from_header("# Databricks notebook source"),
    ///     Some(Dialect::Python)
    /// );
    /// assert_eq!(Dialect::from_header("print('hello')"), None);
    /// ```
    pub fn from_header(line: &str) -> Option<Dialect> {
        let trimmed = line.trim();
        ALL_DIALECTS.iter().copied().find(|d| d.header() == trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_dialect_header() {
        assert_eq!(
            Dialect::from_header("# Databricks notebook source"),
            Some(Dialect::Python)
        );
        assert_eq!(
            Dialect::from_header("-- Databricks notebook source"),
            Some(Dialect::Sql)
        );
        assert_eq!(
            Dialect::from_header("// Databricks notebook source"),
            Some(Dialect::Scala)
        );
    }

    #[test]
    fn tolerates_surrounding_whitespace_in_header() {
        assert_eq!(
            Dialect::from_header("  # Databricks notebook source  "),
            Some(Dialect::Python)
        );
    }

    #[test]
    fn rejects_non_header_lines() {
        assert_eq!(Dialect::from_header(""), None);
        assert_eq!(Dialect::from_header("# COMMAND ----------"), None);
        assert_eq!(Dialect::from_header("SELECT 1"), None);
        // Header of one dialect with the marker of another is not a header.
        assert_eq!(Dialect::from_header("# Databricks notebook"), None);
    }

    #[test]
    fn tokens_share_the_dialect_marker() {
        for dialect in ALL_DIALECTS {
            assert!(dialect.header().starts_with(dialect.marker()));
            assert!(dialect.separator_prefix().starts_with(dialect.marker()));
            assert!(dialect.title_prefix().starts_with(dialect.marker()));
            assert!(dialect.magic_prefix().starts_with(dialect.marker()));
        }
    }
}
