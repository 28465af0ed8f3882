//! Submodule defining the changeset template configuration.

use chrono::NaiveDateTime;

/// Author written on the generated changeset when none is configured.
pub const DEFAULT_AUTHOR: &str = "your_author";
/// Prefix of the generated changeset id.
pub const DEFAULT_ID_PREFIX: &str = "your_id_";
/// Version of the `dbchangelog` XSD referenced by the document.
pub const DEFAULT_XSD_VERSION: &str = "4.26";
/// Format of the 14-digit timestamp appended to the changeset id.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Immutable template values for the generated `databaseChangeLog`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLogConfig {
    author: String,
    id_prefix: String,
    xsd_version: String,
}

impl Default for ChangeLogConfig {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.into(),
            id_prefix: DEFAULT_ID_PREFIX.into(),
            xsd_version: DEFAULT_XSD_VERSION.into(),
        }
    }
}

impl ChangeLogConfig {
    /// Sets the changeset author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the prefix placed before the timestamp in the changeset id.
    #[must_use]
    pub fn with_id_prefix(mut self, id_prefix: impl Into<String>) -> Self {
        self.id_prefix = id_prefix.into();
        self
    }

    /// Sets the `dbchangelog` XSD version, e.g. `4.26`.
    #[must_use]
    pub fn with_xsd_version(mut self, xsd_version: impl Into<String>) -> Self {
        self.xsd_version = xsd_version.into();
        self
    }

    /// Returns the changeset author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the `dbchangelog` XSD version.
    #[must_use]
    pub fn xsd_version(&self) -> &str {
        &self.xsd_version
    }

    /// Builds the changeset id for a run started at `at`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use sql_to_liquibase::changelog::ChangeLogConfig;
    ///
    /// let at = NaiveDate::from_ymd_opt(2024, 3, 9)
    ///     .unwrap()
    ///     .and_hms_opt(7, 5, 0)
    ///     .unwrap();
    /// assert_eq!(ChangeLogConfig::default().changeset_id(at), "your_id_20240309070500");
    /// ```
    #[must_use]
    pub fn changeset_id(&self, at: NaiveDateTime) -> String {
        format!("{}{}", self.id_prefix, at.format(TIMESTAMP_FORMAT))
    }
}
