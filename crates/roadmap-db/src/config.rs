/// Database configuration.
///
/// The CLI resolves the URL from its flag, `ROADMAP_DATABASE_URL`, the config
/// file, or [`DbConfig::DEFAULT_URL`], in that order.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full SQLite connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// The connection URL used when nothing else is configured.
    pub const DEFAULT_URL: &str = "sqlite://roadmap.db";

    /// Build a config from an explicit URL.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Build a config pointing at a database file on disk.
    pub fn for_path(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(format!("sqlite://{}", path.as_ref().display()))
    }
}
