/// Connection settings for the roadmap store.
///
/// The URL is resolved by the caller (CLI flag, environment, or config
/// file); this type only carries it and derives the URLs the bootstrap
/// path needs.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full PostgreSQL connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// Connection URL assumed when nothing else is configured.
    pub const DEFAULT_URL: &str = "postgresql://localhost:5432/studymap";

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// The database name, taken from the URL's final path segment.
    pub fn database_name(&self) -> Option<&str> {
        let (_, name) = self.database_url.rsplit_once('/')?;
        (!name.is_empty()).then_some(name)
    }

    /// The same server with the path swapped for the `postgres` maintenance
    /// database. `CREATE DATABASE` and `DROP DATABASE` are issued there.
    pub fn maintenance_url(&self) -> String {
        match self.database_url.rsplit_once('/') {
            Some((server, _)) => format!("{server}/postgres"),
            None => self.database_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_name_is_last_path_segment() {
        let cfg = DbConfig::new("postgresql://localhost:5432/mydb");
        assert_eq!(cfg.database_name(), Some("mydb"));

        let cfg = DbConfig::new("postgresql://remotehost:5433/other");
        assert_eq!(cfg.database_name(), Some("other"));
    }

    #[test]
    fn trailing_slash_has_no_database_name() {
        let cfg = DbConfig::new("postgresql://localhost:5432/");
        assert_eq!(cfg.database_name(), None);
    }

    #[test]
    fn maintenance_url_targets_postgres_db() {
        let cfg = DbConfig::new(DbConfig::DEFAULT_URL);
        assert_eq!(cfg.maintenance_url(), "postgresql://localhost:5432/postgres");
    }
}
