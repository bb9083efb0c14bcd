//! Sample connections and object catalog shown in the sidebar.
//!
//! There is no real database behind querypad: connections and schemas are
//! fixed sample data, and [`query`] fakes the execution service.

pub mod query;

use std::fmt;

/// Whether a saved connection is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Connected.
    Connected,
    /// Not connected.
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// A saved connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Display name.
    pub name: String,
    /// Current status.
    pub status: ConnectionStatus,
    /// Host, when known (sample connections have none).
    pub host: Option<String>,
    /// Port, when known.
    pub port: Option<u16>,
    /// Default database, when known.
    pub database: Option<String>,
}

impl Connection {
    fn sample(name: &str, status: ConnectionStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
            host: None,
            port: None,
            database: None,
        }
    }
}

/// A database with its tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    /// Database name.
    pub name: String,
    /// Tables, in display order.
    pub tables: Vec<Table>,
}

/// A table with its column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Column names, in display order.
    pub columns: Vec<String>,
}

fn table(name: &str, columns: &[&str]) -> Table {
    Table {
        name: name.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
    }
}

/// The saved connections.
pub fn sample_connections() -> Vec<Connection> {
    vec![
        Connection::sample("Production DB", ConnectionStatus::Connected),
        Connection::sample("Development DB", ConnectionStatus::Disconnected),
    ]
}

/// The databases visible through the active connection.
pub fn sample_databases() -> Vec<Database> {
    vec![
        Database {
            name: "ecommerce_db".to_string(),
            tables: vec![
                table("users", &["id", "username", "email", "created_at"]),
                table("products", &["id", "name", "price", "stock"]),
                table("orders", &["id", "user_id", "total", "status"]),
            ],
        },
        Database {
            name: "analytics_db".to_string(),
            tables: vec![
                table("events", &["id", "event_type", "timestamp"]),
                table("metrics", &["id", "name", "value", "date"]),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_connections() {
        let conns = sample_connections();
        assert_eq!(conns.len(), 2);
        assert_eq!(conns[0].status, ConnectionStatus::Connected);
        assert_eq!(conns[1].status.to_string(), "disconnected");
    }

    #[test]
    fn test_sample_databases() {
        let dbs = sample_databases();
        assert_eq!(dbs[0].name, "ecommerce_db");
        assert_eq!(dbs[0].tables[0].columns, vec!["id", "username", "email", "created_at"]);
        assert_eq!(dbs[1].tables.len(), 2);
    }
}
