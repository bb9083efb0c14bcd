//! "New connection" form: field editing and validation.

use crate::db::{Connection, ConnectionStatus};
use crate::error::{Error, Result};
use std::fmt;

/// Default host offered by a fresh form.
pub const DEFAULT_HOST: &str = "localhost";

/// Default port offered by a fresh form.
pub const DEFAULT_PORT: u16 = 5432;

/// A field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Connection display name.
    Name,
    /// Server host.
    Host,
    /// Server port.
    Port,
    /// Database to open.
    Database,
    /// Login user.
    Username,
    /// Login password.
    Password,
}

impl Field {
    /// All fields, in tab order.
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Host,
        Field::Port,
        Field::Database,
        Field::Username,
        Field::Password,
    ];

    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Host => "Host",
            Field::Port => "Port",
            Field::Database => "Database",
            Field::Username => "Username",
            Field::Password => "Password",
        }
    }

    /// Message shown when the field is missing or invalid.
    pub fn requirement(self) -> &'static str {
        match self {
            Field::Name => "Give your connection a name",
            Field::Host => "Where is your database hosted?",
            Field::Port => "Which port should we use?",
            Field::Database => "Which database do you want to connect to?",
            Field::Username => "What's your database username?",
            Field::Password => "What's your database password?",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// The following field, wrapping around.
    pub fn next(self) -> Field {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The preceding field, wrapping around.
    pub fn prev(self) -> Field {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The offending field.
    pub field: Field,
    /// What the user should fix.
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}

/// Editable state of the new-connection dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionForm {
    /// Field with keyboard focus.
    pub focus: Field,
    /// Errors from the last submit attempt.
    pub errors: Vec<FieldError>,
    name: String,
    host: String,
    port: String,
    database: String,
    username: String,
    password: String,
}

impl Default for ConnectionForm {
    fn default() -> Self {
        Self {
            focus: Field::Name,
            errors: Vec::new(),
            name: String::new(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            database: String::new(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl ConnectionForm {
    /// Current text of a field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Host => &self.host,
            Field::Port => &self.port,
            Field::Database => &self.database,
            Field::Username => &self.username,
            Field::Password => &self.password,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Host => &mut self.host,
            Field::Port => &mut self.port,
            Field::Database => &mut self.database,
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    /// Replace the text of a field.
    pub fn set(&mut self, field: Field, value: &str) {
        *self.value_mut(field) = value.to_string();
    }

    /// Type a character into the focused field.
    pub fn insert_char(&mut self, c: char) {
        if self.focus == Field::Port && !c.is_ascii_digit() {
            return;
        }
        let focus = self.focus;
        self.value_mut(focus).push(c);
    }

    /// Delete the last character of the focused field.
    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.value_mut(focus).pop();
    }

    /// Move focus to the next field.
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    /// Move focus to the previous field.
    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// The first error recorded for `field`, if any.
    pub fn error_for(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Check every field, returning one error per invalid field.
    pub fn validate(&self) -> Vec<FieldError> {
        Field::ALL
            .iter()
            .filter(|field| !self.is_valid(**field))
            .map(|field| FieldError {
                field: *field,
                message: field.requirement(),
            })
            .collect()
    }

    fn is_valid(&self, field: Field) -> bool {
        match field {
            Field::Port => self.port.trim().parse::<u16>().is_ok_and(|p| p >= 1),
            Field::Password => !self.password.is_empty(),
            other => !self.value(other).trim().is_empty(),
        }
    }

    /// Validate and build the connection; records errors on failure.
    pub fn submit(&mut self) -> Result<Connection> {
        self.errors = self.validate();
        if let Some(first) = self.errors.first() {
            self.focus = first.field;
            return Err(Error::InvalidConnection(first.clone()));
        }
        let port = self.port.trim().parse::<u16>().ok();
        let connection = Connection {
            name: self.name.trim().to_string(),
            status: ConnectionStatus::Disconnected,
            host: Some(self.host.trim().to_string()),
            port,
            database: Some(self.database.trim().to_string()),
        };
        tracing::info!(
            name = %connection.name,
            host = %self.host.trim(),
            port = ?port,
            database = %self.database.trim(),
            username = %self.username.trim(),
            "creating connection"
        );
        *self = Self::default();
        Ok(connection)
    }
}
