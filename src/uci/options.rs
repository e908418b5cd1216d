//! Declared UCI options and their current values.
//!
//! Options are declared once at start-up, then shared behind an `Arc`: the
//! command loop writes them through `setoption`, the responder reads them
//! while formatting. Names are matched case-insensitively, as UCI requires.
//!
//! A value may be set for a named context (for example one player in a
//! multi-game match). Reads in that context fall back to the global value.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("Unknown option: '{0}'")]
    Unknown(String),
    #[error("Invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },
    #[error("Value {value} for option '{name}' is outside {min}..{max}")]
    OutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Type and default of a declared option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Check { default: bool },
    Spin { default: i64, min: i64, max: i64 },
    Combo { default: String, choices: Vec<String> },
    String { default: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Int(i) => write!(f, "{i}"),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDecl {
    pub name: String,
    pub kind: OptionKind,
}

impl OptionDecl {
    /// The `option name ... type ...` line announced in reply to `uci`.
    #[must_use]
    pub fn uci_declaration(&self) -> String {
        let name = &self.name;
        match &self.kind {
            OptionKind::Check { default } => {
                format!("option name {name} type check default {default}")
            }
            OptionKind::Spin { default, min, max } => {
                format!("option name {name} type spin default {default} min {min} max {max}")
            }
            OptionKind::Combo { default, choices } => {
                let mut line = format!("option name {name} type combo default {default}");
                for choice in choices {
                    line.push_str(" var ");
                    line.push_str(choice);
                }
                line
            }
            OptionKind::String { default } => {
                let default = if default.is_empty() { "<empty>" } else { default };
                format!("option name {name} type string default {default}")
            }
        }
    }

    fn default_value(&self) -> OptionValue {
        match &self.kind {
            OptionKind::Check { default } => OptionValue::Bool(*default),
            OptionKind::Spin { default, .. } => OptionValue::Int(*default),
            OptionKind::Combo { default, .. } | OptionKind::String { default } => {
                OptionValue::Text(default.clone())
            }
        }
    }

    fn parse_value(&self, value: &str) -> Result<OptionValue, OptionError> {
        let invalid = || OptionError::InvalidValue {
            name: self.name.clone(),
            value: value.to_string(),
        };
        match &self.kind {
            OptionKind::Check { .. } => match value.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(OptionValue::Bool(true)),
                "false" | "0" => Ok(OptionValue::Bool(false)),
                _ => Err(invalid()),
            },
            OptionKind::Spin { min, max, .. } => {
                let v: i64 = value.parse().map_err(|_| invalid())?;
                if v < *min || v > *max {
                    return Err(OptionError::OutOfRange {
                        name: self.name.clone(),
                        value: v,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(OptionValue::Int(v))
            }
            OptionKind::Combo { choices, .. } => choices
                .iter()
                .find(|c| c.eq_ignore_ascii_case(value))
                .map(|c| OptionValue::Text(c.clone()))
                .ok_or_else(invalid),
            OptionKind::String { .. } => Ok(OptionValue::Text(value.to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct Values {
    global: HashMap<String, OptionValue>,
    contexts: HashMap<String, HashMap<String, OptionValue>>,
}

/// In-memory option store.
#[derive(Debug, Default)]
pub struct OptionStore {
    declared: Vec<OptionDecl>,
    values: RwLock<Values>,
}

fn key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

impl OptionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option. Re-declaring a name replaces the earlier declaration.
    pub fn declare(&mut self, name: &str, kind: OptionKind) -> &mut Self {
        let decl = OptionDecl {
            name: name.to_string(),
            kind,
        };
        self.values
            .get_mut()
            .global
            .insert(key(name), decl.default_value());
        match self.declared.iter_mut().find(|d| key(&d.name) == key(name)) {
            Some(existing) => *existing = decl,
            None => self.declared.push(decl),
        }
        self
    }

    /// Declared options in declaration order.
    #[must_use]
    pub fn declared(&self) -> &[OptionDecl] {
        &self.declared
    }

    /// Declaration lines for every option, in declaration order.
    #[must_use]
    pub fn uci_declarations(&self) -> Vec<String> {
        self.declared.iter().map(OptionDecl::uci_declaration).collect()
    }

    fn find(&self, name: &str) -> Option<&OptionDecl> {
        let name = key(name);
        self.declared.iter().find(|d| key(&d.name) == name)
    }

    /// Set an option from `setoption`. An empty context sets the global value.
    pub fn set_uci_option(&self, name: &str, value: &str, context: &str) -> Result<(), OptionError> {
        let decl = self
            .find(name)
            .ok_or_else(|| OptionError::Unknown(name.to_string()))?;
        let parsed = decl.parse_value(value)?;

        let mut values = self.values.write();
        if context.is_empty() {
            log::info!("option '{}' set to {parsed}", decl.name);
            values.global.insert(key(&decl.name), parsed);
        } else {
            log::info!("option '{}' set to {parsed} in context '{context}'", decl.name);
            values
                .contexts
                .entry(context.to_string())
                .or_default()
                .insert(key(&decl.name), parsed);
        }
        Ok(())
    }

    /// Current global value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<OptionValue> {
        self.values.read().global.get(&key(name)).cloned()
    }

    /// Value in a context, falling back to the global value.
    #[must_use]
    pub fn get_in_context(&self, context: &str, name: &str) -> Option<OptionValue> {
        let values = self.values.read();
        let name = key(name);
        values
            .contexts
            .get(context)
            .and_then(|ctx| ctx.get(&name))
            .or_else(|| values.global.get(&name))
            .cloned()
    }

    /// Current value of a check option; `false` when unset or not a check.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> bool {
        matches!(self.get(name), Some(OptionValue::Bool(true)))
    }

    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            OptionValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> OptionStore {
        let mut store = OptionStore::new();
        store
            .declare("UCI_ShowWDL", OptionKind::Check { default: true })
            .declare(
                "Hash",
                OptionKind::Spin {
                    default: 16,
                    min: 1,
                    max: 1024,
                },
            )
            .declare(
                "Style",
                OptionKind::Combo {
                    default: "Normal".to_string(),
                    choices: vec!["Normal".to_string(), "Risky".to_string()],
                },
            )
            .declare(
                "LogFile",
                OptionKind::String {
                    default: String::new(),
                },
            );
        store
    }

    #[test]
    fn test_declarations() {
        assert_eq!(
            store().uci_declarations(),
            vec![
                "option name UCI_ShowWDL type check default true",
                "option name Hash type spin default 16 min 1 max 1024",
                "option name Style type combo default Normal var Normal var Risky",
                "option name LogFile type string default <empty>",
            ]
        );
    }

    #[test]
    fn test_defaults_and_updates() {
        let store = store();
        assert!(store.get_bool("UCI_ShowWDL"));
        assert_eq!(store.get_int("Hash"), Some(16));

        store.set_uci_option("uci_showwdl", "false", "").unwrap();
        store.set_uci_option("hash", "256", "").unwrap();
        store.set_uci_option("Style", "risky", "").unwrap();
        store.set_uci_option("LogFile", "/tmp/my log.txt", "").unwrap();

        assert!(!store.get_bool("UCI_ShowWDL"));
        assert_eq!(store.get_int("Hash"), Some(256));
        assert_eq!(store.get("style"), Some(OptionValue::Text("Risky".to_string())));
        assert_eq!(
            store.get("LogFile"),
            Some(OptionValue::Text("/tmp/my log.txt".to_string()))
        );
    }

    #[test]
    fn test_rejected_values_leave_store_unchanged() {
        let store = store();
        assert_eq!(
            store.set_uci_option("Nope", "1", ""),
            Err(OptionError::Unknown("Nope".to_string()))
        );
        assert!(matches!(
            store.set_uci_option("Hash", "abc", ""),
            Err(OptionError::InvalidValue { .. })
        ));
        assert!(matches!(
            store.set_uci_option("Hash", "4096", ""),
            Err(OptionError::OutOfRange { value: 4096, .. })
        ));
        assert!(store.set_uci_option("UCI_ShowWDL", "maybe", "").is_err());
        assert!(store.set_uci_option("Style", "Solid", "").is_err());

        assert_eq!(store.get_int("Hash"), Some(16));
        assert!(store.get_bool("UCI_ShowWDL"));
    }

    #[test]
    fn test_context_values_fall_back_to_global() {
        let store = store();
        store.set_uci_option("Hash", "64", "player1").unwrap();

        assert_eq!(store.get_in_context("player1", "Hash"), Some(OptionValue::Int(64)));
        assert_eq!(store.get_in_context("player2", "Hash"), Some(OptionValue::Int(16)));
        assert_eq!(store.get_int("Hash"), Some(16));
    }

    #[test]
    fn test_redeclaration_replaces() {
        let mut store = store();
        store.declare("hash", OptionKind::Spin { default: 8, min: 1, max: 8 });
        assert_eq!(store.declared().len(), 4);
        assert_eq!(store.get_int("Hash"), Some(8));
    }
}
