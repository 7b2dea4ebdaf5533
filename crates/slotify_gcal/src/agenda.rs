// --- File: crates/slotify_gcal/src/agenda.rs ---
use serde::Serialize;
use slotify_config::CalendarConfig;

use crate::error::SlotError;

/// An agenda name together with the calendar that backs it.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAgenda {
    pub name: String,
    pub calendar_id: String,
}

/// Read-only agenda table, fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct AgendaResolver {
    entries: Vec<ResolvedAgenda>,
    default_agenda: Option<String>,
}

impl AgendaResolver {
    /// Builds a resolver from `(name, calendar_id)` pairs in definition order.
    pub fn new<I, N, C>(entries: I, default_agenda: Option<String>) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, calendar_id)| ResolvedAgenda {
                    name: name.into(),
                    calendar_id: calendar_id.into(),
                })
                .collect(),
            default_agenda: default_agenda
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Self {
        Self::new(
            config
                .agendas
                .iter()
                .map(|a| (a.name.clone(), a.calendar_id.clone())),
            config.default_agenda.clone(),
        )
    }

    /// Configured names, in definition order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// The name used when a request does not pick an agenda.
    pub fn default_name(&self) -> Option<&str> {
        self.default_agenda
            .as_deref()
            .or_else(|| self.entries.first().map(|e| e.name.as_str()))
    }

    /// Maps an optional agenda name to its calendar.
    ///
    /// A blank name counts as absent. Absent names fall back to the configured default,
    /// then to the first table entry.
    pub fn resolve(&self, agenda: Option<&str>) -> Result<ResolvedAgenda, SlotError> {
        let requested = agenda.map(str::trim).filter(|a| !a.is_empty());
        let name = requested.or_else(|| self.default_name());

        name.and_then(|name| self.entries.iter().find(|e| e.name == name))
            .cloned()
            .ok_or_else(|| SlotError::UnknownAgenda {
                requested: name.map(str::to_string),
                valid: self.names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(default: Option<&str>) -> AgendaResolver {
        AgendaResolver::new(
            vec![("clinic", "clinic@group"), ("salon", "salon@group")],
            default.map(str::to_string),
        )
    }

    #[test]
    fn test_explicit_name() {
        let agenda = resolver(None).resolve(Some(" salon ")).unwrap();
        assert_eq!(agenda.name, "salon");
        assert_eq!(agenda.calendar_id, "salon@group");
    }

    #[test]
    fn test_absent_name_uses_default_then_first() {
        assert_eq!(resolver(Some("salon")).resolve(None).unwrap().name, "salon");
        assert_eq!(resolver(None).resolve(None).unwrap().name, "clinic");
        assert_eq!(resolver(None).resolve(Some("  ")).unwrap().name, "clinic");
    }

    #[test]
    fn test_unknown_name_lists_valid_names_in_order() {
        let err = resolver(None).resolve(Some("gym")).unwrap_err();
        assert_eq!(
            err,
            SlotError::UnknownAgenda {
                requested: Some("gym".into()),
                valid: vec!["clinic".into(), "salon".into()],
            }
        );
    }

    #[test]
    fn test_default_pointing_nowhere_fails() {
        let err = resolver(Some("gone")).resolve(None).unwrap_err();
        assert!(matches!(err, SlotError::UnknownAgenda { requested: Some(ref n), .. } if n == "gone"));
    }

    #[test]
    fn test_empty_table() {
        let err = AgendaResolver::default().resolve(None).unwrap_err();
        assert_eq!(
            err,
            SlotError::UnknownAgenda {
                requested: None,
                valid: vec![],
            }
        );
    }
}
