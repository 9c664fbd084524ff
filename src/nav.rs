// src/nav.rs

use url::form_urlencoded;

use crate::schema::Column;

/// Where the user is in the drill-down. Carried between pages in the query
/// string; nothing else holds this state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    pub pole: Option<String>,
    pub specialite: Option<String>,
    pub groupe: Option<String>,
}

impl NavState {
    pub const POLE: &'static str = "pole";
    pub const SPECIALITE: &'static str = "specialite";
    pub const GROUPE: &'static str = "groupe";

    /// Parse `pole=…&specialite=…&groupe=…`. A leading `?` is allowed, unknown
    /// keys are ignored, blank values count as absent, the first occurrence of
    /// a key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                Self::POLE => &mut state.pole,
                Self::SPECIALITE => &mut state.specialite,
                Self::GROUPE => &mut state.groupe,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }
        state
    }

    /// Present fields in drill-down order, form-encoded, without a leading `?`.
    pub fn to_query(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [
            (Self::POLE, &self.pole),
            (Self::SPECIALITE, &self.specialite),
            (Self::GROUPE, &self.groupe),
        ] {
            if let Some(v) = value {
                ser.append_pair(key, v);
            }
        }
        ser.finish()
    }

    pub fn with_pole(&self, pole: &str) -> Self {
        Self {
            pole: Some(pole.to_string()),
            ..Self::default()
        }
    }

    pub fn with_specialite(&self, specialite: &str) -> Self {
        Self {
            pole: self.pole.clone(),
            specialite: Some(specialite.to_string()),
            groupe: None,
        }
    }

    pub fn with_groupe(&self, groupe: &str) -> Self {
        Self {
            groupe: Some(groupe.to_string()),
            ..self.clone()
        }
    }

    /// The deepest level that has been chosen, if any.
    pub fn depth(&self) -> Option<Column> {
        if self.groupe.is_some() {
            Some(Column::Groupe)
        } else if self.specialite.is_some() {
            Some(Column::Specialite)
        } else if self.pole.is_some() {
            Some(Column::Pole)
        } else {
            None
        }
    }
}
