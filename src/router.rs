// src/router.rs
//
// Route identifiers → handlers. Each handler reads what it needs from the
// NavState it is given and nothing else.

use std::{collections::BTreeMap, fmt, str::FromStr};

use tracing::{debug, instrument};

use crate::catalog::{Catalog, Entry, Schedule};
use crate::error::{CatalogError, Result};
use crate::nav::NavState;
use crate::schema::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Route {
    /// List of pôles.
    Poles,
    /// Spécialités of a pôle.
    Specialites,
    /// Groupes of a spécialité.
    Groupes,
    /// Timetable link of a groupe.
    Schedule,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Poles,
        Route::Specialites,
        Route::Groupes,
        Route::Schedule,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Route::Poles => "index",
            Route::Specialites => "pole",
            Route::Groupes => "specialite",
            Route::Schedule => "groupe",
        }
    }

    pub fn from_id(id: &str) -> Result<Self> {
        let id = id.trim().trim_end_matches(".html");
        Route::ALL
            .into_iter()
            .find(|r| r.id().eq_ignore_ascii_case(id))
            .ok_or_else(|| CatalogError::UnknownRoute { id: id.to_string() })
    }

    /// Route implied by how far the state has drilled down.
    pub fn for_state(state: &NavState) -> Self {
        match state.depth() {
            None => Route::Poles,
            Some(Column::Pole) => Route::Specialites,
            Some(Column::Specialite) => Route::Groupes,
            Some(_) => Route::Schedule,
        }
    }

    fn next(self) -> Option<Route> {
        match self {
            Route::Poles => Some(Route::Specialites),
            Route::Specialites => Some(Route::Groupes),
            Route::Groupes => Some(Route::Schedule),
            Route::Schedule => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Route {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Route::from_id(s)
    }
}

/// A clickable choice on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub label: String,
    /// `<route id>?<query>` of the page the card opens.
    pub href: String,
}

/// What a route renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Cards { title: String, cards: Vec<Card> },
    Schedule(Schedule),
    /// Nothing to show; not an error.
    Empty { message: String },
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Cards { title, cards } => {
                writeln!(f, "{title}")?;
                for card in cards {
                    writeln!(f, "  {}  ->  {}", card.label, card.href)?;
                }
                Ok(())
            }
            Page::Schedule(s) => {
                writeln!(f, "{} / {} / {}", s.pole, s.specialite, s.groupe)?;
                match &s.link {
                    Some(link) => writeln!(f, "  Emploi du temps : {link}"),
                    None => writeln!(f, "  Pas encore de lien pour ce groupe."),
                }
            }
            Page::Empty { message } => writeln!(f, "{message}"),
        }
    }
}

pub type Handler = fn(&Catalog, &NavState) -> Result<Page>;

/// Table of handlers keyed by route.
pub struct Router {
    handlers: BTreeMap<Route, Handler>,
}

impl Default for Router {
    fn default() -> Self {
        let mut router = Self::empty();
        router
            .register(Route::Poles, poles_page)
            .register(Route::Specialites, specialites_page)
            .register(Route::Groupes, groupes_page)
            .register(Route::Schedule, schedule_page);
        router
    }
}

impl Router {
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, route: Route, handler: Handler) -> &mut Self {
        self.handlers.insert(route, handler);
        self
    }

    #[instrument(level = "debug", skip(self, catalog), fields(query = %state.to_query()))]
    pub fn dispatch(&self, route: Route, catalog: &Catalog, state: &NavState) -> Result<Page> {
        let handler = self
            .handlers
            .get(&route)
            .ok_or_else(|| CatalogError::UnknownRoute {
                id: route.id().to_string(),
            })?;
        let page = handler(catalog, state)?;
        debug!(%route, "rendered page");
        Ok(page)
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or(CatalogError::MissingParameter { name })
}

fn cards(
    from: Route,
    entries: Vec<Entry>,
    title: String,
    empty: &str,
    child: impl Fn(&str) -> NavState,
) -> Page {
    if entries.is_empty() {
        return Page::Empty {
            message: empty.to_string(),
        };
    }
    let target = from.next().unwrap_or(from);
    let cards = entries
        .into_iter()
        .map(|e| Card {
            href: format!("{}?{}", target.id(), child(&e.label).to_query()),
            label: e.label,
        })
        .collect();
    Page::Cards { title, cards }
}

pub fn poles_page(catalog: &Catalog, state: &NavState) -> Result<Page> {
    Ok(cards(
        Route::Poles,
        catalog.poles()?,
        "Pôles".to_string(),
        "Aucun pôle trouvé.",
        |label| state.with_pole(label),
    ))
}

pub fn specialites_page(catalog: &Catalog, state: &NavState) -> Result<Page> {
    let pole = required(&state.pole, NavState::POLE)?;
    Ok(cards(
        Route::Specialites,
        catalog.specialites(pole)?,
        format!("Spécialités ({pole})"),
        "Aucune spécialité trouvée pour ce pôle.",
        |label| state.with_specialite(label),
    ))
}

pub fn groupes_page(catalog: &Catalog, state: &NavState) -> Result<Page> {
    let pole = required(&state.pole, NavState::POLE)?;
    let specialite = required(&state.specialite, NavState::SPECIALITE)?;
    Ok(cards(
        Route::Groupes,
        catalog.groupes(pole, specialite)?,
        format!("Groupes ({pole} / {specialite})"),
        "Aucun groupe trouvé pour cette spécialité.",
        |label| state.with_groupe(label),
    ))
}

pub fn schedule_page(catalog: &Catalog, state: &NavState) -> Result<Page> {
    let pole = required(&state.pole, NavState::POLE)?;
    let specialite = required(&state.specialite, NavState::SPECIALITE)?;
    let groupe = required(&state.groupe, NavState::GROUPE)?;
    Ok(match catalog.schedule(pole, specialite, groupe)? {
        Some(s) => Page::Schedule(s),
        None => Page::Empty {
            message: "Aucun emploi du temps trouvé pour ce groupe.".to_string(),
        },
    })
}
