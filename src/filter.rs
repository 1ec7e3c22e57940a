use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category visibility switches. Everything is visible by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Filters {
    pub person: bool,
    pub software_system: bool,
    pub container: bool,
    pub component: bool,
    pub database: bool,
    pub external: bool,
    pub synchronous: bool,
    pub asynchronous: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            person: true,
            software_system: true,
            container: true,
            component: true,
            database: true,
            external: true,
            synchronous: true,
            asynchronous: true,
        }
    }
}

/// A partial filter update; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterPatch {
    pub person: Option<bool>,
    pub software_system: Option<bool>,
    pub container: Option<bool>,
    pub component: Option<bool>,
    pub database: Option<bool>,
    pub external: Option<bool>,
    pub synchronous: Option<bool>,
    pub asynchronous: Option<bool>,
}

impl FilterPatch {
    pub fn with(mut self, key: FilterKey, value: bool) -> Self {
        let slot = match key {
            FilterKey::Person => &mut self.person,
            FilterKey::SoftwareSystem => &mut self.software_system,
            FilterKey::Container => &mut self.container,
            FilterKey::Component => &mut self.component,
            FilterKey::Database => &mut self.database,
            FilterKey::External => &mut self.external,
            FilterKey::Synchronous => &mut self.synchronous,
            FilterKey::Asynchronous => &mut self.asynchronous,
        };
        *slot = Some(value);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Person,
    SoftwareSystem,
    Container,
    Component,
    Database,
    External,
    Synchronous,
    Asynchronous,
}

impl FilterKey {
    pub const ALL: [FilterKey; 8] = [
        FilterKey::Person,
        FilterKey::SoftwareSystem,
        FilterKey::Container,
        FilterKey::Component,
        FilterKey::Database,
        FilterKey::External,
        FilterKey::Synchronous,
        FilterKey::Asynchronous,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::SoftwareSystem => "softwareSystem",
            Self::Container => "container",
            Self::Component => "component",
            Self::Database => "database",
            Self::External => "external",
            Self::Synchronous => "synchronous",
            Self::Asynchronous => "asynchronous",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter '{0}' (expected one of person, softwareSystem, container, component, database, external, synchronous, asynchronous)")]
pub struct FilterParseError(pub String);

impl FromStr for FilterKey {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "person" | "people" => Ok(Self::Person),
            "softwaresystem" | "system" => Ok(Self::SoftwareSystem),
            "container" => Ok(Self::Container),
            "component" => Ok(Self::Component),
            "database" => Ok(Self::Database),
            "external" => Ok(Self::External),
            "synchronous" | "sync" => Ok(Self::Synchronous),
            "asynchronous" | "async" => Ok(Self::Asynchronous),
            _ => Err(FilterParseError(s.to_string())),
        }
    }
}

impl Filters {
    pub fn get(&self, key: FilterKey) -> bool {
        match key {
            FilterKey::Person => self.person,
            FilterKey::SoftwareSystem => self.software_system,
            FilterKey::Container => self.container,
            FilterKey::Component => self.component,
            FilterKey::Database => self.database,
            FilterKey::External => self.external,
            FilterKey::Synchronous => self.synchronous,
            FilterKey::Asynchronous => self.asynchronous,
        }
    }

    pub fn set(&mut self, key: FilterKey, value: bool) {
        *self = self.patched(&FilterPatch::default().with(key, value));
    }

    pub fn toggle(&mut self, key: FilterKey) {
        self.set(key, !self.get(key));
    }

    pub fn apply(&mut self, patch: &FilterPatch) {
        *self = self.patched(patch);
    }

    fn patched(&self, patch: &FilterPatch) -> Self {
        Self {
            person: patch.person.unwrap_or(self.person),
            software_system: patch.software_system.unwrap_or(self.software_system),
            container: patch.container.unwrap_or(self.container),
            component: patch.component.unwrap_or(self.component),
            database: patch.database.unwrap_or(self.database),
            external: patch.external.unwrap_or(self.external),
            synchronous: patch.synchronous.unwrap_or(self.synchronous),
            asynchronous: patch.asynchronous.unwrap_or(self.asynchronous),
        }
    }

    pub fn all_enabled(&self) -> bool {
        FilterKey::ALL.iter().all(|key| self.get(*key))
    }
}
