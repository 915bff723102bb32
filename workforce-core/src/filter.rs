//! Hierarchical filter context and partial updates.
//!
//! A `FilterContext` is the scoping selection that drives every query on a
//! page. It is treated as an immutable snapshot per refresh cycle; changes
//! go through a `FilterPatch` applied by the filter state manager.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used on the wire and in route payloads.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One addressable field of the filter context.
///
/// The string form is the wire name used in query arguments, route
/// payloads and URL query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Company,
    HoldingCompany,
    Branch,
    Department,
    Designation,
    NationalityGroup,
    AsOnDate,
    #[serde(rename = "search")]
    SearchText,
    #[serde(rename = "is_saudi")]
    EmployeeType,
}

impl FilterKey {
    pub const ALL: [FilterKey; 9] = [
        FilterKey::Company,
        FilterKey::HoldingCompany,
        FilterKey::Branch,
        FilterKey::Department,
        FilterKey::Designation,
        FilterKey::NationalityGroup,
        FilterKey::AsOnDate,
        FilterKey::SearchText,
        FilterKey::EmployeeType,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::Company => "company",
            FilterKey::HoldingCompany => "holding_company",
            FilterKey::Branch => "branch",
            FilterKey::Department => "department",
            FilterKey::Designation => "designation",
            FilterKey::NationalityGroup => "nationality_group",
            FilterKey::AsOnDate => "as_on_date",
            FilterKey::SearchText => "search",
            FilterKey::EmployeeType => "is_saudi",
        }
    }

    /// Human-readable label for prompts and breadcrumbs.
    pub fn label(self) -> &'static str {
        match self {
            FilterKey::Company => "Company",
            FilterKey::HoldingCompany => "Holding Company",
            FilterKey::Branch => "Branch",
            FilterKey::Department => "Department",
            FilterKey::Designation => "Designation",
            FilterKey::NationalityGroup => "Nationality Group",
            FilterKey::AsOnDate => "As On Date",
            FilterKey::SearchText => "Search",
            FilterKey::EmployeeType => "Employee Type",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        FilterKey::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employee-type selector of the employee list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmployeeType {
    #[default]
    All,
    SaudiOnly,
    NonSaudiOnly,
}

impl EmployeeType {
    /// Wire value of the `is_saudi` argument; `All` is never sent.
    pub fn wire_value(self) -> Option<&'static str> {
        match self {
            EmployeeType::All => None,
            EmployeeType::SaudiOnly => Some("1"),
            EmployeeType::NonSaudiOnly => Some("0"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmployeeType::All => "All",
            EmployeeType::SaudiOnly => "Saudi Only",
            EmployeeType::NonSaudiOnly => "Non-Saudi Only",
        }
    }

    /// Cycle order used by the terminal selector.
    pub fn next(self) -> Self {
        match self {
            EmployeeType::All => EmployeeType::SaudiOnly,
            EmployeeType::SaudiOnly => EmployeeType::NonSaudiOnly,
            EmployeeType::NonSaudiOnly => EmployeeType::All,
        }
    }
}

impl FromStr for EmployeeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "All" | "all" => Ok(EmployeeType::All),
            "1" | "Saudi Only" | "saudi" => Ok(EmployeeType::SaudiOnly),
            "0" | "Non-Saudi Only" | "non-saudi" => Ok(EmployeeType::NonSaudiOnly),
            other => Err(format!("unknown employee type '{other}'")),
        }
    }
}

/// Current hierarchical scoping selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterContext {
    pub company: Option<String>,
    pub holding_company: Option<String>,
    pub branch: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub nationality_group: Option<String>,
    pub as_on_date: NaiveDate,
    pub search_text: Option<String>,
    #[serde(default)]
    pub employee_type: EmployeeType,
}

impl FilterContext {
    /// Empty context pinned to the given snapshot date.
    pub fn as_on(as_on_date: NaiveDate) -> Self {
        Self {
            company: None,
            holding_company: None,
            branch: None,
            department: None,
            designation: None,
            nationality_group: None,
            as_on_date,
            search_text: None,
            employee_type: EmployeeType::All,
        }
    }

    /// Empty context as on the local calendar date.
    pub fn today() -> Self {
        Self::as_on(chrono::Local::now().date_naive())
    }

    /// Builder-style setter; empty values leave the field unset.
    pub fn with(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.assign(key, Some(value.into()));
        self
    }

    /// String form of a field, `None` when unset.
    pub fn value(&self, key: FilterKey) -> Option<String> {
        match key {
            FilterKey::Company => self.company.clone(),
            FilterKey::HoldingCompany => self.holding_company.clone(),
            FilterKey::Branch => self.branch.clone(),
            FilterKey::Department => self.department.clone(),
            FilterKey::Designation => self.designation.clone(),
            FilterKey::NationalityGroup => self.nationality_group.clone(),
            FilterKey::AsOnDate => Some(self.as_on_date.format(DATE_FORMAT).to_string()),
            FilterKey::SearchText => self.search_text.clone(),
            FilterKey::EmployeeType => self.employee_type.wire_value().map(String::from),
        }
    }

    pub fn is_set(&self, key: FilterKey) -> bool {
        self.value(key).is_some()
    }

    /// First required key that is unset, if any.
    pub fn first_missing(&self, required: &[FilterKey]) -> Option<FilterKey> {
        required.iter().copied().find(|k| !self.is_set(*k))
    }

    /// Set fields among `keys`, in key order. Unset fields are omitted.
    pub fn pairs(&self, keys: &[FilterKey]) -> Vec<(FilterKey, String)> {
        keys.iter()
            .filter_map(|k| self.value(*k).map(|v| (*k, v)))
            .collect()
    }

    /// Every set field.
    pub fn all_pairs(&self) -> Vec<(FilterKey, String)> {
        self.pairs(&FilterKey::ALL)
    }

    /// Merge a patch, returning the keys whose value actually changed.
    pub fn merge(&mut self, patch: &FilterPatch) -> Vec<FilterKey> {
        let mut changed = Vec::new();
        for (key, value) in patch.entries() {
            if self.assign(key, value.cloned()) {
                changed.push(key);
            }
        }
        changed
    }

    /// Assign one field. Returns true when the stored value changed.
    ///
    /// `as_on_date` cannot be cleared and ignores unparseable dates;
    /// string fields treat empty or whitespace-only input as unset.
    fn assign(&mut self, key: FilterKey, value: Option<String>) -> bool {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let slot = match key {
            FilterKey::Company => &mut self.company,
            FilterKey::HoldingCompany => &mut self.holding_company,
            FilterKey::Branch => &mut self.branch,
            FilterKey::Department => &mut self.department,
            FilterKey::Designation => &mut self.designation,
            FilterKey::NationalityGroup => &mut self.nationality_group,
            FilterKey::SearchText => &mut self.search_text,
            FilterKey::AsOnDate => {
                let Some(raw) = value else { return false };
                return match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
                    Ok(date) if date != self.as_on_date => {
                        self.as_on_date = date;
                        true
                    }
                    Ok(_) => false,
                    Err(_) => {
                        tracing::warn!(value = %raw, "ignoring unparseable as_on_date");
                        false
                    }
                };
            }
            FilterKey::EmployeeType => {
                let parsed = match value.as_deref().map(EmployeeType::from_str) {
                    None => EmployeeType::All,
                    Some(Ok(t)) => t,
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "ignoring employee type");
                        return false;
                    }
                };
                let changed = parsed != self.employee_type;
                self.employee_type = parsed;
                return changed;
            }
        };

        if *slot == value {
            false
        } else {
            *slot = value;
            true
        }
    }
}

/// A partial update of the filter context.
///
/// Each entry either sets a field or clears it (`None`). Fields not named
/// in the patch are left untouched when it is merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    entries: BTreeMap<FilterKey, Option<String>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. An empty value clears it, matching falsy form inputs.
    pub fn set(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        let value = value.into();
        let value = if value.trim().is_empty() { None } else { Some(value) };
        self.entries.insert(key, value);
        self
    }

    /// Set a field only when a value is present; `None` leaves it out of the patch.
    pub fn set_opt(self, key: FilterKey, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => self.set(key, v),
            _ => self,
        }
    }

    pub fn clear(mut self, key: FilterKey) -> Self {
        self.entries.insert(key, None);
        self
    }

    pub fn as_on_date(self, date: NaiveDate) -> Self {
        self.set(FilterKey::AsOnDate, date.format(DATE_FORMAT).to_string())
    }

    pub fn employee_type(self, employee_type: EmployeeType) -> Self {
        match employee_type.wire_value() {
            Some(v) => self.set(FilterKey::EmployeeType, v),
            None => self.clear(FilterKey::EmployeeType),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, key: FilterKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (FilterKey, Option<&String>)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_ref()))
    }

    /// Later patch wins on conflicting keys.
    pub fn extend(mut self, other: FilterPatch) -> Self {
        self.entries.extend(other.entries);
        self
    }
}

impl FromIterator<(FilterKey, String)> for FilterPatch {
    fn from_iter<I: IntoIterator<Item = (FilterKey, String)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FilterPatch::new(), |patch, (k, v)| patch.set(k, v))
    }
}
