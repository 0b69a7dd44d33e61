//! Request parameters for paged list endpoints: filters, sort and paging.

use std::collections::BTreeMap;
use std::fmt;

use time::Date;

use crate::clock::format_iso_date;

/// A single filter value as entered on a list screen.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Date(Date),
    Bool(bool),
}

impl FilterValue {
    /// Blank text is treated the same as an absent filter.
    pub fn is_absent(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn to_query_value(&self) -> String {
        match self {
            FilterValue::Text(s) => s.trim().to_string(),
            FilterValue::Int(n) => n.to_string(),
            FilterValue::Date(d) => format_iso_date(*d),
            FilterValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(value as i64)
    }
}

impl From<Date> for FilterValue {
    fn from(value: Date) -> Self {
        FilterValue::Date(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

/// Screen-specific search constraints keyed by query parameter name.
///
/// Keys with absent values are never serialized into a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. `None` leaves the key unset.
    pub fn with(mut self, key: &str, value: Option<impl Into<FilterValue>>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: Option<impl Into<FilterValue>>) {
        match value.map(Into::into) {
            Some(v) if !v.is_absent() => {
                self.values.insert(key.to_string(), v);
            }
            _ => {
                self.values.remove(key);
            }
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(FilterValue::is_absent)
    }

    pub fn len(&self) -> usize {
        self.values.values().filter(|v| !v.is_absent()).count()
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_absent())
            .map(|(k, v)| (k.clone(), v.to_query_value()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }
    }

    /// Same field flips the direction; a new field starts ascending.
    pub fn toggle(&mut self, field: &str) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field.to_string();
            self.direction = SortDirection::Asc;
        }
    }
}

/// How a list endpoint expects the sort to be spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortParamStyle {
    /// `sort=licensePlate,asc`
    #[default]
    Combined,
    /// `sortBy=licensePlate&direction=ASC`
    Split,
}

/// Everything needed to issue one page request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: usize,
    pub size: usize,
    pub sort: SortState,
    pub filter: FilterState,
}

impl ListQuery {
    pub fn to_query_pairs(&self, style: SortParamStyle) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];

        match style {
            SortParamStyle::Combined => pairs.push((
                "sort".to_string(),
                format!("{},{}", self.sort.field, self.sort.direction),
            )),
            SortParamStyle::Split => {
                pairs.push(("sortBy".to_string(), self.sort.field.clone()));
                pairs.push((
                    "direction".to_string(),
                    self.sort.direction.as_str().to_uppercase(),
                ));
            }
        }

        pairs.extend(self.filter.to_query_pairs());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn test_absent_values_are_omitted() {
        let filter = FilterState::new()
            .with("licensePlate", Some("ABC1D23"))
            .with("brand", Some("   "))
            .with("model", None::<&str>)
            .with("yearFrom", Some(2018));

        assert_eq!(filter.len(), 2);
        assert_eq!(
            filter.to_query_pairs(),
            vec![
                ("licensePlate".to_string(), "ABC1D23".to_string()),
                ("yearFrom".to_string(), "2018".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_none_removes_key() {
        let mut filter = FilterState::new().with("name", Some("Ana"));
        filter.set("name", None::<&str>);
        assert!(filter.is_empty());
        assert!(filter.get("name").is_none());
    }

    #[test]
    fn test_date_filter_uses_iso_format() {
        let date = Date::from_calendar_date(2024, Month::March, 5).unwrap();
        let filter = FilterState::new().with("startDate", Some(date));
        assert_eq!(
            filter.to_query_pairs(),
            vec![("startDate".to_string(), "2024-03-05".to_string())]
        );
    }

    #[test]
    fn test_sort_toggle() {
        let mut sort = SortState::ascending("licensePlate");
        sort.toggle("licensePlate");
        assert_eq!(sort.direction, SortDirection::Desc);
        sort.toggle("licensePlate");
        assert_eq!(sort.direction, SortDirection::Asc);

        sort.toggle("licensePlate");
        sort.toggle("brand");
        assert_eq!(sort.field, "brand");
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_query_pairs_combined_sort() {
        let query = ListQuery {
            page: 2,
            size: 20,
            sort: SortState {
                field: "year".to_string(),
                direction: SortDirection::Desc,
            },
            filter: FilterState::new().with("brand", Some("Volvo")),
        };
        assert_eq!(
            query.to_query_pairs(SortParamStyle::Combined),
            vec![
                ("page".to_string(), "2".to_string()),
                ("size".to_string(), "20".to_string()),
                ("sort".to_string(), "year,desc".to_string()),
                ("brand".to_string(), "Volvo".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_split_sort() {
        let query = ListQuery {
            page: 0,
            size: 10,
            sort: SortState::ascending("name"),
            filter: FilterState::new(),
        };
        let pairs = query.to_query_pairs(SortParamStyle::Split);
        assert!(pairs.contains(&("sortBy".to_string(), "name".to_string())));
        assert!(pairs.contains(&("direction".to_string(), "ASC".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "sort"));
    }
}
