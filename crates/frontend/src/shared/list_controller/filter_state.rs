//! Модель состояния фильтров списка.
//!
//! A page declares its filters once as a set of [`FilterDescriptor`]s. The
//! [`FilterState`] holds exactly one value per declared filter and turns the
//! non-empty ones into backend query parameters.

use super::backend::QueryParams;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Select,
    Date,
    Text,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub max_len: Option<usize>,
}

/// Static description of one filter field
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDescriptor {
    /// Query parameter key
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
    pub options: Vec<FilterOption>,
    pub constraints: FilterConstraints,
    pub default: FilterValue,
}

impl FilterDescriptor {
    fn new(name: &'static str, label: &'static str, kind: FilterKind) -> Self {
        Self {
            name,
            label,
            kind,
            options: Vec::new(),
            constraints: FilterConstraints::default(),
            default: FilterValue::Empty,
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FilterKind::Text)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FilterKind::Number)
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FilterKind::Date)
    }

    pub fn select(name: &'static str, label: &'static str, options: Vec<FilterOption>) -> Self {
        Self {
            options,
            ..Self::new(name, label, FilterKind::Select)
        }
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.constraints.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.constraints.max = Some(max);
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.constraints.max_len = Some(max_len);
        self
    }

    pub fn with_default(mut self, default: FilterValue) -> Self {
        self.default = default;
        self
    }

    /// Parses raw input (as typed into the filter control) into a value of
    /// this filter's kind and checks the declared constraints.
    pub fn parse(&self, raw: &str) -> Result<FilterValue, FilterError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(FilterValue::Empty);
        }
        let value = match self.kind {
            FilterKind::Text => FilterValue::Text(raw.to_string()),
            FilterKind::Select => FilterValue::Text(raw.to_string()),
            FilterKind::Number => {
                let number: f64 = raw.parse().map_err(|_| FilterError::InvalidNumber {
                    field: self.name.to_string(),
                    value: raw.to_string(),
                })?;
                FilterValue::Number(number)
            }
            FilterKind::Date => {
                let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                    FilterError::InvalidDate {
                        field: self.name.to_string(),
                        value: raw.to_string(),
                    }
                })?;
                FilterValue::Date(date)
            }
        };
        self.validate(&value)?;
        Ok(value)
    }

    pub fn validate(&self, value: &FilterValue) -> Result<(), FilterError> {
        let field = self.name.to_string();
        match (self.kind, value) {
            (_, FilterValue::Empty) => Ok(()),
            (FilterKind::Text, FilterValue::Text(text)) => match self.constraints.max_len {
                Some(max_len) if text.chars().count() > max_len => {
                    Err(FilterError::TooLong { field, max_len })
                }
                _ => Ok(()),
            },
            (FilterKind::Select, FilterValue::Text(text)) => {
                if self.options.iter().any(|o| &o.value == text) {
                    Ok(())
                } else {
                    Err(FilterError::UnknownOption {
                        field,
                        value: text.clone(),
                    })
                }
            }
            (FilterKind::Number, FilterValue::Number(number)) => {
                if !number.is_finite() {
                    return Err(FilterError::InvalidNumber {
                        field,
                        value: number.to_string(),
                    });
                }
                let below = self.constraints.min.is_some_and(|min| *number < min);
                let above = self.constraints.max.is_some_and(|max| *number > max);
                if below || above {
                    Err(FilterError::OutOfRange {
                        field,
                        value: *number,
                    })
                } else {
                    Ok(())
                }
            }
            (FilterKind::Date, FilterValue::Date(_)) => Ok(()),
            (kind, _) => Err(FilterError::KindMismatch { field, kind }),
        }
    }
}

/// Текущее значение одного фильтра
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FilterValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Empty => true,
            FilterValue::Text(text) => text.trim().is_empty(),
            FilterValue::Number(_) | FilterValue::Date(_) => false,
        }
    }

    /// String form sent to the backend; `None` for unset values
    pub fn to_query_value(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            FilterValue::Empty => None,
            FilterValue::Text(text) => Some(text.trim().to_string()),
            FilterValue::Number(number) => Some(number.to_string()),
            FilterValue::Date(date) => Some(date.format(DATE_FORMAT).to_string()),
        }
    }

    /// Value for binding back into an input control
    pub fn to_input_value(&self) -> String {
        self.to_query_value().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Filtro desconocido: {0}")]
    UnknownField(String),

    #[error("{field}: opción no válida «{value}»")]
    UnknownOption { field: String, value: String },

    #[error("{field}: «{value}» no es un número")]
    InvalidNumber { field: String, value: String },

    #[error("{field}: «{value}» no es una fecha AAAA-MM-DD")]
    InvalidDate { field: String, value: String },

    #[error("{field}: el valor {value} está fuera de rango")]
    OutOfRange { field: String, value: f64 },

    #[error("{field}: máximo {max_len} caracteres")]
    TooLong { field: String, max_len: usize },

    #[error("{field}: tipo de valor incompatible con filtro {kind:?}")]
    KindMismatch { field: String, kind: FilterKind },
}

/// Значения всех объявленных фильтров страницы
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    descriptors: Vec<FilterDescriptor>,
    values: BTreeMap<&'static str, FilterValue>,
}

impl FilterState {
    pub fn new(descriptors: Vec<FilterDescriptor>) -> Self {
        let values = descriptors
            .iter()
            .map(|d| (d.name, d.default.clone()))
            .collect();
        Self {
            descriptors,
            values,
        }
    }

    pub fn descriptors(&self) -> &[FilterDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, name: &str) -> Option<&FilterDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.values.get(name)
    }

    /// Sets a filter from raw input. Rejected input leaves the state as it was.
    pub fn set_filter(&mut self, name: &str, raw: &str) -> Result<(), FilterError> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
        let value = descriptor.parse(raw)?;
        let key = descriptor.name;
        self.values.insert(key, value);
        Ok(())
    }

    pub fn set_value(&mut self, name: &str, value: FilterValue) -> Result<(), FilterError> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
        descriptor.validate(&value)?;
        let key = descriptor.name;
        self.values.insert(key, value);
        Ok(())
    }

    /// Non-empty filters only, keyed by descriptor name
    pub fn build_query_params(&self) -> QueryParams {
        self.values
            .iter()
            .filter_map(|(name, value)| value.to_query_value().map(|v| (name.to_string(), v)))
            .collect()
    }

    /// Resets every field to its declared default
    pub fn clear(&mut self) {
        for descriptor in &self.descriptors {
            self.values.insert(descriptor.name, descriptor.default.clone());
        }
    }

    pub fn active_count(&self) -> usize {
        self.values.values().filter(|v| !v.is_empty()).count()
    }

    /// `(name, "Label: value")` for every set filter, in declaration order.
    /// Select values are shown by their option label.
    pub fn active_tags(&self) -> Vec<(&'static str, String)> {
        self.descriptors
            .iter()
            .filter_map(|d| {
                let value = self.values.get(d.name)?.to_query_value()?;
                let shown = d
                    .options
                    .iter()
                    .find(|o| o.value == value)
                    .map(|o| o.label.clone())
                    .unwrap_or(value);
                Some((d.name, format!("{}: {}", d.label, shown)))
            })
            .collect()
    }
}
