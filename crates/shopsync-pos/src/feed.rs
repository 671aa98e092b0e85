//! Shape adapter for POS feed responses.
//!
//! The POS returns each listing either as a bare JSON array or wrapped under a
//! named key (`"Departments"`, `"Sub-Departments"`, `"Products"`), and the
//! product feed may group several SKUs into a nested array at one index.
//! Field names also vary between POS versions. All of that is resolved here so
//! the rest of the workspace only sees [`Department`], [`SubDepartment`], and
//! [`PosProduct`].

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use shopsync_core::{Department, PosId, PosProduct, SubDepartment};

use crate::error::PosError;

pub const DEPARTMENTS_KEY: &str = "Departments";
pub const SUB_DEPARTMENTS_KEY: &str = "Sub-Departments";
pub const PRODUCTS_KEY: &str = "Products";

type Record = Map<String, Value>;

/// Returns the list of entries from a response that is either a bare array or
/// an object wrapping the array under `key`. A `null` body is an empty list.
///
/// # Errors
///
/// Returns [`PosError::UnexpectedShape`] for any other shape.
pub fn unwrap_list(payload: Value, key: &str, endpoint: &str) -> Result<Vec<Value>, PosError> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Null) => Ok(Vec::new()),
            Some(other) => Err(PosError::UnexpectedShape {
                endpoint: endpoint.to_owned(),
                reason: format!("\"{key}\" is {}, expected an array", json_kind(&other)),
            }),
            None => Err(PosError::UnexpectedShape {
                endpoint: endpoint.to_owned(),
                reason: format!("object without a \"{key}\" array"),
            }),
        },
        other => Err(PosError::UnexpectedShape {
            endpoint: endpoint.to_owned(),
            reason: format!("top-level {}", json_kind(&other)),
        }),
    }
}

/// Flattens grouped entries: an array found at one index contributes each of
/// its object members. Non-object entries are dropped.
#[must_use]
pub fn flatten_records(entries: Vec<Value>) -> Vec<Record> {
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::Object(map) => records.push(map),
            Value::Array(group) => records.extend(group.into_iter().filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })),
            _ => {}
        }
    }
    records
}

/// Parses department records, dropping those without an id or title.
#[must_use]
pub fn parse_departments(entries: Vec<Value>) -> Vec<Department> {
    flatten_records(entries)
        .iter()
        .filter_map(|record| {
            let department = parse_department(record);
            if department.is_none() {
                tracing::debug!(?record, "skipping department without id or title");
            }
            department
        })
        .collect()
}

fn parse_department(record: &Record) -> Option<Department> {
    Some(Department {
        id: id_field(record, &["DepID", "id"])?,
        title: text_field(record, &["DepTitle", "DepName", "name"])?,
        group_id: id_field(record, &["GrpID"]),
    })
}

/// Parses sub-department records, dropping those without an id, title, or
/// parent department id.
#[must_use]
pub fn parse_sub_departments(entries: Vec<Value>) -> Vec<SubDepartment> {
    flatten_records(entries)
        .iter()
        .filter_map(|record| {
            let sub = parse_sub_department(record);
            if sub.is_none() {
                tracing::debug!(?record, "skipping sub-department with missing fields");
            }
            sub
        })
        .collect()
}

fn parse_sub_department(record: &Record) -> Option<SubDepartment> {
    Some(SubDepartment {
        id: id_field(record, &["SubID"]),
        department_id: id_field(record, &["DepID", "department_id"])?,
        title: text_field(
            record,
            &["SubTitle", "SubDepTitle", "SubDepName", "Title", "name"],
        )?,
    })
}

/// Parses product records, dropping those without a title.
#[must_use]
pub fn parse_products(entries: Vec<Value>) -> Vec<PosProduct> {
    flatten_records(entries)
        .iter()
        .filter_map(|record| {
            let product = parse_product(record);
            if product.is_none() {
                tracing::debug!(?record, "skipping product without a title");
            }
            product
        })
        .collect()
}

fn parse_product(record: &Record) -> Option<PosProduct> {
    Some(PosProduct {
        title: text_field(record, &["Description"])?,
        barcode: scalar_field(record, &["Barcode"]),
        description: text_field(record, &["WebDesc"]),
        department_id: id_field(record, &["DepID"]),
        sub_department_id: id_field(record, &["SubID"]),
        store_promo_price: decimal_field(record, "StorePromoPrice"),
        store_unit_price: decimal_field(record, "StoreUnitPrice"),
        web_unit_price: decimal_field(record, "WebUnitPrice"),
    })
}

/// First non-blank string value among `keys`, trimmed.
fn text_field(record: &Record, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Like [`text_field`] but also accepts numbers, rendered in decimal.
fn scalar_field(record: &Record, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(|value| match value {
            Value::String(s) => Some(s.trim().to_owned()).filter(|s| !s.is_empty()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn id_field(record: &Record, keys: &[&str]) -> Option<PosId> {
    scalar_field(record, keys).and_then(PosId::new)
}

/// Reads a price that may be a JSON number, a numeric string, or absent.
fn decimal_field(record: &Record, key: &str) -> Option<Decimal> {
    let raw = match record.get(key)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
