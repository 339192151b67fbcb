//! Cart line fingerprints.
//!
//! A fingerprint has the form `{id}_{hash}`. The hash covers a canonical JSON
//! record of the identity options: every option is defaulted first and object
//! keys are written in sorted order at every depth, so two requests that
//! describe the same configuration produce the same key no matter which
//! optional fields they omitted or how they ordered them. The custom-bouquet
//! payload is embedded as its own canonical JSON string.
//!
//! The hash is a 32-bit polynomial string hash (multiplier 31, wrapping,
//! read as signed, absolute value taken) over UTF-16 code units. Keys are
//! persisted with the cart, so the hash must not change between releases.
//!
//! Integral floats in `customData` are written as integers (`5.0` as `5`),
//! as browser JSON does. Fractional numbers use `serde_json`'s
//! shortest form, which can differ from the browser's for very large or very
//! small magnitudes, so such payloads may not match keys written there.

use serde_json::{Map, Number, Value};

use super::CartError;
use super::line::{LineOptions, ProductInput};
use crate::types::ProductId;

const DEFAULT_CHOICE: &str = "default";

/// Fingerprint an add-request.
///
/// # Errors
///
/// Returns [`CartError::MissingProductId`] if the request has no id.
pub fn generate_product_key(input: &ProductInput) -> Result<String, CartError> {
    let id = input.id.as_ref().ok_or(CartError::MissingProductId)?;
    Ok(line_key(id, &input.options))
}

/// Fingerprint a product id with a set of options.
#[must_use]
pub fn line_key(id: &ProductId, options: &LineOptions) -> String {
    let record = canonical_json(&identity_record(options));
    format!("{id}_{}", polynomial_hash(&record))
}

/// The defaulted identity record for a set of options.
fn identity_record(options: &LineOptions) -> Value {
    let choice = |value: &Option<String>| {
        Value::String(value.as_deref().unwrap_or(DEFAULT_CHOICE).to_owned())
    };
    let flag = |value: Option<bool>| Value::Bool(value.unwrap_or(false));

    let mut record = Map::new();
    record.insert("size".to_owned(), choice(&options.size));
    record.insert("addCard".to_owned(), flag(options.add_card));
    record.insert(
        "cardMessage".to_owned(),
        Value::String(options.card_message.clone().unwrap_or_default()),
    );
    record.insert("addChocolate".to_owned(), flag(options.add_chocolate));
    record.insert("giftWrap".to_owned(), flag(options.gift_wrap));
    record.insert("style".to_owned(), choice(&options.style));
    record.insert("color".to_owned(), choice(&options.color));
    record.insert(
        "customData".to_owned(),
        options
            .custom_data
            .as_ref()
            .filter(|data| !data.is_null())
            .map_or(Value::Null, |data| Value::String(canonical_json(data))),
    );
    Value::Object(record)
}

/// Serialize a JSON value with object keys sorted at every depth.
fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Number(n) => out.push_str(&canonical_number(n)),
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Largest magnitude below which every integer is exactly representable as an `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Write integral floats without a fraction (`5.0` as `5`, `-0.0` as `0`),
/// the way browser JSON prints them.
fn canonical_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
            // Integral and within the exact range, checked above
            #[allow(clippy::cast_possible_truncation)]
            let int = f as i64;
            int.to_string()
        }
        _ => n.to_string(),
    }
}

/// `acc = acc * 31 + unit` over UTF-16 code units, wrapping at 32 bits.
fn polynomial_hash(s: &str) -> u32 {
    s.encode_utf16()
        .fold(0_i32, |acc, unit| {
            acc.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}
