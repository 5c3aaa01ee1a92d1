use homematch_core::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Largest bedroom or bathroom count accepted from a query
pub const MAX_ROOMS: u32 = 100;

/// Sparse set of user-requested values. `None` means "no preference".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bath: Option<u32>,
    /// Price ceiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl ConstraintSet {
    pub fn is_empty(&self) -> bool {
        self.bed.is_none()
            && self.bath.is_none()
            && self.price.is_none()
            && self.city.is_none()
            && self.state.is_none()
    }

    /// Drop every field with an out-of-range value.
    ///
    /// Returns the cleaned set and one [`Error::MalformedConstraint`] per
    /// discarded field. The query itself never fails.
    pub fn sanitized(mut self) -> (ConstraintSet, Vec<Error>) {
        let mut discarded = Vec::new();

        if let Some(price) = self.price {
            if !price.is_finite() || price <= 0.0 {
                discarded.push(malformed("price", format!("{} is not a positive amount", price)));
                self.price = None;
            }
        }
        if let Some(bed) = self.bed {
            if bed > MAX_ROOMS {
                discarded.push(malformed("bed", format!("{} exceeds {}", bed, MAX_ROOMS)));
                self.bed = None;
            }
        }
        if let Some(bath) = self.bath {
            if bath > MAX_ROOMS {
                discarded.push(malformed("bath", format!("{} exceeds {}", bath, MAX_ROOMS)));
                self.bath = None;
            }
        }
        self.city = self.city.take().and_then(non_blank);
        self.state = self.state.take().and_then(non_blank);

        for err in &discarded {
            warn!("Discarding constraint: {}", err);
        }
        (self, discarded)
    }
}

/// A structured query as it arrives over the wire.
///
/// Fields are held as raw JSON so a single bad value (`"bed": -1`,
/// `"bed": 2.5`, `"price": "cheap"`) is discarded on its own instead of
/// rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConstraintRequest {
    #[serde(default)]
    pub bed: Option<Value>,
    #[serde(default)]
    pub bath: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub city: Option<Value>,
    #[serde(default)]
    pub state: Option<Value>,
}

impl ConstraintRequest {
    /// Convert field by field, then sanitize.
    ///
    /// Numbers may be given as JSON numbers or numeric strings. Room counts
    /// must be whole and non-negative. `null` counts as absent.
    pub fn into_constraints(self) -> (ConstraintSet, Vec<Error>) {
        let mut discarded = Vec::new();
        let raw = ConstraintSet {
            bed: convert(&mut discarded, "bed", self.bed, room_count),
            bath: convert(&mut discarded, "bath", self.bath, room_count),
            price: convert(&mut discarded, "price", self.price, number),
            city: convert(&mut discarded, "city", self.city, text),
            state: convert(&mut discarded, "state", self.state, text),
        };
        for err in &discarded {
            warn!("Discarding constraint: {}", err);
        }

        let (clean, rest) = raw.sanitized();
        discarded.extend(rest);
        (clean, discarded)
    }
}

fn convert<T>(
    discarded: &mut Vec<Error>,
    field: &str,
    value: Option<Value>,
    parse: fn(&Value) -> Result<T, String>,
) -> Option<T> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => match parse(&v) {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                discarded.push(malformed(field, reason));
                None
            }
        },
    }
}

fn number(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("{} is not a number", n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", s)),
        other => Err(format!("{} is not a number", other)),
    }
}

fn room_count(value: &Value) -> Result<u32, String> {
    let n = number(value)?;
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 {
        return Err(format!("{} is not a whole count", n));
    }
    if n > MAX_ROOMS as f64 {
        return Err(format!("{} exceeds {}", n, MAX_ROOMS));
    }
    Ok(n as u32)
}

fn text(value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("{} is not a string", value))
}

fn malformed(field: &str, reason: String) -> Error {
    Error::MalformedConstraint {
        field: field.to_string(),
        reason,
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}
