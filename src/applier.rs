use super::*;

/// Ordering strategy for one kind of backing data store.
pub trait SortApplier<T> {
    /// Shape predicate; must be pure.
    fn supports(&self, data: &T) -> bool;

    fn apply(&self, sort: &Sort, data: T, options: &ApplyOptions) -> Result<T>;
}

impl<T> std::fmt::Debug for dyn SortApplier<T> + Send + Sync + '_ {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("dyn SortApplier")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingValues {
    /// A path that does not resolve on a record orders below every
    /// present value.
    Smallest,
    /// A path that does not resolve orders above every present value.
    Largest,
}

impl Default for MissingValues {
    fn default() -> Self {
        Self::Smallest
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub missing: MissingValues,
}

/// In-memory applier over arrays of JSON records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueApplier;

impl SortApplier<Value> for ValueApplier {
    fn supports(&self, data: &Value) -> bool {
        data.is_array()
    }

    fn apply(&self, sort: &Sort, data: Value, options: &ApplyOptions) -> Result<Value> {
        let mut records = match data {
            Value::Array(records) => records,
            _ => return Err(SortError::NoApplierFound),
        };

        if sort.is_empty() {
            return Ok(Value::Array(records));
        }

        let keys = sort
            .iter()
            .map(|(path, direction)| (parse_path(path), direction))
            .collect::<Vec<_>>();

        trace!(
            fields = sort.len(),
            records = records.len(),
            "applying array sort"
        );

        // Stable sort, so earlier paths dominate and full ties keep
        // their original relative order.
        records.sort_by(|a, b| {
            for (segments, direction) in &keys {
                let left = resolve_path(a, segments);
                let right = resolve_path(b, segments);
                let mut ordering = compare_resolved(left, right, options.missing);
                if *direction == Direction::Desc {
                    ordering = ordering.reverse();
                }
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        Ok(Value::Array(records))
    }
}

/// Splits a path expression into segments: `[a][b]` yields `a`, `b`; a
/// bare `a` is a single segment.
fn parse_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('[') {
        match rest[open..].find(']') {
            Some(close) => {
                segments.push(rest[open + 1..open + close].to_owned());
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    if segments.is_empty() {
        segments.push(path.to_owned());
    }
    segments
}

fn resolve_path<'a>(record: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = record;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index = segment.parse::<usize>().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

fn compare_resolved(
    left: Option<&Value>,
    right: Option<&Value>,
    missing: MissingValues,
) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => compare_values(left, right),
        (Some(_), None) => match missing {
            MissingValues::Smallest => Ordering::Greater,
            MissingValues::Largest => Ordering::Less,
        },
        (None, Some(_)) => match missing {
            MissingValues::Smallest => Ordering::Less,
            MissingValues::Largest => Ordering::Greater,
        },
        (None, None) => Ordering::Equal,
    }
}

/// Total order over JSON values: type rank first (null < bool < number
/// < string < array < object), natural comparison within a type.
fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => {
            for (item_a, item_b) in a.iter().zip(b) {
                let ordering = compare_values(item_a, item_b);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            a.len().cmp(&b.len())
        }
        // Objects carry no natural order; size keeps the order total.
        (Value::Object(a), Value::Object(b)) => a.len().cmp(&b.len()),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}

fn type_rank(value: &Value) -> u8 {
    use Value::*;
    match value {
        Null => 0,
        Bool(_) => 1,
        Number(_) => 2,
        String(_) => 3,
        Array(_) => 4,
        Object(_) => 5,
    }
}
