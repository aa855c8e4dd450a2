use serde_json::{map::Entry, Map, Value};

/// Decodes an `application/x-www-form-urlencoded` query string into a JSON object of strings.
///
/// A key appearing more than once collects its values into an array, in order.
pub(crate) fn parse(query: Option<&str>) -> Map<String, Value> {
    let mut params = Map::new();

    let Some(query) = query else {
        return params;
    };

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());

        match params.entry(key.into_owned()) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => match entry.get_mut() {
                Value::Array(values) => values.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
        }
    }

    params
}
