use std::fmt;

use serde_json::Value;
use url::form_urlencoded::byte_serialize;

use crate::keys;

/// One element of a query string.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Entry {
    /// A recognized, single-valued parameter.
    Param { key: String, value: String },
    /// Anything else, kept verbatim.
    Raw(String),
}

/// REST query parameters for a single request.
///
/// ```
/// use rtdb_query::Query;
///
/// let q = Query::new().order_by_key().limit_to_first(10).auth("secret");
/// assert_eq!(q.encode(), "orderBy=%22%24key%22&limitToFirst=10&auth=secret");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    entries: Vec<Entry>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an unescaped query string such as `orderBy="$key"&print=pretty`.
    ///
    /// A leading `?` is ignored and empty fragments are dropped. Recognized
    /// keys repeated in the input collapse to their last value. A bare
    /// recognized key such as `shallow` is read as `shallow=`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut query = Self::new();
        for fragment in raw.split('&').filter(|f| !f.is_empty()) {
            let (key, value) = fragment.split_once('=').unwrap_or((fragment, ""));
            if keys::is_recognized(key) {
                query.put(key, value.to_string());
            } else {
                query.entries.push(Entry::Raw(fragment.to_string()));
            }
        }
        query
    }

    /// Set a recognized parameter, replacing any earlier value in place.
    fn put(&mut self, key: &str, value: String) {
        let existing = self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Param { key: k, value: v } if k == key => Some(v),
            _ => None,
        });
        match existing {
            Some(slot) => *slot = value,
            None => self.entries.push(Entry::Param {
                key: key.to_string(),
                value,
            }),
        }
    }

    fn with(mut self, key: &str, value: String) -> Self {
        self.put(key, value);
        self
    }

    /// Append a free-form fragment, e.g. `timeout=3s`.
    pub fn raw(mut self, fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.entries.push(Entry::Raw(fragment));
        }
        self
    }

    /// Merge another query into this one. Its recognized keys win.
    pub fn merge(mut self, other: &Query) -> Self {
        for entry in &other.entries {
            match entry {
                Entry::Param { key, value } => self.put(key, value.clone()),
                Entry::Raw(fragment) => self.entries.push(Entry::Raw(fragment.clone())),
            }
        }
        self
    }

    // ---- Recognized parameters ----

    pub fn auth(self, credential: impl Into<String>) -> Self {
        self.with(keys::AUTH, credential.into())
    }

    /// Order by a child key. The name is sent JSON-quoted.
    pub fn order_by(self, child: &str) -> Self {
        self.with(keys::ORDER_BY, quote(child))
    }

    pub fn order_by_key(self) -> Self {
        self.order_by("$key")
    }

    pub fn order_by_value(self) -> Self {
        self.order_by("$value")
    }

    pub fn order_by_priority(self) -> Self {
        self.order_by("$priority")
    }

    pub fn limit_to_first(self, count: u32) -> Self {
        self.with(keys::LIMIT_TO_FIRST, count.to_string())
    }

    pub fn limit_to_last(self, count: u32) -> Self {
        self.with(keys::LIMIT_TO_LAST, count.to_string())
    }

    /// Lower bound. Strings are sent quoted, numbers and booleans bare.
    pub fn start_at(self, value: impl Into<Value>) -> Self {
        self.with(keys::START_AT, value.into().to_string())
    }

    pub fn end_at(self, value: impl Into<Value>) -> Self {
        self.with(keys::END_AT, value.into().to_string())
    }

    pub fn equal_to(self, value: impl Into<Value>) -> Self {
        self.with(keys::EQUAL_TO, value.into().to_string())
    }

    pub fn shallow(self, enabled: bool) -> Self {
        self.with(keys::SHALLOW, enabled.to_string())
    }

    pub fn print_pretty(self) -> Self {
        self.with(keys::PRINT, "pretty".into())
    }

    /// Ask the remote to answer writes with an empty body.
    pub fn print_silent(self) -> Self {
        self.with(keys::PRINT, "silent".into())
    }

    /// Include priority metadata in the response.
    pub fn format_export(self) -> Self {
        self.with(keys::FORMAT, "export".into())
    }

    // ---- Inspection ----

    /// Current value of a recognized parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Param { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Escaped query string, without a leading `?`.
    ///
    /// Keys and values are form-urlencoded; the `=` and `&` separators are
    /// not.
    pub fn encode(&self) -> String {
        self.render(|key, value| (escape(key), escape(value)))
    }

    /// Unescaped query string with the `auth` value masked, for logs.
    pub fn redacted(&self) -> String {
        self.render(|key, value| {
            let value = if key == keys::AUTH { "<redacted>" } else { value };
            (key.to_string(), value.to_string())
        })
    }

    /// `url?query`, or `url` unchanged when the query is empty.
    pub fn append_to(&self, url: &str) -> String {
        if self.is_empty() {
            url.to_string()
        } else {
            format!("{url}?{}", self.encode())
        }
    }

    fn render(&self, pair: impl Fn(&str, &str) -> (String, String)) -> String {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Param { key, value } => {
                    let (k, v) = pair(key, value);
                    format!("{k}={v}")
                }
                Entry::Raw(fragment) => match fragment.split_once('=') {
                    Some((key, value)) => {
                        let (k, v) = pair(key, value);
                        format!("{k}={v}")
                    }
                    None => pair(fragment, "").0,
                },
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for Query {
    /// Writes the unescaped form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = self.render(|key, value| (key.to_string(), value.to_string()));
        f.write_str(&plain)
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// Apply `updates` to an unescaped query string and return the escaped result.
///
/// Recognized keys already present are replaced in place; new keys are
/// appended. Unrecognized update keys are appended as raw fragments.
pub fn build(existing: &str, updates: &[(&str, &str)]) -> String {
    let mut query = Query::parse(existing);
    for (key, value) in updates {
        if keys::is_recognized(key) {
            query.put(key, (*value).to_string());
        } else {
            query = query.raw(format!("{key}={value}"));
        }
    }
    query.encode()
}

fn quote(s: &str) -> String {
    Value::from(s).to_string()
}

fn escape(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_injects_auth_next_to_existing_fragment() {
        let out = build("orderBy=\"$key\"", &[("auth", "X")]);
        assert_eq!(out, "orderBy=%22%24key%22&auth=X");
        assert_eq!(out.matches("auth=").count(), 1);
    }

    #[test]
    fn build_replaces_existing_auth_in_place() {
        let out = build("auth=old&shallow=true", &[("auth", "new")]);
        assert_eq!(out, "auth=new&shallow=true");
    }

    #[test]
    fn build_on_empty_string() {
        assert_eq!(build("", &[("auth", "tok")]), "auth=tok");
        assert_eq!(build("", &[]), "");
    }

    #[test]
    fn build_appends_unrecognized_updates_raw() {
        assert_eq!(build("print=pretty", &[("timeout", "3s")]), "print=pretty&timeout=3s");
    }

    #[test]
    fn parse_keeps_unrecognized_fragments() {
        let q = Query::parse("print=pretty&custom&x=1");
        assert_eq!(q.len(), 3);
        assert_eq!(q.get("print"), Some("pretty"));
        assert_eq!(q.get("x"), None);
        assert_eq!(q.to_string(), "print=pretty&custom&x=1");
    }

    #[test]
    fn parse_collapses_repeated_recognized_keys() {
        let q = Query::parse("auth=a&shallow=true&auth=b");
        assert_eq!(q.len(), 2);
        assert_eq!(q.to_string(), "auth=b&shallow=true");
    }

    #[test]
    fn bare_recognized_key_is_replaced_not_duplicated() {
        assert_eq!(build("auth&print=pretty", &[("auth", "X")]), "auth=X&print=pretty");
        assert_eq!(Query::parse("shallow").shallow(true).encode(), "shallow=true");
        assert_eq!(Query::parse("shallow").get("shallow"), Some(""));
    }

    #[test]
    fn parse_strips_question_mark_and_empty_fragments() {
        let q = Query::parse("?&print=silent&&");
        assert_eq!(q.to_string(), "print=silent");
    }

    #[test]
    fn last_write_wins() {
        let q = Query::new().limit_to_first(5).shallow(true).limit_to_first(7);
        assert_eq!(q.to_string(), "limitToFirst=7&shallow=true");
    }

    #[test]
    fn typed_value_quoting() {
        let q = Query::new()
            .order_by("height")
            .start_at(3)
            .end_at("z")
            .equal_to(true);
        assert_eq!(q.to_string(), r#"orderBy="height"&startAt=3&endAt="z"&equalTo=true"#);
    }

    #[test]
    fn order_by_specials() {
        assert_eq!(Query::new().order_by_key().get("orderBy"), Some("\"$key\""));
        assert_eq!(Query::new().order_by_value().get("orderBy"), Some("\"$value\""));
        assert_eq!(Query::new().order_by_priority().get("orderBy"), Some("\"$priority\""));
    }

    #[test]
    fn print_and_format_values() {
        assert_eq!(Query::new().print_pretty().get("print"), Some("pretty"));
        assert_eq!(Query::new().print_pretty().print_silent().get("print"), Some("silent"));
        assert_eq!(Query::new().format_export().get("format"), Some("export"));
    }

    #[test]
    fn empty_query_adds_no_question_mark() {
        let url = "https://host/users/.json";
        assert_eq!(Query::new().append_to(url), url);
        assert_eq!(
            Query::new().shallow(true).append_to(url),
            "https://host/users/.json?shallow=true"
        );
    }

    #[test]
    fn encode_escapes_values_once() {
        let q = Query::new().auth("a b&c=d");
        assert_eq!(q.encode(), "auth=a+b%26c%3Dd");
        // Re-parsing the unescaped form and encoding again gives the same bytes.
        let again = Query::parse(&Query::new().equal_to("x").to_string());
        assert_eq!(again.encode(), "equalTo=%22x%22");
    }

    #[test]
    fn merge_overrides_recognized_keys() {
        let base = Query::new().auth("a").print_pretty();
        let merged = base.merge(&Query::parse("auth=b&extra=1"));
        assert_eq!(merged.to_string(), "auth=b&print=pretty&extra=1");
    }

    #[test]
    fn redacted_masks_auth_only() {
        let q = Query::new().shallow(true).auth("secret");
        assert_eq!(q.redacted(), "shallow=true&auth=<redacted>");
        assert!(!q.redacted().contains("secret"));
    }

    #[test]
    fn raw_ignores_empty_fragment() {
        assert!(Query::new().raw("").is_empty());
    }

    proptest::proptest! {
        #[test]
        fn auth_appears_exactly_once(
            existing in "(orderBy=\"[a-z]{1,6}\"|shallow=true|shallow|print=pretty|auth=[a-z]{1,6}|auth)(&(limitToFirst=[0-9]{1,3}|auth=[a-z]{1,4}|auth))*",
            token in "[A-Za-z0-9]{1,12}",
        ) {
            let out = build(&existing, &[("auth", &token)]);
            let auth_pairs: Vec<&str> = out
                .split('&')
                .filter(|p| p.split_once('=').map_or(*p, |(k, _)| k) == "auth")
                .collect();
            let expected = format!("auth={token}");
            proptest::prop_assert_eq!(auth_pairs, vec![expected.as_str()]);
        }

        #[test]
        fn encoded_output_has_no_reserved_bytes_inside_values(value in "[ -~]{0,24}") {
            let encoded = Query::new().equal_to(value.as_str()).encode();
            let (_, v) = encoded.split_once('=').unwrap();
            proptest::prop_assert!(!v.contains('&'));
            proptest::prop_assert!(!v.contains('='));
            proptest::prop_assert!(!v.contains('"'));
        }
    }
}
