use url::form_urlencoded;

/// Builds a `?`-prefixed, form-urlencoded query string.
///
/// Pairs whose value is `None` are skipped. Returns an empty string when no
/// pair remains.
///
/// ```
/// use bearer_http::build_query_string;
///
/// let query = build_query_string([("page", Some(2)), ("limit", None), ("size", Some(10))]);
/// assert_eq!(query, "?page=2&size=10");
/// ```
pub fn build_query_string<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: ToString,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        if let Some(value) = value {
            serializer.append_pair(key.as_ref(), &value.to_string());
            any = true;
        }
    }

    if any {
        format!("?{}", serializer.finish())
    } else {
        String::new()
    }
}
