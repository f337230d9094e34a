//! Method and notification name translation.

/// Default method namespace.
pub const DEFAULT_NAMESPACE: &str = "aria2";

/// Reserved management namespace; never rewritten.
pub const SYSTEM_NAMESPACE: &str = "system";

/// Prefix a bare method name with the namespace.
///
/// Names already inside the namespace or the reserved `system.`
/// namespace pass through unchanged.
pub fn prefix(namespace: &str, name: &str) -> String {
    if name.starts_with(&format!("{SYSTEM_NAMESPACE}."))
        || name.starts_with(&format!("{namespace}."))
    {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Strip the namespace prefix from a name, yielding the bare name.
///
/// Names outside the namespace come back unchanged.
pub fn unprefix<'a>(namespace: &str, name: &'a str) -> &'a str {
    name.strip_prefix(&format!("{namespace}."))
        .filter(|bare| !bare.is_empty())
        .unwrap_or(name)
}
