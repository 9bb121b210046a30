//! `{{ name }}` placeholder interpolation, ngx-translate flavoured.

use crate::traits::Params;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::OnceLock;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s?([^{}\s]*)\s?\}\}").expect("static placeholder regex"))
}

/// Substitute `{{ name }}` placeholders in `template` from `params`.
///
/// Names may be dotted paths into nested params. Placeholders whose value
/// cannot be resolved, or resolve to `null`, are left as written.
pub fn interpolate(template: &str, params: Option<&Params>) -> String {
    let Some(params) = params else {
        return template.to_string();
    };
    placeholder()
        .replace_all(template, |caps: &Captures<'_>| {
            match lookup(params, &caps[1]) {
                Some(v) if !v.is_null() => render(v),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Resolve `path` in `params`, trying the literal key before walking dots.
pub fn lookup<'a>(params: &'a Params, path: &str) -> Option<&'a Value> {
    if let Some(v) = params.get(path) {
        return Some(v);
    }
    let mut parts = path.split('.');
    let mut current = params.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
