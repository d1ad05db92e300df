//! Formatter rules and their combinators
//!
//! A [`Formatter`] looks at one attribute (and the group path leading to it)
//! and either declines (`Ok(None)`) or produces a replacement value.
//!
//! | Combinator | Matches | Descends into groups |
//! |---|---|---|
//! | [`format`] | everything | always, extending the group path |
//! | [`format_by_type`] | payload of type `T` | yes, rewrites matching children |
//! | [`format_by_kind`] | `Kind` | yes |
//! | [`format_by_key`] | key | yes, key is checked first |
//! | [`format_by_field_type`] | key and type `T` | no |
//! | [`format_by_group`] | group at an exact path | no |
//! | [`format_by_group_key`] | key at an exact path | no |
//! | [`format_by_group_key_type`] | key and type `T` at an exact path | no |

use super::attr::Attr;
use super::error::Result;
use super::value::{Kind, Value, DEFAULT_MAX_RESOLVE_DEPTH};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type RuleFn = dyn Fn(&[String], &Attr) -> Result<Option<Value>> + Send + Sync;

/// A single match-and-transform rule
#[derive(Clone)]
pub struct Formatter {
    name: Arc<str>,
    rule: Arc<RuleFn>,
}

impl Formatter {
    /// Create a rule from a raw matching function
    ///
    /// The function receives the group path of the attribute and the
    /// attribute itself, and returns `Ok(None)` when it does not apply.
    pub fn new<F>(name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&[String], &Attr) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            rule: Arc::new(rule),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, groups: &[String], attr: &Attr) -> Result<Option<Value>> {
        (self.rule)(groups, attr)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter").field("name", &self.name).finish()
    }
}

fn resolve_attr(attr: &Attr) -> Result<Cow<'_, Attr>> {
    match attr.value {
        Value::Lazy(_) => Ok(Cow::Owned(
            attr.with_value(attr.value.clone().resolve(DEFAULT_MAX_RESOLVE_DEPTH)?),
        )),
        _ => Ok(Cow::Borrowed(attr)),
    }
}

fn into_path<I, S>(path: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    path.into_iter().map(Into::into).collect()
}

fn child_path(groups: &[String], key: &str) -> Vec<String> {
    let mut path = Vec::with_capacity(groups.len() + 1);
    path.extend_from_slice(groups);
    path.push(key.to_string());
    path
}

/// `groups + key == path`
fn is_group_at(groups: &[String], key: &str, path: &[String]) -> bool {
    match path.split_last() {
        Some((last, parent)) => last == key && parent == groups,
        None => false,
    }
}

/// Apply `matcher` to `attr`; when it declines on a group, rewrite the
/// matching descendants. A new group is only built if a descendant changed.
/// A descendant whose lazy value does not resolve is left as is.
fn descend<M>(attr: &Attr, matcher: &M) -> Result<Option<Value>>
where
    M: Fn(&Attr) -> Option<Value>,
{
    let attr = resolve_attr(attr)?;
    if let Some(value) = matcher(&*attr) {
        return Ok(Some(value));
    }

    let Value::Group(children) = &attr.value else {
        return Ok(None);
    };

    let mut rewritten: Option<Vec<Attr>> = None;
    for (index, child) in children.iter().enumerate() {
        if let Ok(Some(value)) = descend(child, matcher) {
            rewritten.get_or_insert_with(|| children.clone())[index] = child.with_value(value);
        }
    }

    Ok(rewritten.map(Value::Group))
}

fn format_recursive<F>(groups: &[String], attr: &Attr, formatter: &F) -> Result<Value>
where
    F: Fn(&[String], &str, &Value) -> Value,
{
    match attr.value.clone().resolve(DEFAULT_MAX_RESOLVE_DEPTH)? {
        Value::Group(children) => {
            let path = child_path(groups, &attr.key);
            Ok(Value::Group(
                children
                    .iter()
                    .map(|child| match format_recursive(&path, child, formatter) {
                        Ok(value) => child.with_value(value),
                        Err(_) => child.clone(),
                    })
                    .collect(),
            ))
        }
        value => Ok(formatter(groups, &attr.key, &value)),
    }
}

/// Pass every attribute into `formatter`
///
/// Groups are entered unconditionally; the formatter sees leaves only, with
/// the group path leading to them.
pub fn format<F>(formatter: F) -> Formatter
where
    F: Fn(&[String], &str, &Value) -> Value + Send + Sync + 'static,
{
    Formatter::new("format", move |groups, attr| {
        format_recursive(groups, attr, &formatter).map(Some)
    })
}

/// Pass attributes whose payload is a `T` into `formatter`, at any depth
pub fn format_by_type<T, F>(formatter: F) -> Formatter
where
    T: Any,
    F: Fn(&T) -> Value + Send + Sync + 'static,
{
    let name = format!("format_by_type<{}>", std::any::type_name::<T>());
    Formatter::new(name, move |_, attr| {
        descend(attr, &|attr: &Attr| attr.value.downcast_ref::<T>().map(&formatter))
    })
}

/// Pass attributes of the given [`Kind`] into `formatter`, at any depth
pub fn format_by_kind<F>(kind: Kind, formatter: F) -> Formatter
where
    F: Fn(&Value) -> Value + Send + Sync + 'static,
{
    Formatter::new(format!("format_by_kind({})", kind), move |_, attr| {
        descend(attr, &|attr: &Attr| {
            (attr.value.kind() == kind).then(|| formatter(&attr.value))
        })
    })
}

/// Pass attributes named `key` into `formatter`, at any depth
///
/// A matching group is handed over whole; its children are not visited.
pub fn format_by_key<F>(key: impl Into<String>, formatter: F) -> Formatter
where
    F: Fn(&Value) -> Value + Send + Sync + 'static,
{
    let key = key.into();
    Formatter::new(format!("format_by_key({})", key), move |_, attr| {
        descend(attr, &|attr: &Attr| {
            (attr.key == key).then(|| formatter(&attr.value))
        })
    })
}

/// Pass the attribute named `key` holding a `T` into `formatter`
pub fn format_by_field_type<T, F>(key: impl Into<String>, formatter: F) -> Formatter
where
    T: Any,
    F: Fn(&T) -> Value + Send + Sync + 'static,
{
    let key = key.into();
    let name = format!(
        "format_by_field_type<{}>({})",
        std::any::type_name::<T>(),
        key
    );
    Formatter::new(name, move |_, attr| {
        if attr.key != key {
            return Ok(None);
        }
        let attr = resolve_attr(attr)?;
        Ok(attr.value.downcast_ref::<T>().map(&formatter))
    })
}

/// Pass the children of the group located at `path` into `formatter`
pub fn format_by_group<I, S, F>(path: I, formatter: F) -> Formatter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: Fn(&[Attr]) -> Value + Send + Sync + 'static,
{
    let path = into_path(path);
    Formatter::new(format!("format_by_group({})", path.join(".")), move |groups, attr| {
        if !is_group_at(groups, &attr.key, &path) {
            return Ok(None);
        }
        let attr = resolve_attr(attr)?;
        match &attr.value {
            Value::Group(children) => Ok(Some(formatter(children.as_slice()))),
            _ => Ok(None),
        }
    })
}

/// Pass the attribute named `key` directly under `path` into `formatter`
pub fn format_by_group_key<I, S, F>(path: I, key: impl Into<String>, formatter: F) -> Formatter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: Fn(&Value) -> Value + Send + Sync + 'static,
{
    let path = into_path(path);
    let key = key.into();
    let name = format!("format_by_group_key({}, {})", path.join("."), key);
    Formatter::new(name, move |groups, attr| {
        if groups != path.as_slice() || attr.key != key {
            return Ok(None);
        }
        let attr = resolve_attr(attr)?;
        Ok(Some(formatter(&attr.value)))
    })
}

/// Pass the attribute named `key` holding a `T` directly under `path` into
/// `formatter`
pub fn format_by_group_key_type<T, I, S, F>(
    path: I,
    key: impl Into<String>,
    formatter: F,
) -> Formatter
where
    T: Any,
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: Fn(&T) -> Value + Send + Sync + 'static,
{
    let path = into_path(path);
    let key = key.into();
    let name = format!(
        "format_by_group_key_type<{}>({}, {})",
        std::any::type_name::<T>(),
        path.join("."),
        key
    );
    Formatter::new(name, move |groups, attr| {
        if groups != path.as_slice() || attr.key != key {
            return Ok(None);
        }
        let attr = resolve_attr(attr)?;
        Ok(attr.value.downcast_ref::<T>().map(&formatter))
    })
}
