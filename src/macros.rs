//! Attribute construction macros
//!
//! # Examples
//!
//! ```
//! use rust_log_formatter::prelude::*;
//! use rust_log_formatter::{attrs, group};
//!
//! let list = attrs! {
//!     "user" => "bob",
//!     "retries" => 3,
//!     group!("request", {
//!         "method" => "GET",
//!         "path" => "/health",
//!     }),
//! };
//!
//! assert_eq!(list.len(), 3);
//! assert_eq!(list[2].value.group_attrs()[0], Attr::new("method", "GET"));
//! ```

/// Build a `Vec<Attr>` from `key => value` pairs and ready-made attributes.
///
/// Values go through `Value::from`, so anything with a `From` impl works.
#[macro_export]
macro_rules! attrs {
    () => {
        ::std::vec::Vec::<$crate::Attr>::new()
    };
    ($($tt:tt)+) => {{
        let mut list: ::std::vec::Vec<$crate::Attr> = ::std::vec::Vec::new();
        $crate::__push_attrs!(list; $($tt)+);
        list
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __push_attrs {
    ($list:ident;) => {};
    ($list:ident; $key:literal => $value:expr $(, $($rest:tt)*)?) => {
        $list.push($crate::Attr::new($key, $value));
        $($crate::__push_attrs!($list; $($rest)*);)?
    };
    ($list:ident; $attr:expr $(, $($rest:tt)*)?) => {
        $list.push($attr);
        $($crate::__push_attrs!($list; $($rest)*);)?
    };
}

/// Build a group `Attr` from a name and an `attrs!` body.
///
/// ```
/// use rust_log_formatter::group;
///
/// let user = group!("user", { "id" => 7, "name" => "alice" });
/// assert_eq!(user.value.group_attrs().len(), 2);
/// ```
#[macro_export]
macro_rules! group {
    ($name:expr, { $($body:tt)* }) => {
        $crate::Attr::group($name, $crate::attrs!($($body)*))
    };
}
