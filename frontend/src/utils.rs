use std::rc::Rc;

use chrono::{DateTime, Utc};
use wasm_bindgen::JsValue;

/// Memo key comparing a shared list by identity. The controller swaps in a
/// fresh `Rc` whenever a list is reloaded.
pub struct SameList<T>(pub Rc<T>);

impl<T> Clone for SameList<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> PartialEq for SameList<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn js_date(at: DateTime<Utc>) -> js_sys::Date {
    js_sys::Date::new(&JsValue::from_f64(at.timestamp_millis() as f64))
}

/// Date and time in the browser's locale, or a dash when unknown.
pub fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => js_date(at)
            .to_locale_string("default", &JsValue::UNDEFINED)
            .into(),
        None => "-".to_string(),
    }
}

pub fn format_date(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => js_date(at)
            .to_locale_date_string("default", &JsValue::UNDEFINED)
            .into(),
        None => "-".to_string(),
    }
}
