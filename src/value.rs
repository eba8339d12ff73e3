//! Conversions into template [`Value`]s for types that appear in the post
//! and index templates.

use crate::label::Label;
use gtmpl_value::Value;
use std::collections::HashMap;
use url::Url;

/// Converts a [`Url`] into a [`Value`]. A plain function because both types
/// are foreign, so a `From` impl is off the table.
pub fn url_value(url: &Url) -> Value {
    Value::String(url.to_string())
}

impl From<&Label> for Value {
    /// Converts [`Label`]s into [`Value`]s for templating.
    fn from(label: &Label) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("name".to_owned(), Value::String(label.name.clone()));
        m.insert("url".to_owned(), url_value(&label.url));
        Value::Object(m)
    }
}
