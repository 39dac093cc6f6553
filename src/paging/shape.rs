use crate::paging::PageResult;
use crate::{Result, XhsError};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Names of the fields holding a page's items, cursor and has-more flag
///
/// A shape without a cursor key leaves the next cursor to the caller
/// (page-numbered endpoints). A shape without a has-more key treats every
/// page as "more available", so the walk ends on the limit, a missing
/// items field or the page cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageShape {
    pub items: &'static str,
    pub cursor: Option<&'static str>,
    pub has_more: Option<&'static str>,
    /// Treat a page with zero items as the last one
    pub stop_on_empty: bool,
}

impl PageShape {
    /// Shape with `cursor` and `has_more` fields next to the items
    pub const fn cursor(items: &'static str) -> Self {
        Self {
            items,
            cursor: Some("cursor"),
            has_more: Some("has_more"),
            stop_on_empty: false,
        }
    }

    /// Shape of page-numbered endpoints: items and `has_more`, no cursor
    pub const fn numbered(items: &'static str) -> Self {
        Self {
            items,
            cursor: None,
            has_more: Some("has_more"),
            stop_on_empty: false,
        }
    }

    /// Returns the shape with empty-page termination enabled
    pub const fn stopping_on_empty(mut self) -> Self {
        self.stop_on_empty = true;
        self
    }

    /// Decodes the `data` object of a response into a page
    ///
    /// # Arguments
    ///
    /// * `path` - Request path, used in error messages
    /// * `data` - The envelope's `data` value
    pub fn parse<T: DeserializeOwned>(&self, path: &str, data: &Value) -> Result<PageResult<T>> {
        let items = match data.get(self.items) {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                serde_json::from_value::<Vec<T>>(value.clone()).map_err(|e| {
                    XhsError::malformed(path, format!("field '{}': {}", self.items, e))
                })?,
            ),
        };

        let cursor = self.cursor.and_then(|key| cursor_value(data.get(key)));

        let mut has_more = match self.has_more {
            Some(key) => data.get(key).and_then(Value::as_bool).unwrap_or(false),
            None => true,
        };
        if self.stop_on_empty && items.as_ref().is_some_and(Vec::is_empty) {
            has_more = false;
        }

        Ok(PageResult {
            items,
            cursor,
            has_more,
        })
    }
}

/// Cursor fields arrive as strings or numbers; anything else means absent
fn cursor_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
