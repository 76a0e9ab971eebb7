//! Location of the entry array in the endpoint's response body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DATA_URLS: &str = "/data/urls";
const DATA: &str = "/data";

/// Where the signed-URL entries live in the response JSON.
///
/// Storage service versions disagree on this, so it is configurable, with
/// `auto` probing `data.urls` first and `data` second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseLayout {
    #[default]
    Auto,
    /// `{"data": {"urls": [...]}}`
    DataUrls,
    /// `{"data": [...]}`
    Data,
}

impl ResponseLayout {
    /// JSON pointer of the entry array in `body`, if it holds an array there.
    pub fn locate(&self, body: &Value) -> Option<&'static str> {
        let candidates: &[&'static str] = match self {
            ResponseLayout::Auto => &[DATA_URLS, DATA],
            ResponseLayout::DataUrls => &[DATA_URLS],
            ResponseLayout::Data => &[DATA],
        };
        candidates
            .iter()
            .copied()
            .find(|p| body.pointer(p).map_or(false, Value::is_array))
    }

    pub fn entries_mut<'a>(&self, body: &'a mut Value) -> Option<&'a mut Vec<Value>> {
        let pointer = self.locate(body)?;
        body.pointer_mut(pointer)?.as_array_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auto_prefers_data_urls() {
        let body = json!({"data": {"urls": [{"url": "a"}], "expires": "x"}});
        assert_eq!(ResponseLayout::Auto.locate(&body), Some("/data/urls"));
    }

    #[test]
    fn auto_falls_back_to_data_array() {
        let body = json!({"code": 0, "data": [{"url": "a"}]});
        assert_eq!(ResponseLayout::Auto.locate(&body), Some("/data"));
    }

    #[test]
    fn pinned_layouts_do_not_probe() {
        let nested = json!({"data": {"urls": []}});
        let flat = json!({"data": []});
        assert_eq!(ResponseLayout::Data.locate(&nested), None);
        assert_eq!(ResponseLayout::DataUrls.locate(&flat), None);
        assert_eq!(ResponseLayout::DataUrls.locate(&nested), Some("/data/urls"));
        assert_eq!(ResponseLayout::Data.locate(&flat), Some("/data"));
    }

    #[test]
    fn non_array_is_not_located() {
        assert_eq!(
            ResponseLayout::Auto.locate(&json!({"data": {"urls": "x"}})),
            None
        );
        assert_eq!(ResponseLayout::Auto.locate(&json!({"data": null})), None);
        assert_eq!(ResponseLayout::Auto.locate(&json!([1, 2])), None);
    }

    #[test]
    fn entries_mut_allows_in_place_edit() {
        let mut body = json!({"data": {"urls": [{"url": "a"}]}});
        let entries = ResponseLayout::Auto.entries_mut(&mut body).unwrap();
        entries[0]["url"] = json!("b");
        assert_eq!(body, json!({"data": {"urls": [{"url": "b"}]}}));
    }
}
