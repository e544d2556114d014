use crate::extract::View;
use crate::state::LoadState;
use crate::Result;
use serde::Serialize;

/// Complete JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a, T: Serialize> {
    /// View route, e.g. `resource`
    pub view: &'static str,
    /// Page the records were scraped from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<&'a str>,
    /// Number of records
    pub count: usize,
    pub records: &'a [T],
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Include the page URL in output
    pub include_source: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

fn to_string<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

/// Convert scraped records to JSON
pub fn convert_to_json<T: Serialize>(
    view: View, source_url: &str, records: &[T], config: &JsonConfig,
) -> Result<String> {
    let output = JsonOutput {
        view: view.route(),
        source_url: config.include_source.then_some(source_url),
        count: records.len(),
        records,
    };

    to_string(&output, config.pretty)
}

/// Convert a published screen state to JSON, tagged by `state`
pub fn state_to_json<T: Serialize>(state: &LoadState<T>, pretty: bool) -> Result<String> {
    to_string(state, pretty)
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert<T: Serialize>(&self, view: View, source_url: &str, records: &[T]) -> Result<String> {
        convert_to_json(view, source_url, records, &self.config)
    }

    pub fn state<T: Serialize>(&self, state: &LoadState<T>) -> Result<String> {
        state_to_json(state, self.config.pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Resource};

    #[test]
    fn test_convert_to_json_records() {
        let records = vec![Resource { title: "表盘".to_string(), score: "4.5".to_string(), ..Default::default() }];
        let url = "https://www.bandbbs.cn/resources/";
        let json = convert_to_json(View::Resources, url, &records, &JsonConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["view"], "resource");
        assert_eq!(value["count"], 1);
        assert_eq!(value["records"][0]["title"], "表盘");
        assert_eq!(value["records"][0]["sub_title"], "");
        assert!(value.get("source_url").is_none());
    }

    #[test]
    fn test_convert_to_json_with_source_pretty() {
        let config = JsonConfig { include_source: true, pretty: true };
        let records: Vec<Block> = Vec::new();
        let json = convert_to_json(View::Home, "https://www.bandbbs.cn/", &records, &config).unwrap();

        assert!(json.contains('\n'));
        assert!(json.contains("\"source_url\": \"https://www.bandbbs.cn/\""));
        assert!(json.contains("\"count\": 0"));
    }

    #[test]
    fn test_state_to_json() {
        let state: LoadState<Vec<Block>> = LoadState::Error { message: "HTTP 404".to_string(), data: None };
        let value: serde_json::Value = serde_json::from_str(&state_to_json(&state, false).unwrap()).unwrap();

        assert_eq!(value["state"], "error");
        assert_eq!(value["message"], "HTTP 404");
    }

    #[test]
    fn test_formatter_uses_config() {
        let formatter = JsonFormatter::new(JsonConfig { include_source: true, pretty: false });
        let json = formatter.convert::<Block>(View::Home, "https://x/", &[]).unwrap();
        assert_eq!(json, r#"{"view":"home","source_url":"https://x/","count":0,"records":[]}"#);
    }
}
