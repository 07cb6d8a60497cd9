use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalQueryRequest {
    pub query: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaturalQueryResponse {
    pub natural_query: String,
    /// Statement the backend executed for the matched template.
    pub statement: String,
    pub results: Vec<Value>,
    pub explanation: String,
    pub query_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleQuery {
    pub query: String,
    pub description: String,
}
