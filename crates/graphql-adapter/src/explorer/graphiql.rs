use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ExplorerRenderer, ExplorerRequest};
use crate::BoxError;

const TEMPLATE: &str = include_str!("../../templates/graphiql.hbs");

/// Settings of the GraphiQL page, typically loaded from the server configuration.
///
/// `query`, `variables` and `operationName` are only defaults: the same parameters in the
/// explorer URL query string take precedence.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphiqlOptions {
    /// Where GraphiQL sends its queries.
    #[serde(rename = "endpointURL")]
    pub endpoint_url: String,
    pub subscriptions_endpoint: Option<String>,
    pub query: Option<String>,
    pub variables: Option<Value>,
    pub operation_name: Option<String>,
    pub result: Option<Value>,
    /// Script snippet inserted as is in the headers object of every GraphiQL request.
    pub pass_header: Option<String>,
    pub editor_theme: Option<String>,
}

impl GraphiqlOptions {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        GraphiqlOptions {
            endpoint_url: endpoint_url.into(),
            subscriptions_endpoint: None,
            query: None,
            variables: None,
            operation_name: None,
            result: None,
            pass_header: None,
            editor_theme: None,
        }
    }
}

/// Renders a GraphiQL page loading its assets from a CDN.
#[derive(Default)]
pub struct GraphiqlRenderer {
    handlebars: Handlebars<'static>,
}

impl ExplorerRenderer for GraphiqlRenderer {
    type Options = GraphiqlOptions;

    async fn render(&self, request: ExplorerRequest<'_, GraphiqlOptions>) -> Result<String, BoxError> {
        let page = Page::new(&request.query_string, &request.options)?;
        let html = self.handlebars.render_template(TEMPLATE, &page)?;

        Ok(html)
    }
}

/// Template data, every field is a script literal.
#[derive(Serialize)]
struct Page {
    endpoint_url: String,
    subscriptions_endpoint: String,
    query: String,
    variables: String,
    operation_name: String,
    result: String,
    pass_header: String,
    editor_theme: String,
}

impl Page {
    fn new(query_string: &Map<String, Value>, options: &GraphiqlOptions) -> Result<Self, BoxError> {
        let param = |name: &str| query_string.get(name).and_then(Value::as_str);

        let query = param("query").map(str::to_string).or_else(|| options.query.clone());
        let operation_name = param("operationName")
            .map(str::to_string)
            .or_else(|| options.operation_name.clone());

        let variables = match param("variables") {
            Some(variables) => Some(
                serde_json::from_str::<Value>(variables)
                    .map_err(|err| format!("invalid variables in the explorer query string: {err}"))?,
            ),
            None => options.variables.clone(),
        };

        // GraphiQL expects the variables and the result as editor text.
        let variables = variables.map(|value| serde_json::to_string_pretty(&value)).transpose()?;
        let result = options
            .result
            .as_ref()
            .map(serde_json::to_string_pretty)
            .transpose()?;

        Ok(Page {
            endpoint_url: script_literal(Some(&options.endpoint_url))?,
            subscriptions_endpoint: script_literal(options.subscriptions_endpoint.as_ref())?,
            query: script_literal(query.as_ref())?,
            variables: script_literal(variables.as_ref())?,
            operation_name: script_literal(operation_name.as_ref())?,
            result: script_literal(result.as_ref())?,
            pass_header: options.pass_header.clone().unwrap_or_default(),
            editor_theme: script_literal(options.editor_theme.as_ref())?,
        })
    }
}

/// JSON string literal which can't terminate the surrounding script element.
fn script_literal(value: Option<&String>) -> Result<String, serde_json::Error> {
    let Some(value) = value else {
        return Ok("undefined".to_string());
    };

    let literal = serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029");

    Ok(literal)
}
