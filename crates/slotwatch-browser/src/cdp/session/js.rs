//! JavaScript execution for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["text"].as_str().unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Evaluate `function(el)` against the first element matching `selector`.
    ///
    /// The function body sees `el` bound to the element or `null`.
    pub(super) async fn evaluate_on_selector(&self, selector: &str, body: &str) -> Result<Value, CdpError> {
        self.evaluate(&selector_script(selector, body)).await
    }
}

/// Build an IIFE that binds `el` to `document.querySelector(selector)`.
///
/// The selector is embedded as a JSON string literal, so quotes and
/// backslashes in it cannot break out of the script.
pub(super) fn selector_script(selector: &str, body: &str) -> String {
    let literal = Value::String(selector.to_string()).to_string();
    format!("(() => {{ const el = document.querySelector({}); {} }})()", literal, body)
}
