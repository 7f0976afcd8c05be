//! Tool catalogue and name-based dispatch for function-calling models.

use crate::agent::BaristaAgent;
use crate::error::AgentError;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// A function the language model may call, described in JSON Schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// The single string argument each mutating tool takes.
const TOOL_ARGUMENTS: [(&str, &str); 5] = [
    ("set_drink_type", "drink_type"),
    ("set_size", "size"),
    ("set_milk", "milk_type"),
    ("add_extra", "extra"),
    ("set_customer_name", "name"),
];

fn string_parameter(name: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            name: { "type": "string", "description": description }
        },
        "required": [name]
    })
}

/// Returns the tools advertised to the language model.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "set_drink_type",
            description: "Set the type of drink the customer wants to order.",
            parameters: string_parameter(
                "drink_type",
                "The type of coffee drink (e.g., latte, cappuccino, espresso, americano, mocha, flat white)",
            ),
        },
        ToolDefinition {
            name: "set_size",
            description: "Set the size of the drink.",
            parameters: string_parameter("size", "The size of the drink (small, medium, or large)"),
        },
        ToolDefinition {
            name: "set_milk",
            description: "Set the type of milk for the drink.",
            parameters: string_parameter(
                "milk_type",
                "The type of milk (whole milk, skim milk, oat milk, almond milk, soy milk, or no milk)",
            ),
        },
        ToolDefinition {
            name: "add_extra",
            description: "Add an extra item to the drink order (e.g., extra shot, syrup, whipped cream).",
            parameters: string_parameter("extra", "The extra item to add to the drink"),
        },
        ToolDefinition {
            name: "set_customer_name",
            description: "Set the customer's name for the order.",
            parameters: string_parameter("name", "The customer's name"),
        },
        ToolDefinition {
            name: "save_order",
            description: "Save the completed coffee order. Only call this once drink type, size, \
                          milk type and customer name are all known; extras are optional.",
            parameters: json!({ "type": "object", "properties": {} }),
        },
    ]
}

impl BaristaAgent {
    /// Dispatches a tool call by name, parsing arguments from JSON.
    ///
    /// Malformed calls (unknown tool, bad JSON, missing argument) are
    /// answered with `Ok("ERROR: ...")` so the model can see the problem and
    /// correct itself. Only a failed save is returned as `Err`.
    pub async fn dispatch(&mut self, name: &str, arguments_json: &str) -> Result<String, AgentError> {
        debug!("Dispatching tool '{}' with args: {}", name, arguments_json);

        let args: Value = if arguments_json.trim().is_empty() {
            json!({})
        } else {
            match serde_json::from_str(arguments_json) {
                Ok(v) => v,
                Err(e) => return Ok(format!("ERROR: Failed to parse arguments JSON: {}", e)),
            }
        };

        if name == "save_order" {
            return self.save_order().await;
        }

        let Some(&(_, key)) = TOOL_ARGUMENTS.iter().find(|(tool, _)| *tool == name) else {
            warn!("Unknown tool requested: {}", name);
            let available: Vec<&str> = tool_definitions().iter().map(|t| t.name).collect();
            return Ok(format!(
                "ERROR: Unknown tool '{}'. Available tools: {}",
                name,
                available.join(", ")
            ));
        };

        let Some(value) = args.get(key).and_then(Value::as_str) else {
            return Ok(format!(
                "ERROR: Missing string argument '{}' for tool '{}'",
                key, name
            ));
        };

        let reply = match name {
            "set_drink_type" => self.set_drink_type(value),
            "set_size" => self.set_size(value),
            "set_milk" => self.set_milk(value),
            "add_extra" => self.add_extra(value),
            _ => self.set_customer_name(value),
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::OrderStore;

    #[test]
    fn every_argument_tool_is_advertised() {
        let defs = tool_definitions();
        for (tool, key) in TOOL_ARGUMENTS {
            let def = defs
                .iter()
                .find(|d| d.name == tool)
                .unwrap_or_else(|| panic!("{tool} missing from catalogue"));
            assert_eq!(def.parameters["required"][0], key);
            assert_eq!(def.parameters["properties"][key]["type"], "string");
        }
        assert!(defs.iter().any(|d| d.name == "save_order"));
        assert_eq!(defs.len(), TOOL_ARGUMENTS.len() + 1);
    }

    #[tokio::test]
    async fn dispatch_routes_to_tools() {
        let mut agent = BaristaAgent::new(OrderStore::new("unused"));

        let reply = agent
            .dispatch("set_milk", r#"{"milk_type": "Almond Milk"}"#)
            .await
            .unwrap();
        assert_eq!(reply, "Perfect! Almond Milk noted.");
        assert_eq!(agent.order().milk(), Some("almond milk"));
    }

    #[tokio::test]
    async fn dispatch_reports_malformed_calls_as_text() {
        let mut agent = BaristaAgent::new(OrderStore::new("unused"));

        let bad_json = agent.dispatch("set_size", "{not json").await.unwrap();
        assert!(bad_json.starts_with("ERROR: Failed to parse arguments JSON"));

        let missing = agent.dispatch("set_size", "{}").await.unwrap();
        assert_eq!(missing, "ERROR: Missing string argument 'size' for tool 'set_size'");

        let unknown = agent.dispatch("make_tea", "{}").await.unwrap();
        assert!(unknown.starts_with("ERROR: Unknown tool 'make_tea'"));
        assert!(unknown.contains("save_order"));

        assert_eq!(agent.order(), &barista_types::Order::new());
    }
}
