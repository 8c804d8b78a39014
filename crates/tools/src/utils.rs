//! Shared utilities for tool input parsing.
//!
//! Tool inputs arrive as loosely-typed JSON from the orchestration loop.
//! This module turns them into typed values once, at ingress, so services
//! only ever see well-shaped requests.

use serde::de::DeserializeOwned;
use serde_json::Value;

use ferry_core::error::{ToolError, ToolResult};
use ferry_core::models::{Amount, NativeToken, Stablecoin};
use ferry_core::ports::ToolContext;

/// Token used when neither the input nor the context names a network.
pub const DEFAULT_TOKEN: NativeToken = NativeToken::Dot;

/// Typed accessors over a tool's JSON input object.
///
/// Every error names the tool and the offending field.
#[derive(Debug, Clone, Copy)]
pub struct InputReader<'a> {
    tool: &'static str,
    input: &'a serde_json::Map<String, Value>,
}

impl<'a> InputReader<'a> {
    /// Wrap an input value, which must be a JSON object.
    pub fn new(tool: &'static str, input: &'a Value) -> ToolResult<Self> {
        let input = input
            .as_object()
            .ok_or_else(|| ToolError::invalid_input(tool, "input must be a JSON object"))?;
        Ok(Self { tool, input })
    }

    fn error(&self, message: impl Into<String>) -> ToolError {
        ToolError::invalid_input(self.tool, message)
    }

    /// Field value; explicit `null` counts as absent.
    fn field(&self, key: &str) -> Option<&'a Value> {
        self.input.get(key).filter(|v| !v.is_null())
    }

    /// Whether a non-null value was supplied for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    fn required(&self, key: &str) -> ToolResult<&'a Value> {
        self.field(key)
            .ok_or_else(|| self.error(format!("missing field `{key}`")))
    }

    // -------------------------------------------------------------------------
    // Strings
    // -------------------------------------------------------------------------

    pub fn string(&self, key: &str) -> ToolResult<String> {
        self.optional_string(key)?
            .ok_or_else(|| self.error(format!("missing field `{key}`")))
    }

    /// Optional string; surrounding whitespace is trimmed.
    pub fn optional_string(&self, key: &str) -> ToolResult<Option<String>> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
            Some(_) => Err(self.error(format!("field `{key}` must be a string"))),
        }
    }

    pub fn string_list(&self, key: &str) -> ToolResult<Vec<String>> {
        let Value::Array(items) = self.required(key)? else {
            return Err(self.error(format!("field `{key}` must be an array of strings")));
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.trim().to_string())
                    .ok_or_else(|| self.error(format!("field `{key}` must be an array of strings")))
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Numbers
    // -------------------------------------------------------------------------

    /// Decimal amount given as a JSON number or a decimal string.
    ///
    /// Shape errors are input errors; a malformed or negative number is an
    /// amount rejection.
    pub fn amount(&self, key: &str) -> ToolResult<Amount> {
        let raw = match self.required(key)? {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => {
                return Err(self.error(format!(
                    "field `{key}` must be a number or a decimal string"
                )));
            }
        };
        Ok(Amount::parse(&raw)?)
    }

    pub fn integer(&self, key: &str) -> ToolResult<i64> {
        let parsed = match self.required(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.error(format!("field `{key}` must be an integer")))
    }

    // -------------------------------------------------------------------------
    // Symbols and enums
    // -------------------------------------------------------------------------

    /// Required native token restricted to `allowed`.
    pub fn native_token(&self, key: &str, allowed: &[NativeToken]) -> ToolResult<NativeToken> {
        let raw = self.string(key)?;
        raw.parse::<NativeToken>()
            .ok()
            .filter(|token| allowed.contains(token))
            .ok_or_else(|| self.error(format!("unsupported {key} `{raw}`")))
    }

    /// Optional native token, defaulting to the active network's token, then DOT.
    pub fn native_token_or_default(&self, key: &str, ctx: &ToolContext) -> ToolResult<NativeToken> {
        match self.optional_string(key)? {
            Some(raw) => raw
                .parse::<NativeToken>()
                .map_err(|e| self.error(e.to_string())),
            None => Ok(ctx
                .active_chain
                .as_deref()
                .and_then(NativeToken::for_network)
                .unwrap_or(DEFAULT_TOKEN)),
        }
    }

    pub fn stablecoin(&self, key: &str) -> ToolResult<Stablecoin> {
        let raw = self.string(key)?;
        raw.parse::<Stablecoin>()
            .map_err(|e| self.error(e.to_string()))
    }

    /// Deserialize a field into a serde enum (e.g. `"Staked"` → `PayeeSelector::Staked`).
    pub fn choice<T: DeserializeOwned>(&self, key: &str) -> ToolResult<T> {
        let value = self.required(key)?;
        serde_json::from_value(value.clone())
            .map_err(|_| self.error(format!("unsupported value {value} for `{key}`")))
    }

    pub fn optional_choice<T: DeserializeOwned>(&self, key: &str) -> ToolResult<Option<T>> {
        match self.field(key) {
            None => Ok(None),
            Some(_) => self.choice(key).map(Some),
        }
    }

    /// Nested object, read with the same tool name.
    pub fn object(&self, key: &str) -> ToolResult<InputReader<'a>> {
        let value = self.required(key)?;
        InputReader::new(self.tool, value)
            .map_err(|_| self.error(format!("field `{key}` must be an object")))
    }
}

/// Resolve an optional address field against the active account.
pub fn account_or_active(
    tool: &'static str,
    explicit: Option<String>,
    ctx: &ToolContext,
    field: &str,
) -> ToolResult<String> {
    explicit
        .filter(|s| !s.is_empty())
        .or_else(|| ctx.active_account.clone())
        .ok_or_else(|| {
            ToolError::invalid_input(tool, format!("missing field `{field}` and no active account"))
        })
}

// =============================================================================
// Tests
// =============================================================================
