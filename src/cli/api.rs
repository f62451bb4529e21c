//
//  bbdc-cli
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! This command allows making direct HTTP requests to the Bitbucket Data
//! Center REST API, similar to `gh api` for GitHub. It's useful for
//! accessing API endpoints that aren't covered by other commands or for
//! debugging.
//!
//! ## Examples
//!
//! ```bash
//! # Get a project
//! bbdc api api/latest/projects/PROJ
//!
//! # Create a repository with POST
//! bbdc api -X POST api/latest/projects/PROJ/repos -F name=widget
//!
//! # Paginate through a list endpoint
//! bbdc api api/latest/projects/PROJ/repos --paginate --max-items 100
//! ```

use std::fs;

use anyhow::{bail, Result};
use clap::Args;
use reqwest::Method;
use serde_json::Value;

use super::GlobalOptions;
use crate::api::PageCursor;
use crate::output::write_json;

/// Make an authenticated raw API request
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// Endpoint path relative to the REST root (e.g. api/latest/projects)
    pub endpoint: String,

    /// HTTP method (GET, POST, PUT, DELETE)
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Request body fields (key=value, nested with dots)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Query parameters (key=value)
    #[arg(long, short = 'q', action = clap::ArgAction::Append)]
    pub query: Vec<String>,

    /// Read request body from file (- for stdin)
    #[arg(long, short = 'f')]
    pub input: Option<String>,

    /// Follow the page cursor of a paged list endpoint
    #[arg(long)]
    pub paginate: bool,

    /// Page size for each request when paginating
    #[arg(long, short = 'L', default_value = "50")]
    pub limit: u32,

    /// Maximum number of items to collect when paginating
    #[arg(long, default_value = "200")]
    pub max_items: usize,
}

impl ApiCommand {
    pub async fn run(&self, _global: &GlobalOptions) -> Result<()> {
        let client = super::client()?;
        let method = self.parse_method()?;
        let query = self.parse_query()?;
        let body = self.build_body()?;

        if self.paginate {
            if method != Method::GET {
                bail!("--paginate only supports GET requests");
            }
            let cursor =
                PageCursor::<Value>::new(&client, self.endpoint.clone(), query, self.limit);
            let items = cursor.collect(Some(self.max_items)).await?;
            return write_json(&Value::Array(items));
        }

        let value = client
            .dispatch(method, &self.endpoint, &query, body.as_ref())
            .await?;
        if !value.is_null() {
            write_json(&value)?;
        }
        Ok(())
    }

    fn parse_method(&self) -> Result<Method> {
        match self.method.to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => bail!("Unsupported HTTP method: {}", self.method),
        }
    }

    fn parse_query(&self) -> Result<Vec<(String, String)>> {
        self.query
            .iter()
            .map(|pair| {
                let parts: Vec<&str> = pair.splitn(2, '=').collect();
                if parts.len() != 2 {
                    bail!("Invalid query format: {}. Expected key=value", pair);
                }
                Ok((parts[0].to_string(), parts[1].to_string()))
            })
            .collect()
    }

    fn build_body(&self) -> Result<Option<Value>> {
        // If input file is specified, read from it
        if let Some(input) = &self.input {
            let content = if input == "-" {
                let mut buffer = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)?;
                buffer
            } else {
                fs::read_to_string(input)?
            };
            let value: Value = serde_json::from_str(&content)?;
            return Ok(Some(value));
        }

        if self.field.is_empty() {
            return Ok(None);
        }

        let mut body = serde_json::Map::new();
        for field in &self.field {
            let (key, value) = parse_field(field)?;
            set_nested_value(&mut body, &key, value);
        }
        Ok(Some(Value::Object(body)))
    }
}

fn parse_field(field: &str) -> Result<(String, Value)> {
    let parts: Vec<&str> = field.splitn(2, '=').collect();
    if parts.len() != 2 {
        bail!("Invalid field format: {}. Expected key=value", field);
    }

    let key = parts[0].to_string();
    let value_str = parts[1];

    // Try to parse as JSON
    let value = if value_str == "true" {
        Value::Bool(true)
    } else if value_str == "false" {
        Value::Bool(false)
    } else if value_str == "null" {
        Value::Null
    } else if let Ok(n) = value_str.parse::<i64>() {
        Value::Number(n.into())
    } else if value_str.starts_with('[') || value_str.starts_with('{') {
        serde_json::from_str(value_str).unwrap_or(Value::String(value_str.to_string()))
    } else {
        Value::String(value_str.to_string())
    };

    Ok((key, value))
}

fn set_nested_value(obj: &mut serde_json::Map<String, Value>, key: &str, value: Value) {
    let parts: Vec<&str> = key.split('.').collect();

    if parts.len() == 1 {
        obj.insert(key.to_string(), value);
    } else {
        let first = parts[0];
        let rest = parts[1..].join(".");

        if !obj.contains_key(first) {
            obj.insert(first.to_string(), Value::Object(serde_json::Map::new()));
        }

        if let Some(Value::Object(nested)) = obj.get_mut(first) {
            set_nested_value(nested, &rest, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_detects_json_scalars() {
        assert_eq!(parse_field("open=true").unwrap().1, Value::Bool(true));
        assert_eq!(parse_field("limit=25").unwrap().1, Value::Number(25.into()));
        assert_eq!(
            parse_field("name=widget").unwrap().1,
            Value::String("widget".into())
        );
    }

    #[test]
    fn test_set_nested_value_builds_objects_from_dotted_keys() {
        let mut body = serde_json::Map::new();
        set_nested_value(&mut body, "fromRef.id", Value::String("refs/heads/a".into()));
        set_nested_value(&mut body, "title", Value::String("T".into()));

        let value = Value::Object(body);
        assert_eq!(value["fromRef"]["id"], "refs/heads/a");
        assert_eq!(value["title"], "T");
    }

    #[test]
    fn test_invalid_field_format_is_rejected() {
        assert!(parse_field("no-equals-sign").is_err());
    }
}
