//! Registration request validation with sieve-validator
//!
//! Run with `RUST_LOG=sieve_validator=trace` to see per-field resolution.

use serde_json::{Value, json};
use sieve_validator::prelude::*;
use tracing_subscriber::EnvFilter;

fn register_schema() -> Result<Schema, ConfigurationFault> {
    Schema::builder("RegisterValidator")
        .field("username", [Rule::length(2, Some(20), "username must be 2-20 characters")])
        .field("email", [Rule::email("invalid email address")])
        .field("password", [Rule::strong_password("password is too weak")])
        .field("newsletter", [Rule::optional(false), Rule::boolean("newsletter must be a boolean")])
        .custom("validateConfirmPassword", |raw| async move {
            match (raw.get("body.password"), raw.get("body.confirm_password")) {
                (Some(a), Some(b)) if a == b => Ok(Value::Bool(true)),
                _ => Err("passwords do not match".to_owned()),
            }
        })
        .build()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ConfigurationFault> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let schema = register_schema()?;

    let good = RawRequest::new().body(json!({
        "username": "ab",
        "email": "a@b.com",
        "password": "Str0ng!Pass1",
        "confirm_password": "Str0ng!Pass1"
    }));
    match BaseValidator::with_schema(&good, schema.clone()).validate().await {
        Ok(validated) => {
            println!("✓ request accepted");
            for (field, value) in validated.fields() {
                println!("    {field} = {value}");
            }
        }
        Err(e) => println!("✗ unexpected: {e}"),
    }

    let bad = RawRequest::new().body(json!({
        "username": "a",
        "email": "nope",
        "password": "weak",
        "confirm_password": "other"
    }));
    match BaseValidator::with_schema(&bad, schema).validate().await {
        Ok(_) => println!("✓ request accepted"),
        Err(Error::Parameter(aggregate)) => {
            println!("✗ request rejected:");
            println!("{}", serde_json::to_string_pretty(&aggregate).unwrap_or_default());
        }
        Err(Error::Configuration(fault)) => return Err(fault),
    }

    Ok(())
}
