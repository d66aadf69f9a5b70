//! Send one SMS with the vendor named in the configuration.
//!
//! Credentials come from `config/*.toml` or `SMS_ADAPTER__SMS__IDENTIFIER` /
//! `SMS_ADAPTER__SMS__SECRET`; the message from flags or env.
use sms_adapter::prelude::*;

use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    sms_adapter::telemetry::init(&config.logging)?;

    let from = arg_or_env("--from", "SMS_FROM");
    let to = arg_or_env("--to", "SMS_TO");
    let text = arg_or_env("--text", "SMS_TEXT");

    let sender = Sender::from_config(&config, &CredentialStore::new(), OptionsScope::Instance)?;
    let message = Message {
        from,
        to,
        text,
        kind: env::var("SMS_TYPE").ok(),
    };

    let res = sender.send(&message).await?;
    println!(
        "Sent via {} with id {}\nRaw: {}",
        res.provider,
        res.id,
        serde_json::to_string_pretty(&res.raw)?
    );
    Ok(())
}

fn arg_or_env(flag: &str, env_key: &str) -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(idx) = args.iter().position(|a| a == flag) {
        if idx + 1 < args.len() {
            return Some(args[idx + 1].clone());
        }
    }
    env::var(env_key).ok()
}
