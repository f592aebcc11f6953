use anyhow::{bail, Context};
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config;

pub fn handle(clerk_id: &str, hours: Option<u64>, output_format: OutputFormat) -> anyhow::Result<()> {
    if crate::is_production!() {
        bail!("refusing to mint development tokens in production");
    }

    let config = config::config();
    if config.auth.jwt_public_key.is_some() {
        bail!("AUTH_JWT_PUBLIC_KEY is set; the server will not accept HS256 development tokens");
    }

    let hours = hours.unwrap_or(config.auth.token_expiry_hours);
    let claims = Claims::new(clerk_id, hours);
    let expires_at = claims.exp;
    let token = generate_jwt(&config.auth.jwt_secret, &claims).context("AUTH_JWT_SECRET must be set")?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "token": token, "sub": clerk_id, "exp": expires_at })
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
