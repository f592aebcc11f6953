use crate::cli::OutputFormat;
use crate::config;

/// Secrets are marked `skip_serializing` on the config structs
pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => {
            println!("environment:      {:?}", config.environment);
            println!("storage backend:  {:?}", config.database.backend);
            println!(
                "database:         {}",
                config.redacted_database_url().unwrap_or_else(|| "<unset>".to_string())
            );
            println!("port:             {}", config.api.port);
            println!("cors origins:     {}", config.security.cors_origins.join(", "));
            println!("settings owner:   {}", config.security.settings_owner_check);
            println!(
                "jwt verification: {}",
                if config.auth.jwt_public_key.is_some() { "RS256 (public key)" } else { "HS256 (shared secret)" }
            );
        }
    }
    Ok(())
}
