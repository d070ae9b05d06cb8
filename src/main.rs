// HTTP Server: restyle
//
// Receives page HTML and an art-direction prompt from the browser extension,
// reduces the HTML to a styling skeleton and returns model-generated CSS.

use anyhow::Result;
use kodegen_tools_restyle::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal in production
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {e}");
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()?;
    config.log_summary();

    kodegen_tools_restyle::serve(config).await
}
