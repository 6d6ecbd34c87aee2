use std::sync::Arc;

use crate::cli::commands::ModuleArgs;
use crate::cli::resolve_config;
use crate::errors::ConsoleError;
use crate::gateway::{Gateway, HttpGateway};
use crate::render::detail::{format_panel, resolve_detail};

pub async fn handle_module(args: ModuleArgs) -> Result<(), ConsoleError> {
    let config = resolve_config(&args.connection).await?;
    let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(&config.base_url));

    let payload = gateway.fetch_module_detail(&args.module).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }
    let panel = resolve_detail(&args.module, &payload)?;
    print!("{}", format_panel(&panel));
    Ok(())
}
