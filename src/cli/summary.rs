use std::sync::Arc;

use crate::cli::commands::SummaryArgs;
use crate::cli::resolve_config;
use crate::errors::ConsoleError;
use crate::gateway::{Gateway, HttpGateway};
use crate::render::summary::{format_panels, render_summary};

pub async fn handle_summary(args: SummaryArgs) -> Result<(), ConsoleError> {
    let config = resolve_config(&args.connection).await?;
    let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(&config.base_url));

    let doc = gateway.fetch_summary().await?;
    let max_inline = if args.all {
        usize::MAX
    } else {
        config.max_inline_recommendations
    };
    let panels = render_summary(&doc, max_inline);
    print!("{}", format_panels(&panels, &config.organization));
    Ok(())
}
