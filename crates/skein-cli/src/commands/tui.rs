use anyhow::Context;

use crate::app::coordinator::Coordinator;
use crate::client::{AppContext, CliError, CliResult};
use crate::ui;

pub(crate) async fn handle_tui(ctx: &AppContext) -> CliResult<()> {
    let coordinator = Coordinator::new(ctx.daemon.clone(), ctx.config.refresh.peers_interval());
    ui::run(coordinator, ctx.config.refresh.poll_interval())
        .await
        .context("interactive session failed")
        .map_err(CliError::failure)
}
