use std::path::Path;

use anyhow::anyhow;
use skein_content::ContentTree;
use skein_torrent_core::{AddTorrent, AddTorrentOptions, TorrentId, TorrentSource};
use tracing::info;

use crate::cli::{AddArgs, FilesArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{OutputFormat, render_content_tree, render_torrent_list};

const LINK_SCHEMES: [&str; 3] = ["magnet:", "http://", "https://"];

fn source_for(raw: &str) -> CliResult<TorrentSource> {
    let source = raw.trim();
    if source.is_empty() {
        return Err(CliError::validation("source must not be empty"));
    }
    if LINK_SCHEMES.iter().any(|scheme| source.starts_with(scheme)) {
        return Ok(TorrentSource::link(source));
    }
    let path = Path::new(source);
    let bytes = std::fs::read(path).map_err(|err| {
        CliError::failure(anyhow!(
            "failed to read torrent file '{}': {err}",
            path.display()
        ))
    })?;
    Ok(TorrentSource::metainfo(bytes))
}

pub(crate) async fn handle_add(ctx: &AppContext, args: AddArgs) -> CliResult<()> {
    let request = AddTorrent {
        source: source_for(&args.source)?,
        options: AddTorrentOptions {
            download_dir: args.download_dir,
            labels: args.labels,
            paused: !args.start,
        },
    };
    match ctx.daemon.add_torrent(request).await? {
        Some(id) => {
            info!(torrent_id = %id, "torrent added");
            println!("Torrent added (id: {id})");
        }
        None => println!("Torrent submitted; the daemon returned no id"),
    }
    Ok(())
}

async fn list_output(ctx: &AppContext, output: OutputFormat) -> CliResult<String> {
    let torrents = ctx.daemon.list().await?;
    render_torrent_list(&torrents, output)
}

pub(crate) async fn handle_list(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    print!("{}", list_output(ctx, output).await?);
    Ok(())
}

async fn files_output(ctx: &AppContext, id: TorrentId, output: OutputFormat) -> CliResult<String> {
    let listing = ctx.daemon.content(id).await?;
    let tree = ContentTree::build(listing.leaves);
    render_content_tree(&tree, &listing.base_path, output)
}

pub(crate) async fn handle_files(
    ctx: &AppContext,
    args: FilesArgs,
    output: OutputFormat,
) -> CliResult<()> {
    print!("{}", files_output(ctx, TorrentId(args.id), output).await?);
    Ok(())
}
