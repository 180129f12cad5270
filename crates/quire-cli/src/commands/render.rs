use anyhow::{Context, Result};
use quire_config::QuireConfig;
use quire_core::render::{html, text};
use quire_core::{memo, RenderNode};
use tracing::debug;

use crate::cli::OutputFormat;

/// Render memo `uid`, or a lone `![[memos/uid?params]]` directive when
/// `params` is given
pub async fn execute(
    config: QuireConfig,
    uid: String,
    format: OutputFormat,
    params: Option<String>,
) -> Result<()> {
    let renderer = super::renderer(&config)?;

    let tree = match &params {
        Some(params) => renderer.render_embed(&memo::resource_name(&uid), params).await,
        None => renderer.render(&uid).await,
    };
    debug!(uid, errors = tree.errors().len(), "rendered memo");

    if let RenderNode::Error { error } = &tree {
        anyhow::bail!("{error}");
    }

    print!("{}", format_tree(&tree, &uid, format)?);
    Ok(())
}

/// Serialize a rendered tree in the requested format
pub fn format_tree(tree: &RenderNode, uid: &str, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => text::to_text(tree),
        OutputFormat::Html => {
            let mut page = html::page(&memo::resource_name(uid), tree).into_string();
            page.push('\n');
            page
        }
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(tree).context("Failed to serialize render tree")?;
            json.push('\n');
            json
        }
    })
}
