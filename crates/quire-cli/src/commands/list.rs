use anyhow::{Context, Result};
use quire_config::QuireConfig;
use tracing::warn;

/// List memo uids with their short form and snippet
pub async fn execute(config: QuireConfig) -> Result<()> {
    let renderer = super::renderer(&config)?;
    let source = super::directory_source(&config)?;
    let uids = source.uids().await.context("Failed to list memo directory")?;

    for uid in uids {
        match renderer.store().fetch_by_uid(&uid).await {
            Some(memo) => println!("{}\t{}", memo.short_uid(), first_line(&memo.snippet)),
            None => warn!(uid, "memo listed but could not be loaded"),
        }
    }
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("one\ntwo"), "one");
        assert_eq!(first_line(""), "");
    }
}
