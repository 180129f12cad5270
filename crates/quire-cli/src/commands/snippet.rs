use anyhow::Result;
use quire_config::QuireConfig;

/// Print the snippet of memo `uid`
pub async fn execute(config: QuireConfig, uid: String) -> Result<()> {
    let renderer = super::renderer(&config)?;
    let Some(memo) = renderer.store().fetch_by_uid(&uid).await else {
        anyhow::bail!("Memo not found: {uid}");
    };
    println!("{}", memo.snippet);
    Ok(())
}
