use siprtt_common::config::Config;
use siprtt_common::network::target::Origin;

use crate::terminal::print;

pub async fn targets(cfg: &Config) -> anyhow::Result<()> {
    print::header("probe targets");

    let source = super::target_source(cfg).await?;
    let targets = source.enumerate().await;

    if targets.is_empty() {
        print::print_status("No trunks configured and no contacts registered");
        return Ok(());
    }

    for target in &targets {
        let origin = match target.origin {
            Origin::Static => "trunk",
            Origin::Discovered => "contact",
        };
        print::aligned_line(&target.name, format!("{}:{} ({origin})", target.host, target.port));
    }
    Ok(())
}
