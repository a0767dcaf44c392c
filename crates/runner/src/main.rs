use anyhow::Context;

fn main() -> anyhow::Result<()> {
    cyclecount_observability::init();

    let config = cyclecount_runner::RunnerConfig::from_env()?;
    tracing::info!(snapshot = %config.snapshot_path.display(), "evaluating cycle count rules");

    let proposals = cyclecount_runner::run(&config)?;

    let out = serde_json::to_string_pretty(&proposals).context("serializing proposals")?;
    println!("{out}");
    Ok(())
}
