use crate::reports::{self, RunSummary};
use clap::Args;
use posehold_core::events::EventLog;
use posehold_core::trace::SessionTrace;
use posehold_core::PhResult;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Trace written by `simulate --record`. Carries its own configuration.
    pub trace: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &ReplayArgs) -> PhResult<()> {
    info!("📂 Loading trace: {}", args.trace.display());
    let trace = SessionTrace::load_from_file(&args.trace)?;

    let (outcome, log) = trace.replay(EventLog::new())?;
    let summary = RunSummary::new(&trace.config, &outcome);
    reports::print_run(&summary, &log, args.json)
}
