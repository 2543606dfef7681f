use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "twostep",
    version,
    about = "Two-step confirmation button demo for the terminal"
)]
pub struct Args {
    /// Theme name (e.g., "Catppuccin Mocha")
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Confirmation prompt timeout in milliseconds
    #[arg(long)]
    pub prompt_timeout_ms: Option<u64>,

    /// Success display duration in milliseconds
    #[arg(long)]
    pub success_display_ms: Option<u64>,

    /// Resolve success straight back to the idle state instead of resting
    /// in a completed state
    #[arg(long)]
    pub three_phase: bool,
}
