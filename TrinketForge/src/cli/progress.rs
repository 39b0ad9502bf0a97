//! CLI progress display utilities
//!
//! Step indicators with emojis for each synthesis phase, plus a spinner that
//! follows the phase callbacks.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::assembler::{SynthesisPhase, SynthesisProgress};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading the catalog
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Crystal ball - for asking the generator
pub static CRYSTAL_BALL: Emoji<'_, '_> = Emoji("🔮 ", "");
/// Gear - for compiling buffs
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Warning sign - for degraded values
pub static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// Emoji shown for a synthesis phase.
#[must_use]
pub fn phase_emoji(phase: SynthesisPhase) -> Emoji<'static, 'static> {
    match phase {
        SynthesisPhase::NamingTrinket
        | SynthesisPhase::ChoosingClass
        | SynthesisPhase::ChoosingRarity
        | SynthesisPhase::ChoosingStats
        | SynthesisPhase::TuningStats => CRYSTAL_BALL,
        SynthesisPhase::CompilingBuffs => GEAR,
        SynthesisPhase::WritingBuffs
        | SynthesisPhase::UpdatingRarities
        | SynthesisPhase::WritingStrings
        | SynthesisPhase::WritingEntry => DISK,
        SynthesisPhase::Complete => SPARKLE,
    }
}

/// Print a step indicator: `[1/3] 🔍 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print an unnumbered status line: `🔍 Message...`
///
/// For work outside the numbered steps, such as loading the catalog.
pub fn print_status(emoji: Emoji, msg: &str) {
    println!("{}", status_line(&emoji, msg));
}

fn status_line(emoji: &Emoji, msg: &str) -> String {
    format!("{emoji}{msg}")
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Spinner style for synthesis steps
///
/// Format: `[2/5] ⠋ Choosing class: Starweave Pendant`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:.bold.dim} {spinner} {wide_msg}")
        .expect("valid template")
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
}

/// Create a spinner for one trinket's synthesis
#[must_use]
pub fn synthesis_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Move the spinner to the reported phase.
pub fn update_spinner(pb: &ProgressBar, progress: &SynthesisProgress) {
    pb.set_prefix(format!("[{}/{}]", progress.current, progress.total));
    let msg = match &progress.detail {
        Some(detail) => format!("{}{}: {detail}", phase_emoji(progress.phase), progress.phase.as_str()),
        None => format!("{}{}", phase_emoji(progress.phase), progress.phase.as_str()),
    };
    pb.set_message(msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_has_no_step_counter() {
        let line = status_line(&Emoji("🔍 ", ""), "Loading catalog...");
        assert!(line.ends_with("Loading catalog..."));
        assert!(!line.contains('['));
    }
}
