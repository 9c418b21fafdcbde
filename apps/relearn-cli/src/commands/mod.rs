//! Command implementations.

pub mod check;
pub mod retrain;
pub mod score;
pub mod update;

use colored::Colorize;
use relearn_retrain::UpdateOutcome;
use tracing::{error, info};

/// Log every update outcome, and print one line per outcome when `print` is set.
pub(crate) fn report_outcomes(outcomes: &[UpdateOutcome], print: bool) {
    for outcome in outcomes {
        if outcome.is_success() {
            info!(artifact = %outcome.relative_location(), "{}", outcome);
            if print {
                println!("  {} {}", "✓".green(), outcome);
            }
        } else {
            error!(artifact = %outcome.relative_location(), "{}", outcome);
            if print {
                println!("  {} {}", "✗".red(), outcome);
            }
        }
    }
}
