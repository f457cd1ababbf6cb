//! `csforge doctor` command

use anyhow::Result;

use csforge::ops::{doctor, format_report};
use csforge::GlobalContext;

pub fn execute(verbose: bool) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let report = doctor(&ctx)?;

    // Print the formatted report
    let output = format_report(&report, verbose);
    print!("{}", output);

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
