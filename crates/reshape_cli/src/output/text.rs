//! Text output formatter

use reshape_ast::Location;
use reshape_util::UtilError;

use crate::commands::validate::FileReport;

pub fn output_text(reports: &[FileReport]) {
    for report in reports {
        match &report.error {
            None => println!("{}: ok ({} nodes)", report.path.display(), report.nodes),
            Some(err) => match location_of(err) {
                Some(loc) => println!(
                    "{}:{}: error: {}",
                    report.path.display(),
                    loc,
                    err.message()
                ),
                None => println!("{}: error: {}", report.path.display(), err.message()),
            },
        }
    }

    let invalid = reports.iter().filter(|r| !r.is_valid()).count();

    println!();
    println!(
        "Checked {} files, found {} invalid",
        reports.len(),
        invalid
    );
}

/// Source location of the offending node, when the parser recorded one.
fn location_of(err: &UtilError) -> Option<Location> {
    let location = err.node().get("location")?;
    serde_json::from_value(location.clone()).ok()
}
