use std::io::{self, Write};

use crate::data::filter::Subsets;
use crate::data::model::SubmissionSet;

/// What the report prints beyond the fixed count lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Print the ids of submissions missing both externals, when there are any.
    pub list_missing_both_ids: bool,
}

/// `", "`-joined ids for the given indices, in the order given.
fn id_list(set: &SubmissionSet, indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&i| set.submissions[i].display_id().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write the summary to `out`, one metric per line.
pub fn write_report<W: Write>(
    out: &mut W,
    set: &SubmissionSet,
    subsets: &Subsets,
    options: ReportOptions,
) -> io::Result<()> {
    let raw = set.len();
    let active = subsets.active.len();

    writeln!(out, "{raw} submissions total")?;
    writeln!(out, "{active} filtered total")?;
    writeln!(out, "{} filtered out", raw - active)?;
    writeln!(
        out,
        "{} submissions with no reviews done",
        subsets.no_review.len()
    )?;
    writeln!(
        out,
        "\t {} IDs of no reviews done",
        id_list(set, &subsets.no_review)
    )?;
    writeln!(
        out,
        "{} submissions with missing both externals",
        subsets.missing_both_externals.len()
    )?;
    writeln!(
        out,
        "{} submissions with missing an external",
        subsets.missing_any_external.len()
    )?;
    writeln!(
        out,
        "{} submissions with missing 2AC reviews",
        subsets.missing_secondary.len()
    )?;

    if options.list_missing_both_ids && !subsets.missing_both_externals.is_empty() {
        writeln!(
            out,
            "{} IDs of missing both externals",
            id_list(set, &subsets.missing_both_externals)
        )?;
    }
    Ok(())
}
