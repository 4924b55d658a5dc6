use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Column names – exact header labels of the submissions export
// ---------------------------------------------------------------------------

/// Header labels the loader looks for, in export order.
pub const COLUMNS: [&str; 15] = [
    "ID",
    "Subcommittee",
    "Decision",
    "ReviewsTotal",
    "ReviewsDone",
    "ReviewsLeft",
    "ReviewsTentative",
    "OverallScore",
    "OverallStdDev",
    "Pname",
    "Pscore",
    "S1name",
    "S1score",
    "E1score",
    "E2score",
];

// ---------------------------------------------------------------------------
// RawRow – one row of text cells, before coercion
// ---------------------------------------------------------------------------

/// One row as text cells keyed by header label.
///
/// `None` means the cell was empty, null, or its column is missing from the
/// file. Every loader format funnels into this shape so coercion happens in
/// exactly one place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[serde(rename = "Subcommittee")]
    pub subcommittee: Option<String>,
    #[serde(rename = "Decision")]
    pub decision: Option<String>,
    #[serde(rename = "ReviewsTotal")]
    pub reviews_total: Option<String>,
    #[serde(rename = "ReviewsDone")]
    pub reviews_done: Option<String>,
    #[serde(rename = "ReviewsLeft")]
    pub reviews_left: Option<String>,
    #[serde(rename = "ReviewsTentative")]
    pub reviews_tentative: Option<String>,
    #[serde(rename = "OverallScore")]
    pub overall_score: Option<String>,
    #[serde(rename = "OverallStdDev")]
    pub overall_std_dev: Option<String>,
    #[serde(rename = "Pname")]
    pub pname: Option<String>,
    #[serde(rename = "Pscore")]
    pub pscore: Option<String>,
    #[serde(rename = "S1name")]
    pub s1name: Option<String>,
    #[serde(rename = "S1score")]
    pub s1score: Option<String>,
    #[serde(rename = "E1score")]
    pub e1score: Option<String>,
    #[serde(rename = "E2score")]
    pub e2score: Option<String>,
}

impl RawRow {
    /// Mutable access to a cell by header label. Unknown labels yield `None`.
    pub fn cell_mut(&mut self, column: &str) -> Option<&mut Option<String>> {
        let cell = match column {
            "ID" => &mut self.id,
            "Subcommittee" => &mut self.subcommittee,
            "Decision" => &mut self.decision,
            "ReviewsTotal" => &mut self.reviews_total,
            "ReviewsDone" => &mut self.reviews_done,
            "ReviewsLeft" => &mut self.reviews_left,
            "ReviewsTentative" => &mut self.reviews_tentative,
            "OverallScore" => &mut self.overall_score,
            "OverallStdDev" => &mut self.overall_std_dev,
            "Pname" => &mut self.pname,
            "Pscore" => &mut self.pscore,
            "S1name" => &mut self.s1name,
            "S1score" => &mut self.s1score,
            "E1score" => &mut self.e1score,
            "E2score" => &mut self.e2score,
            _ => return None,
        };
        Some(cell)
    }
}

// ---------------------------------------------------------------------------
// Submission – one typed row
// ---------------------------------------------------------------------------

/// A single paper submission.
///
/// Numeric cells that were empty or unparsable are `None`; there is no
/// sentinel value.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: Option<i64>,
    pub subcommittee: String,
    /// Empty while the paper is still pending.
    pub decision: String,
    pub reviews_total: Option<i64>,
    pub reviews_done: Option<i64>,
    pub reviews_left: Option<i64>,
    pub reviews_tentative: Option<i64>,
    pub overall_score: Option<f64>,
    pub overall_std_dev: Option<f64>,
    pub primary_reviewer_name: String,
    pub primary_reviewer_score: Option<f64>,
    /// The 2AC.
    pub secondary_reviewer_name: String,
    pub secondary_reviewer_score: Option<f64>,
    pub external1_score: Option<f64>,
    pub external2_score: Option<f64>,
}

impl From<RawRow> for Submission {
    fn from(row: RawRow) -> Self {
        let int = |cell: &Option<String>| cell.as_deref().and_then(parse_leading_int);
        let float = |cell: &Option<String>| cell.as_deref().and_then(parse_leading_float);
        let text = |cell: Option<String>| cell.map(|s| s.trim().to_string()).unwrap_or_default();

        Submission {
            id: int(&row.id),
            reviews_total: int(&row.reviews_total),
            reviews_done: int(&row.reviews_done),
            reviews_left: int(&row.reviews_left),
            reviews_tentative: int(&row.reviews_tentative),
            overall_score: float(&row.overall_score),
            overall_std_dev: float(&row.overall_std_dev),
            primary_reviewer_score: float(&row.pscore),
            secondary_reviewer_score: float(&row.s1score),
            external1_score: float(&row.e1score),
            external2_score: float(&row.e2score),
            subcommittee: text(row.subcommittee),
            decision: text(row.decision),
            primary_reviewer_name: text(row.pname),
            secondary_reviewer_name: text(row.s1name),
        }
    }
}

impl Submission {
    pub fn is_undecided(&self) -> bool {
        self.decision.is_empty()
    }

    /// Reviews are assigned but none has come in yet.
    pub fn has_no_reviews_done(&self) -> bool {
        self.reviews_done == Some(0) && self.reviews_left.is_some_and(|left| left > 0)
    }

    pub fn missing_any_external(&self) -> bool {
        self.external1_score.is_none() || self.external2_score.is_none()
    }

    pub fn missing_both_externals(&self) -> bool {
        self.external1_score.is_none() && self.external2_score.is_none()
    }

    pub fn missing_secondary(&self) -> bool {
        self.secondary_reviewer_score.is_none()
    }

    /// The id as printed in reports.
    pub fn display_id(&self) -> DisplayId {
        DisplayId(self.id)
    }
}

/// Renders an absent id as `NaN` so id lists keep one entry per submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayId(pub Option<i64>);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "NaN"),
        }
    }
}

// ---------------------------------------------------------------------------
// SubmissionSet – the complete loaded export
// ---------------------------------------------------------------------------

/// All submissions of one export, in file order.
#[derive(Debug, Clone, Default)]
pub struct SubmissionSet {
    pub submissions: Vec<Submission>,
    /// Distinct subcommittee labels, sorted.
    pub subcommittees: BTreeSet<String>,
}

impl SubmissionSet {
    pub fn from_submissions(submissions: Vec<Submission>) -> Self {
        let subcommittees = submissions
            .iter()
            .map(|s| s.subcommittee.clone())
            .collect();
        SubmissionSet {
            submissions,
            subcommittees,
        }
    }

    /// Number of submissions.
    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    /// Whether the export had no data rows.
    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Lenient numeric coercion
// ---------------------------------------------------------------------------

/// Parse the longest integer prefix of `s`.
///
/// Accepts surrounding whitespace, an optional sign, then decimal digits or
/// hex digits after `0x`. Anything after the digits is ignored, so `"2.7"`
/// yields 2. Returns `None` when there are no digits or the value overflows.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, rest) = split_sign(s);

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the longest decimal floating-point prefix of `s`.
///
/// Accepts surrounding whitespace, an optional sign, `Infinity`, or digits
/// with an optional fraction and exponent. `"3.5x"` yields 3.5 and `".5"`
/// yields 0.5; `""`, `"."` and `"abc"` yield `None`.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim();
    let (negative, rest) = split_sign(s);

    if rest.starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let bytes = rest.as_bytes();
    let count_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_digits = count_digits(0);
    let mut end = int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(end + 1);
        end += 1 + frac_digits;
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    let magnitude: f64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        let mut raw = RawRow::default();
        for (column, value) in cells {
            *raw.cell_mut(column).unwrap() = Some(value.to_string());
        }
        raw
    }

    #[test]
    fn int_prefix_rules() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  -7 "), Some(-7));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("2.7"), Some(2));
        assert_eq!(parse_leading_int("12abc"), Some(12));
        assert_eq!(parse_leading_int("0x1A"), Some(26));
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }

    #[test]
    fn float_prefix_rules() {
        assert_eq!(parse_leading_float("3.5"), Some(3.5));
        assert_eq!(parse_leading_float("3.5x"), Some(3.5));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("-2e3"), Some(-2000.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("1e+"), Some(1.0));
        assert_eq!(parse_leading_float("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_leading_float("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float("NaN"), None);
    }

    #[test]
    fn coercion_from_raw_row() {
        let sub = Submission::from(row(&[
            ("ID", "17"),
            ("Subcommittee", "  Split B "),
            ("ReviewsDone", "0"),
            ("ReviewsLeft", "2"),
            ("E1score", "n/a"),
            ("E2score", "3.5"),
            ("Pname", " Ada "),
        ]));

        assert_eq!(sub.id, Some(17));
        assert_eq!(sub.subcommittee, "Split B");
        assert_eq!(sub.decision, "");
        assert_eq!(sub.primary_reviewer_name, "Ada");
        assert_eq!(sub.secondary_reviewer_name, "");
        assert_eq!(sub.reviews_total, None);
        assert_eq!(sub.external1_score, None);
        assert_eq!(sub.external2_score, Some(3.5));
        assert!(sub.is_undecided());
        assert!(sub.has_no_reviews_done());
        assert!(sub.missing_any_external());
        assert!(!sub.missing_both_externals());
        assert!(sub.missing_secondary());
    }

    #[test]
    fn absent_review_counts_never_match_no_review() {
        let sub = Submission::from(row(&[("ReviewsDone", "0"), ("ReviewsLeft", "")]));
        assert!(!sub.has_no_reviews_done());

        let sub = Submission::from(row(&[("ReviewsDone", ""), ("ReviewsLeft", "3")]));
        assert!(!sub.has_no_reviews_done());

        let sub = Submission::from(row(&[("ReviewsDone", "0"), ("ReviewsLeft", "0")]));
        assert!(!sub.has_no_reviews_done());
    }

    #[test]
    fn display_id_marks_absent() {
        assert_eq!(DisplayId(Some(5)).to_string(), "5");
        assert_eq!(DisplayId(None).to_string(), "NaN");
    }

    #[test]
    fn set_collects_subcommittees() {
        let set = SubmissionSet::from_submissions(vec![
            Submission::from(row(&[("Subcommittee", "Split B")])),
            Submission::from(row(&[("Subcommittee", "Split A")])),
            Submission::from(row(&[("Subcommittee", "Split B")])),
        ]);
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
        assert_eq!(
            set.subcommittees.iter().cloned().collect::<Vec<_>>(),
            vec!["Split A".to_string(), "Split B".to_string()]
        );
    }
}
