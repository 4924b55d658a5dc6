use log::debug;

use super::model::{Submission, SubmissionSet};

// ---------------------------------------------------------------------------
// Filter stages: which submissions count as "active"
// ---------------------------------------------------------------------------

/// Subcommittee selected by the `split-b` preset.
pub const SPLIT_B: &str = "Split B";

/// One predicate a submission must pass to be considered active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterStage {
    /// No decision recorded yet.
    Undecided,
    /// Belongs to the named subcommittee (exact match).
    Subcommittee(String),
    /// At least one review assigned and a primary reviewer named.
    HasPrimaryReviewer,
}

impl FilterStage {
    pub fn matches(&self, sub: &Submission) -> bool {
        match self {
            FilterStage::Undecided => sub.is_undecided(),
            FilterStage::Subcommittee(name) => sub.subcommittee == *name,
            FilterStage::HasPrimaryReviewer => {
                sub.reviews_total.is_some_and(|total| total > 0)
                    && !sub.primary_reviewer_name.is_empty()
            }
        }
    }
}

/// Ordered list of stages; a submission is active when it passes all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub stages: Vec<FilterStage>,
}

impl PipelineConfig {
    /// Every pending submission.
    pub fn base() -> Self {
        PipelineConfig {
            stages: vec![FilterStage::Undecided],
        }
    }

    /// Pending `Split B` submissions that already have a primary reviewer.
    pub fn split_b() -> Self {
        PipelineConfig {
            stages: vec![
                FilterStage::Undecided,
                FilterStage::Subcommittee(SPLIT_B.to_string()),
                FilterStage::HasPrimaryReviewer,
            ],
        }
    }

    /// Replace any subcommittee stage with `name`, or append one.
    pub fn with_subcommittee(mut self, name: &str) -> Self {
        self.stages
            .retain(|stage| !matches!(stage, FilterStage::Subcommittee(_)));
        self.stages.push(FilterStage::Subcommittee(name.to_string()));
        self
    }

    /// Append [`FilterStage::HasPrimaryReviewer`] unless already present.
    pub fn with_primary_reviewer(mut self) -> Self {
        if !self.stages.contains(&FilterStage::HasPrimaryReviewer) {
            self.stages.push(FilterStage::HasPrimaryReviewer);
        }
        self
    }

    /// Subcommittee the pipeline narrows to, if any.
    pub fn subcommittee(&self) -> Option<&str> {
        self.stages.iter().find_map(|stage| match stage {
            FilterStage::Subcommittee(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::base()
    }
}

// ---------------------------------------------------------------------------
// Derived subsets
// ---------------------------------------------------------------------------

/// Index lists into [`SubmissionSet::submissions`], each in file order.
///
/// Every list other than `active` is drawn from `active` independently, so
/// the lists may overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subsets {
    pub active: Vec<usize>,
    pub no_review: Vec<usize>,
    pub missing_any_external: Vec<usize>,
    pub missing_both_externals: Vec<usize>,
    pub missing_secondary: Vec<usize>,
}

/// Return indices of submissions that pass every stage in `config`.
pub fn active_indices(set: &SubmissionSet, config: &PipelineConfig) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..set.len()).collect();
    for stage in &config.stages {
        indices.retain(|&i| stage.matches(&set.submissions[i]));
        debug!("stage {stage:?}: {} submissions remain", indices.len());
    }
    indices
}

/// Run the whole pipeline: narrow to `active`, then derive each subset.
pub fn compute_subsets(set: &SubmissionSet, config: &PipelineConfig) -> Subsets {
    let active = active_indices(set, config);

    let select = |pred: fn(&Submission) -> bool| -> Vec<usize> {
        active
            .iter()
            .copied()
            .filter(|&i| pred(&set.submissions[i]))
            .collect()
    };

    let no_review = select(Submission::has_no_reviews_done);
    let missing_any_external = select(Submission::missing_any_external);
    let missing_both_externals = select(Submission::missing_both_externals);
    let missing_secondary = select(Submission::missing_secondary);

    let subsets = Subsets {
        active,
        no_review,
        missing_any_external,
        missing_both_externals,
        missing_secondary,
    };

    debug!(
        "subsets: active={} no_review={} missing_any_external={} missing_both_externals={} missing_secondary={}",
        subsets.active.len(),
        subsets.no_review.len(),
        subsets.missing_any_external.len(),
        subsets.missing_both_externals.len(),
        subsets.missing_secondary.len(),
    );
    subsets
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::RawRow;

    fn sub(
        id: i64,
        decision: &str,
        subcommittee: &str,
        done: Option<i64>,
        left: Option<i64>,
        e1: Option<f64>,
        e2: Option<f64>,
    ) -> Submission {
        Submission {
            id: Some(id),
            subcommittee: subcommittee.to_string(),
            decision: decision.to_string(),
            reviews_done: done,
            reviews_left: left,
            external1_score: e1,
            external2_score: e2,
            ..Submission::from(RawRow::default())
        }
    }

    fn three_rows() -> SubmissionSet {
        SubmissionSet::from_submissions(vec![
            sub(1, "", "Split A", Some(0), Some(2), None, Some(3.5)),
            sub(2, "REJECT", "Split A", Some(3), Some(0), Some(2.0), Some(2.5)),
            sub(3, "", "Split B", Some(1), Some(0), Some(4.0), Some(4.2)),
        ])
    }

    #[test]
    fn base_pipeline_on_three_rows() {
        let set = three_rows();
        let subsets = compute_subsets(&set, &PipelineConfig::base());

        assert_eq!(subsets.active, vec![0, 2]);
        assert_eq!(subsets.no_review, vec![0]);
        assert_eq!(subsets.missing_any_external, vec![0]);
        assert!(subsets.missing_both_externals.is_empty());
        // Neither active row has an S1score.
        assert_eq!(subsets.missing_secondary, vec![0, 2]);
    }

    #[test]
    fn subcommittee_stage_narrows_active() {
        let set = three_rows();
        let config = PipelineConfig::base().with_subcommittee("Split B");
        assert_eq!(active_indices(&set, &config), vec![2]);
        assert_eq!(config.subcommittee(), Some("Split B"));
    }

    #[test]
    fn with_subcommittee_replaces_existing_stage() {
        let config = PipelineConfig::split_b().with_subcommittee("Split C");
        assert_eq!(config.subcommittee(), Some("Split C"));
        assert_eq!(
            config
                .stages
                .iter()
                .filter(|s| matches!(s, FilterStage::Subcommittee(_)))
                .count(),
            1
        );
    }

    #[test]
    fn primary_reviewer_stage() {
        let mut with_reviewer = sub(1, "", SPLIT_B, None, None, None, None);
        with_reviewer.reviews_total = Some(3);
        with_reviewer.primary_reviewer_name = "Grace".to_string();

        let mut no_reviews = with_reviewer.clone();
        no_reviews.reviews_total = Some(0);

        let mut unknown_total = with_reviewer.clone();
        unknown_total.reviews_total = None;

        let mut unnamed = with_reviewer.clone();
        unnamed.primary_reviewer_name = String::new();

        let stage = FilterStage::HasPrimaryReviewer;
        assert!(stage.matches(&with_reviewer));
        assert!(!stage.matches(&no_reviews));
        assert!(!stage.matches(&unknown_total));
        assert!(!stage.matches(&unnamed));
    }

    #[test]
    fn split_b_preset_composes_all_stages() {
        let mut keep = sub(10, "", SPLIT_B, Some(0), Some(1), None, None);
        keep.reviews_total = Some(1);
        keep.primary_reviewer_name = "Alan".to_string();

        let mut wrong_split = keep.clone();
        wrong_split.subcommittee = "Split A".to_string();

        let mut decided = keep.clone();
        decided.decision = "ACCEPT".to_string();

        let set = SubmissionSet::from_submissions(vec![wrong_split, keep, decided]);
        let subsets = compute_subsets(&set, &PipelineConfig::split_b());
        assert_eq!(subsets.active, vec![1]);
        assert_eq!(subsets.missing_both_externals, vec![1]);
    }

    #[test]
    fn with_primary_reviewer_is_idempotent() {
        let config = PipelineConfig::split_b().with_primary_reviewer();
        assert_eq!(config, PipelineConfig::split_b());
    }

    fn arb_submission() -> impl Strategy<Value = Submission> {
        (
            any::<i64>(),
            prop_oneof![Just(""), Just("ACCEPT"), Just("REJECT")],
            prop_oneof![Just("Split A"), Just(SPLIT_B)],
            proptest::option::of(0i64..4),
            proptest::option::of(0i64..4),
            proptest::option::of(0.0f64..5.0),
            proptest::option::of(0.0f64..5.0),
            proptest::option::of(0.0f64..5.0),
        )
            .prop_map(|(id, decision, split, done, left, e1, e2, s1)| {
                let mut s = sub(id, decision, split, done, left, e1, e2);
                s.secondary_reviewer_score = s1;
                s
            })
    }

    fn is_subset(sub: &[usize], of: &[usize]) -> bool {
        sub.iter().all(|i| of.contains(i))
    }

    fn is_ascending(indices: &[usize]) -> bool {
        indices.windows(2).all(|w| w[0] < w[1])
    }

    proptest! {
        #[test]
        fn subsets_are_drawn_from_active(rows in proptest::collection::vec(arb_submission(), 0..40)) {
            let set = SubmissionSet::from_submissions(rows);
            for config in [PipelineConfig::base(), PipelineConfig::split_b()] {
                let s = compute_subsets(&set, &config);
                prop_assert!(s.active.len() <= set.len());
                prop_assert!(is_subset(&s.no_review, &s.active));
                prop_assert!(is_subset(&s.missing_any_external, &s.active));
                prop_assert!(is_subset(&s.missing_both_externals, &s.active));
                prop_assert!(is_subset(&s.missing_secondary, &s.active));
                prop_assert!(is_subset(&s.missing_both_externals, &s.missing_any_external));
                prop_assert!(is_ascending(&s.active));
                prop_assert!(is_ascending(&s.no_review));
            }
        }

        #[test]
        fn active_is_exactly_the_undecided_rows(rows in proptest::collection::vec(arb_submission(), 0..40)) {
            let set = SubmissionSet::from_submissions(rows);
            let active = active_indices(&set, &PipelineConfig::base());
            let expected: Vec<usize> = (0..set.len())
                .filter(|&i| set.submissions[i].decision.is_empty())
                .collect();
            prop_assert_eq!(active, expected);
        }
    }
}
