use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::data::filter::PipelineConfig;
use crate::report::ReportOptions;

/// Export read when no path is given.
pub const DEFAULT_INPUT: &str = "Submissions.csv";

#[derive(Parser, Debug)]
#[command(name = "submission-triage")]
#[command(about = "Summarise pending submissions: missing reviews, externals and 2AC scores")]
#[command(version)]
pub struct Cli {
    /// Submissions export (.csv, .json or .parquet)
    #[arg(default_value = DEFAULT_INPUT)]
    pub path: PathBuf,

    /// Preset filter pipeline and report layout
    #[arg(long, value_enum, default_value_t = Variant::Base)]
    pub variant: Variant,

    /// Only count submissions from this subcommittee
    #[arg(long)]
    pub subcommittee: Option<String>,

    /// Only count submissions with assigned reviews and a primary reviewer
    #[arg(long)]
    pub require_primary: bool,

    /// Also print the IDs of submissions missing both externals
    #[arg(long)]
    pub list_missing_externals: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Every pending submission
    Base,
    /// Pending "Split B" submissions with a primary reviewer
    SplitB,
}

impl Cli {
    pub fn pipeline(&self) -> PipelineConfig {
        let mut config = match self.variant {
            Variant::Base => PipelineConfig::base(),
            Variant::SplitB => PipelineConfig::split_b(),
        };
        if let Some(name) = &self.subcommittee {
            config = config.with_subcommittee(name);
        }
        if self.require_primary {
            config = config.with_primary_reviewer();
        }
        config
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            list_missing_both_ids: self.list_missing_externals || self.variant == Variant::SplitB,
        }
    }
}
