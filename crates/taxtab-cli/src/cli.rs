//! Command line argument definitions for the taxtab binary.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use taxtab_ingest::{SampleSheetFormat, SupportedProfiler};
use taxtab_output::{StandardProfileFormat, WideObservationTableFormat};

#[derive(Debug, Parser)]
#[command(
    name = "taxtab",
    version,
    about = "Standardise and merge taxonomic profiles",
    long_about = "Standardise taxonomic abundance reports from metagenomic classifiers\n\
                  and merge them into a single observation table.\n\n\
                  Standardised profiles have two columns, taxonomy_id and count, with\n\
                  unclassified reads collected under identifier 0. Merged tables can be\n\
                  enriched with names, ranks, and lineages from an NCBI-style taxdump."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Standardise two or more profiles and merge them into one table.
    Merge(MergeArgs),

    /// Standardise a single profile.
    Standardise(StandardiseArgs),

    /// List all supported profilers.
    Profilers,
}

/// Arguments for the merge subcommand.
///
/// Profiles arrive either as positional paths or through a sample sheet;
/// exactly one of the two must be given.
#[derive(Debug, Parser)]
#[command(group(
    ArgGroup::new("profile_source")
        .required(true)
        .args(["profiles", "samplesheet"])
))]
pub struct MergeArgs {
    /// Two or more profile files; each file stem becomes a sample name.
    #[arg(value_name = "PROFILE", num_args = 2..)]
    pub profiles: Vec<PathBuf>,

    /// The classifier that produced every given profile.
    #[arg(long, short = 'p', value_enum)]
    pub profiler: ProfilerArg,

    /// Table of sample names and profile paths, instead of positional profiles.
    #[arg(long, short = 's', value_name = "PATH")]
    pub samplesheet: Option<PathBuf>,

    /// Sample sheet format (default: guessed from its extension).
    #[arg(long = "samplesheet-format", value_enum, requires = "samplesheet")]
    pub samplesheet_format: Option<SheetFormatArg>,

    /// Where to write the merged table.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Output format (default: guessed from the output extension).
    #[arg(long = "output-format", value_enum)]
    pub output_format: Option<MergeFormatArg>,

    /// Merge into a wide table, one count column per sample (default).
    #[arg(long, overrides_with = "long")]
    pub wide: bool,

    /// Merge into a long three-column table instead.
    #[arg(long, overrides_with = "wide")]
    pub long: bool,

    /// Directory with the taxdump files nodes.dmp and names.dmp.
    #[arg(long, value_name = "DIR")]
    pub taxonomy: Option<PathBuf>,

    /// Sum each profile onto the nearest ancestor at this rank.
    #[arg(long = "summarise-at", value_name = "RANK", requires = "taxonomy")]
    pub summarise_at: Option<String>,

    /// Add a column with the taxon name.
    #[arg(long = "add-name", requires = "taxonomy")]
    pub add_name: bool,

    /// Add a column with the taxon rank.
    #[arg(long = "add-rank", requires = "taxonomy")]
    pub add_rank: bool,

    /// Add a column with the name lineage, root to taxon.
    #[arg(long = "add-lineage", requires = "taxonomy")]
    pub add_lineage: bool,

    /// Add a column with the taxonomy identifier lineage.
    #[arg(long = "add-id-lineage", requires = "taxonomy")]
    pub add_id_lineage: bool,

    /// Add a column with the rank lineage.
    #[arg(long = "add-rank-lineage", requires = "taxonomy")]
    pub add_rank_lineage: bool,

    /// Skip profiles that fail standardisation instead of aborting.
    #[arg(long = "ignore-errors")]
    pub ignore_errors: bool,
}

/// Arguments for the standardise subcommand.
#[derive(Debug, Parser)]
pub struct StandardiseArgs {
    /// The profile file to standardise.
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// The classifier that produced the profile.
    #[arg(long, short = 'p', value_enum)]
    pub profiler: ProfilerArg,

    /// Where to write the standardised profile.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Output format (default: guessed from the output extension).
    #[arg(long = "output-format", value_enum)]
    pub output_format: Option<ProfileFormatArg>,

    /// Directory with the taxdump files nodes.dmp and names.dmp.
    #[arg(long, value_name = "DIR")]
    pub taxonomy: Option<PathBuf>,

    /// Sum the profile onto the nearest ancestor at this rank.
    #[arg(long = "summarise-at", value_name = "RANK", requires = "taxonomy")]
    pub summarise_at: Option<String>,
}

/// CLI profiler choices, spelled the way the tools are.
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "lower")]
pub enum ProfilerArg {
    Bracken,
    Centrifuge,
    Diamond,
    Ganon,
    Kaiju,
    Kmcp,
    Kraken2,
    KrakenUniq,
    Malt,
    Megan6,
    Metaphlan,
    Motus,
}

impl ProfilerArg {
    pub fn to_profiler(self) -> SupportedProfiler {
        match self {
            Self::Bracken => SupportedProfiler::Bracken,
            Self::Centrifuge => SupportedProfiler::Centrifuge,
            Self::Diamond => SupportedProfiler::Diamond,
            Self::Ganon => SupportedProfiler::Ganon,
            Self::Kaiju => SupportedProfiler::Kaiju,
            Self::Kmcp => SupportedProfiler::Kmcp,
            Self::Kraken2 => SupportedProfiler::Kraken2,
            Self::KrakenUniq => SupportedProfiler::KrakenUniq,
            Self::Malt => SupportedProfiler::Malt,
            Self::Megan6 => SupportedProfiler::Megan6,
            Self::Metaphlan => SupportedProfiler::Metaphlan,
            Self::Motus => SupportedProfiler::Motus,
        }
    }
}

/// Merged table output format choices.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MergeFormatArg {
    Tsv,
    Csv,
    Xlsx,
    Arrow,
    Parquet,
    Biom,
}

impl MergeFormatArg {
    /// Wide-table format this choice stands for; long shapes are derived
    /// from it later, once BIOM has been ruled out.
    pub fn to_wide_format(self) -> WideObservationTableFormat {
        match self {
            Self::Tsv => WideObservationTableFormat::Tsv,
            Self::Csv => WideObservationTableFormat::Csv,
            Self::Xlsx => WideObservationTableFormat::Xlsx,
            Self::Arrow => WideObservationTableFormat::Arrow,
            Self::Parquet => WideObservationTableFormat::Parquet,
            Self::Biom => WideObservationTableFormat::Biom,
        }
    }
}

/// Standard profile output format choices.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProfileFormatArg {
    Tsv,
    Csv,
    Xlsx,
    Arrow,
    Parquet,
}

impl ProfileFormatArg {
    pub fn to_format(self) -> StandardProfileFormat {
        match self {
            Self::Tsv => StandardProfileFormat::Tsv,
            Self::Csv => StandardProfileFormat::Csv,
            Self::Xlsx => StandardProfileFormat::Xlsx,
            Self::Arrow => StandardProfileFormat::Arrow,
            Self::Parquet => StandardProfileFormat::Parquet,
        }
    }
}

/// Sample sheet format choices.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SheetFormatArg {
    Tsv,
    Csv,
    Xlsx,
    Arrow,
    Parquet,
}

impl SheetFormatArg {
    pub fn to_format(self) -> SampleSheetFormat {
        match self {
            Self::Tsv => SampleSheetFormat::Tsv,
            Self::Csv => SampleSheetFormat::Csv,
            Self::Xlsx => SampleSheetFormat::Xlsx,
            Self::Arrow => SampleSheetFormat::Arrow,
            Self::Parquet => SampleSheetFormat::Parquet,
        }
    }
}

/// CLI log level choices.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
