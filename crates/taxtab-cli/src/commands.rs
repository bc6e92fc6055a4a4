//! Subcommand runners behind the taxtab binary.

use std::path::Path;

use anyhow::Result;
use comfy_table::Table;
use polars::prelude::DataFrame;
use taxtab_core::{RankSummary, SampleEtl, etl_samples, merge_long, merge_wide};
use taxtab_ingest::SupportedProfiler;
use taxtab_ingest::sample_sheet::read_sample_sheet_as;
use taxtab_model::standard_profile::TAXONOMY_ID;
use taxtab_output::{
    WideObservationTableFormat, write_standard_profile, write_tidy_table, write_wide_table,
};
use taxtab_taxonomy::{Taxonomy, UnmappedRank};
use tracing::info_span;

use crate::cli::{MergeArgs, StandardiseArgs};
use crate::pipeline::{
    MergeOutput, entries_from_paths, resolve_merge_output, resolve_profile_format,
    resolve_sheet_format, sample_name,
};
use crate::summary::apply_table_style;
use crate::types::{MergeReport, StandardiseReport};

/// Standardise all given profiles and merge them into one table.
pub fn run_merge(args: &MergeArgs) -> Result<MergeReport> {
    let span = info_span!("merge");
    let _guard = span.enter();

    let output = resolve_merge_output(&args.output, args.output_format, args.long)?;
    let entries = if let Some(sheet) = &args.samplesheet {
        let format = resolve_sheet_format(sheet, args.samplesheet_format)?;
        read_sample_sheet_as(sheet, format)?
    } else {
        entries_from_paths(&args.profiles)?
    };

    let taxonomy = load_taxonomy(args.taxonomy.as_deref())?;
    let etl = build_etl(
        args.profiler.to_profiler(),
        taxonomy.as_ref(),
        args.summarise_at.as_deref(),
    );
    let samples = etl_samples(&etl, &entries, args.ignore_errors)?;

    let taxa = match output {
        MergeOutput::Wide(format) => {
            let mut table = merge_wide(&samples)?;
            if format != WideObservationTableFormat::Biom {
                table = annotate(table, taxonomy.as_ref(), args)?;
            }
            let taxa = table.height();
            write_wide_table(&table, &args.output, format, taxonomy.as_ref())?;
            taxa
        }
        MergeOutput::Tidy(format) => {
            let mut table = merge_long(&samples)?;
            table = annotate(table, taxonomy.as_ref(), args)?;
            let taxa = table
                .column(TAXONOMY_ID)?
                .as_materialized_series()
                .n_unique()?;
            write_tidy_table(&table, &args.output, format)?;
            taxa
        }
    };
    tracing::info!(
        samples = samples.len(),
        taxa,
        output = %args.output.display(),
        "Wrote merged table"
    );

    Ok(MergeReport {
        samples: samples.len(),
        taxa,
        output: args.output.clone(),
    })
}

/// Standardise a single profile and write it out.
pub fn run_standardise(args: &StandardiseArgs) -> Result<StandardiseReport> {
    let span = info_span!("standardise");
    let _guard = span.enter();

    let format = resolve_profile_format(&args.output, args.output_format)?;
    let sample = sample_name(&args.profile)?;
    let taxonomy = load_taxonomy(args.taxonomy.as_deref())?;
    let etl = build_etl(
        args.profiler.to_profiler(),
        taxonomy.as_ref(),
        args.summarise_at.as_deref(),
    );
    let standardised = etl.etl_sample(&sample, &args.profile)?;
    write_standard_profile(&standardised.profile, &args.output, format)?;
    tracing::info!(
        sample = %standardised.name,
        taxa = standardised.profile.height(),
        output = %args.output.display(),
        "Wrote standard profile"
    );

    Ok(StandardiseReport {
        sample: standardised.name,
        taxa: standardised.profile.height(),
        output: args.output.clone(),
    })
}

/// Print the roster of supported profilers.
pub fn run_profilers() {
    let mut table = Table::new();
    table.set_header(vec!["Profiler", "Description"]);
    apply_table_style(&mut table);
    for profiler in SupportedProfiler::ALL {
        table.add_row(vec![profiler.name(), profiler.description()]);
    }
    println!("{table}");
}

fn load_taxonomy(directory: Option<&Path>) -> Result<Option<Taxonomy>> {
    match directory {
        Some(directory) => Ok(Some(Taxonomy::from_taxdump(directory)?)),
        None => Ok(None),
    }
}

/// Assemble the per-sample pipeline, summarising at a rank when both a
/// taxonomy and a rank were given. The argument parser guarantees the
/// rank never arrives without the taxonomy.
fn build_etl<'a>(
    profiler: SupportedProfiler,
    taxonomy: Option<&'a Taxonomy>,
    summarise_at: Option<&str>,
) -> SampleEtl<'a> {
    let etl = SampleEtl::new(profiler);
    match (taxonomy, summarise_at) {
        (Some(taxonomy), Some(rank)) => etl.with_summary(RankSummary {
            taxonomy,
            rank: rank.to_string(),
            unmapped: UnmappedRank::default(),
        }),
        _ => etl,
    }
}

/// Apply the requested annotation columns, each inserted right after
/// `taxonomy_id`, so the finished table reads name, rank, lineage,
/// id_lineage, rank_lineage.
fn annotate(table: DataFrame, taxonomy: Option<&Taxonomy>, args: &MergeArgs) -> Result<DataFrame> {
    let Some(service) = taxonomy else {
        return Ok(table);
    };
    let mut table = table;
    if args.add_rank_lineage {
        table = service.add_rank_lineage(&table)?;
    }
    if args.add_id_lineage {
        table = service.add_identifier_lineage(&table)?;
    }
    if args.add_lineage {
        table = service.add_name_lineage(&table)?;
    }
    if args.add_rank {
        table = service.add_rank(&table)?;
    }
    if args.add_name {
        table = service.add_name(&table)?;
    }
    Ok(table)
}
