//! Console and JSON rendering of a collection

use std::io::{self, Write};

use processor::buckets::BucketDistribution;
use processor::collect::SkippedPr;
use processor::{BenchmarkReport, Collection, PickupTime, PrMetrics};
use serde::Serialize;

/// `under_0.5_hours` -> `Under 0.5 Hours`
fn display_label(label: &str) -> String {
    label
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_pull_request<W: Write>(out: &mut W, pr: &PrMetrics) -> io::Result<()> {
    writeln!(out, "PR #{} - State {} - {}", pr.number, pr.state, pr.title)?;
    writeln!(out, "- Coding Time: {:.2} minutes", pr.coding_time_minutes)?;
    match pr.pickup_time {
        PickupTime::FirstComment(minutes) | PickupTime::Closed(minutes) => {
            writeln!(out, "- Pickup Time: {:.2} minutes", minutes)?
        }
        PickupTime::Unknown => writeln!(out, "- Pickup Time: n/a (no review yet)")?,
    }
    writeln!(out, "- PR Size: {} lines\n", pr.size)
}

fn write_distribution<W: Write>(out: &mut W, dist: &BucketDistribution) -> io::Result<()> {
    writeln!(out, "\n{} benchmark:", dist.metric)?;
    if !dist.has_data() {
        return writeln!(out, "- No pull requests to benchmark");
    }
    for bucket in &dist.buckets {
        if let Some(percentage) = bucket.percentage {
            writeln!(out, "- {}: {:.2}%", display_label(bucket.label), percentage)?;
        }
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, report: &BenchmarkReport) -> io::Result<()> {
    for dist in report.distributions() {
        write_distribution(out, dist)?;
    }
    writeln!(out, "\nRevert PRs: {}", report.revert_pull_requests)?;
    writeln!(out, "\nHotfix PRs: {}", report.hotfix_pull_requests)?;
    writeln!(
        out,
        "\nMerge Frequency: {:.2} PRs per day",
        report.merge_frequency
    )
}

/// Plain-text report: per-PR lines (unless `summary_only`), then benchmarks
pub fn write_text<W: Write>(
    out: &mut W,
    collection: &Collection,
    summary_only: bool,
) -> io::Result<()> {
    if !summary_only {
        for pr in &collection.pull_requests {
            write_pull_request(out, pr)?;
        }
    }

    write_summary(out, &collection.report)?;

    if !collection.skipped.is_empty() {
        writeln!(out, "\nSkipped PRs: {}", collection.skipped.len())?;
        for skipped in &collection.skipped {
            writeln!(out, "- #{}: {}", skipped.number, skipped.reason)?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a BenchmarkReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pull_requests: Option<&'a [PrMetrics]>,
    skipped: &'a [SkippedPr],
}

pub fn write_json<W: Write>(
    out: &mut W,
    collection: &Collection,
    summary_only: bool,
) -> io::Result<()> {
    let output = JsonOutput {
        report: &collection.report,
        pull_requests: (!summary_only).then_some(collection.pull_requests.as_slice()),
        skipped: &collection.skipped,
    };
    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)
}
