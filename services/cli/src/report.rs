use registry_filter::pipeline::{ClassificationCodes, RunSummary, StageReport};

pub(crate) fn render_summary(summary: &RunSummary) {
    println!("Registry filter run");
    println!(
        "Batch size {}, {} classification codes",
        summary.batch_size, summary.classification_codes
    );

    println!("\nPart 1: establishments");
    render_stage(&summary.establishments);
    println!("- Unique base CNPJs: {}", summary.qualifying_keys);

    println!("\nPart 2: companies");
    render_stage(&summary.companies);

    let elapsed = summary.finished_at - summary.started_at;
    println!(
        "\nFinished in {}.{:03}s",
        elapsed.num_seconds(),
        elapsed.num_milliseconds() % 1000
    );
}

fn render_stage(report: &StageReport) {
    println!(
        "- Files read: {}, rows scanned: {}",
        report.files_read, report.rows_scanned
    );
    println!(
        "- Records: {} ({} matched before deduplication)",
        report.records_written, report.rows_matched
    );
    println!("- File: {}", report.output_path.display());
}

pub(crate) fn render_codes(codes: &ClassificationCodes) {
    for code in codes.iter() {
        println!("{code}");
    }
    eprintln!("{} codes", codes.len());
}
