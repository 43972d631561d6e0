use anyhow::{Context, Result};
use review_sentiment::pipelines::review_analysis_pipeline::*;
use review_sentiment::pipelines::sentiment_analysis_pipeline::{
    ModernBertSize, SentimentAnalysisModel,
};
use tracing_subscriber::EnvFilter;

// cargo run --example analyze_csv -- reviews.csv [lexicon|modernbert|modernbert-large] [column]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: analyze_csv <file.csv> [backend] [column]")?;
    let backend = args.next().unwrap_or_else(|| "lexicon".to_string());
    let column = args.next();

    let bytes = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
    let options = AnalyzeOptions {
        column,
        ..AnalyzeOptions::default()
    };

    match backend.as_str() {
        "lexicon" => analyze(ReviewAnalysisPipelineBuilder::lexicon().build(), &path, &bytes, &options),
        "modernbert" => analyze(
            ReviewAnalysisPipelineBuilder::modernbert(ModernBertSize::Base).build(),
            &path,
            &bytes,
            &options,
        ),
        "modernbert-large" => analyze(
            ReviewAnalysisPipelineBuilder::modernbert(ModernBertSize::Large).build(),
            &path,
            &bytes,
            &options,
        ),
        other => anyhow::bail!("unknown backend `{other}`"),
    }
}

fn analyze<M: SentimentAnalysisModel>(
    pipeline: ReviewAnalysisPipeline<M>,
    path: &str,
    bytes: &[u8],
    options: &AnalyzeOptions,
) -> Result<()> {
    let table =
        review_sentiment::Table::from_csv_bytes_with_encoding(bytes, options.encoding.as_deref())?;
    let output = pipeline.run(&table, options.column.as_deref())?;
    println!("Text column: {}", output.column);

    let summary = &output.summary;
    println!("\n=== SUMMARY ===");
    for label in [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
        SentimentLabel::Unknown,
    ] {
        println!(
            "  {label}: {} ({:.1}%)",
            summary.count(label),
            summary.share(label) * 100.0
        );
    }

    for label in [SentimentLabel::Positive, SentimentLabel::Negative] {
        println!("\n=== EXAMPLE {} REVIEWS ===", label.as_str().to_uppercase());
        for example in output.top_examples(label, 3) {
            let preview: String = example.text.chars().take(80).collect();
            println!("  [{:.2}] {preview}", example.confidence);
        }
    }

    let out_path = match path.strip_suffix(".csv") {
        Some(stem) => format!("{stem}_with_sentiment.csv"),
        None => format!("{path}_with_sentiment.csv"),
    };
    std::fs::write(&out_path, pipeline.exporter().export(&output.augmented)?)?;
    println!(
        "\nProcessed {} rows in {:.2?}; saved to {out_path}",
        output.stats.rows_processed, output.stats.total_time
    );

    Ok(())
}
