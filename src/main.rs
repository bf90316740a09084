use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use whosaid::{
    format_transcript_with_speakers, parse_recognition_file, read_transcript_file, realign,
    refined_fragments, refined_transcript, segment_transcript, speaker_summary, write_json,
    AnthropicClient, AnthropicConfig, SegmenterConfig, SpeakerIdentifier,
};

#[derive(Parser)]
#[command(name = "whosaid")]
#[command(author, version, about = "Speaker identification and light transcript refinement", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify speakers in a plain transcript
    Identify {
        /// Input transcript file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Recognition segments file (JSON list) to realign refined text onto
        #[arg(long)]
        segments: Option<PathBuf>,

        /// Output file for the identification result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for realigned recognition segments (JSON, requires --segments)
        #[arg(long)]
        segments_output: Option<PathBuf>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze how a transcript would be segmented, without calling the model
    Segment {
        /// Input transcript file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Identify {
            input,
            segments,
            output,
            segments_output,
            model,
            verbose,
        } => {
            setup_logging(verbose);
            run_identify(input, segments, output, segments_output, model).await
        }
        Commands::Segment { input, verbose } => {
            setup_logging(verbose);
            analyze_segmentation(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run_identify(
    input: PathBuf,
    segments: Option<PathBuf>,
    output: Option<PathBuf>,
    segments_output: Option<PathBuf>,
    model: Option<String>,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let transcript = read_transcript_file(&input).context("Failed to load input transcript")?;

    let mut api_config = AnthropicConfig::from_env()?;
    if let Some(model) = model {
        api_config.model = model;
    }
    let client = AnthropicClient::new(api_config);
    let identifier = SpeakerIdentifier::new(client);

    let result = identifier.identify_speakers(&transcript).await;

    let summary = speaker_summary(&result);
    info!(
        "Identified {} speaker(s) with {} confidence: {}",
        summary.total_speakers,
        summary.confidence,
        summary.speakers.join(", ")
    );
    if !summary.notes.is_empty() {
        info!("Model notes: {}", summary.notes);
    }

    println!("{}", format_transcript_with_speakers(&result));

    if let Some(path) = output {
        write_json(&result, &path)?;
        info!("Result written to {:?}", path);
    }

    if let Some(segments_path) = segments {
        let raw_segments =
            parse_recognition_file(&segments_path).context("Failed to load recognition segments")?;
        info!(
            "Realigning refined text onto {} recognition segments",
            raw_segments.len()
        );

        let fragments = refined_fragments(&result);
        let realigned = realign(&fragments, raw_segments);

        let target = segments_output.unwrap_or_else(|| {
            let mut path = segments_path.clone();
            path.set_extension("refined.json");
            path
        });
        write_json(&realigned, &target)?;
        info!("Realigned segments written to {:?}", target);
    } else if let Some(refined) = refined_transcript(&result) {
        info!("Refined transcript available ({} chars)", refined.chars().count());
    }

    Ok(())
}

fn analyze_segmentation(input: PathBuf) -> Result<()> {
    info!("Analyzing transcript from {:?}", input);
    let transcript = read_transcript_file(&input).context("Failed to load input transcript")?;

    let config = SegmenterConfig::default();
    let segments = segment_transcript(&transcript, &config);

    println!("Segmentation Analysis");
    println!("=====================");
    println!("Transcript length: {} chars", transcript.chars().count());
    println!("Prompt segments: {}", segments.len());
    println!(
        "Chunks at capacity {}: {}",
        config.max_segments_per_request,
        segments.len().div_ceil(config.max_segments_per_request.max(1))
    );
    println!();

    for segment in &segments {
        let preview: String = segment.prompt_text.chars().take(60).collect();
        let ellipsis = if segment.prompt_text.chars().count() > 60 {
            "..."
        } else {
            ""
        };
        println!(
            "{:>4}. [{:>5}-{:>5}] ({:>3} chars) {}{}",
            segment.segment_id,
            segment.start_index,
            segment.end_index,
            segment.text.chars().count(),
            preview,
            ellipsis
        );
    }

    Ok(())
}
