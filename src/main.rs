use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_summarizer::cli::{Cli, Commands};
use video_summarizer::config::Config;
use video_summarizer::output;
use video_summarizer::summarize::{SummaryPipeline, VideoCaptions};
use video_summarizer::SummarizeError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("video_summarizer={level},vidsum={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().await?;

    match cli.command {
        Commands::Summarize {
            url,
            language,
            output,
            format,
            show_transcript,
        } => {
            let default_language = config.app.default_language.clone();
            let pipeline = SummaryPipeline::new(config)?;

            tracing::info!("Starting summarization for: {}", url);

            let video = match pipeline.inspect(&url).await {
                Ok(video) => video,
                Err(err) => fail(&err),
            };

            let selection =
                match choose_language(language, default_language.as_deref(), &video) {
                    Some(selection) => selection,
                    None => {
                        print_language_menu(&video);
                        println!();
                        println!(
                            "Several caption languages are available. Re-run with \
                             --language <NAME_OR_CODE> to pick one."
                        );
                        std::process::exit(1);
                    }
                };

            let result = match pipeline.summarize(&video, &selection).await {
                Ok(result) => result,
                Err(err) => fail(&err),
            };

            match output {
                Some(path) => {
                    let target =
                        output::save_to_file(&result, &path, &format, show_transcript).await?;
                    println!("Summary saved to: {}", target.display());
                }
                None => {
                    output::print_to_console(&result, &format, show_transcript)?;
                }
            }
        }
        Commands::Languages { url } => {
            let pipeline = SummaryPipeline::new(config)?;

            match pipeline.inspect(&url).await {
                Ok(video) => print_language_menu(&video),
                Err(err) => fail(&err),
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                println!("Edit the config file to change settings:");
                println!("  {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

/// Pick the caption language: an explicit choice wins, then a resolvable
/// configured default, then a lone available track
fn choose_language(
    explicit: Option<String>,
    default: Option<&str>,
    video: &VideoCaptions,
) -> Option<String> {
    if let Some(choice) = explicit {
        return Some(choice);
    }

    if let Some(default) = default {
        if video.menu.resolve(default).is_some() {
            return Some(default.to_string());
        }
    }

    if video.menu.len() == 1 {
        return video.menu.names().first().cloned();
    }

    None
}

fn print_language_menu(video: &VideoCaptions) {
    match &video.listing.title {
        Some(title) => println!("Caption languages for \"{}\":", title),
        None => println!("Caption languages for video {}:", video.id),
    }
    for name in video.menu.names() {
        let code = video.menu.code_for(name).unwrap_or("?");
        println!("  • {} ({})", name, code);
    }
}

/// Render a request-level failure inline, where the summary would have
/// appeared, and stop this invocation
fn fail(err: &SummarizeError) -> ! {
    println!("{}", style(format!("✗ {}", err)).red());
    std::process::exit(1);
}
