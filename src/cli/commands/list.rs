//! List command - show languages or the samples of a language

use crate::catalog::Sample;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::{MirrorError, MirrorResult};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> MirrorResult<()> {
    let mut options = config.mirror_options();
    options.bulk = false;
    let mirror = super::open_mirror(options, config).await?;

    let Some(language) = args.language else {
        for language in mirror.languages() {
            println!("{}", language);
        }
        return Ok(());
    };

    let samples = mirror.samples_for(&language).ok_or_else(|| {
        MirrorError::User(format!(
            "Invalid language '{}', available languages: {}",
            language,
            mirror.languages().join(", ")
        ))
    })?;

    if !mirror.is_online() {
        eprintln!(
            "{} Catalog unreachable, showing the cached index",
            style("!").yellow()
        );
    }

    match args.format {
        OutputFormat::Table => print_table(samples),
        OutputFormat::Json => print_json(samples)?,
        OutputFormat::Plain => print_plain(samples),
    }

    Ok(())
}

fn print_table(samples: &[Sample]) {
    if samples.is_empty() {
        println!("No samples available.");
        return;
    }

    for sample in samples {
        println!("{}:", style(&sample.fields.name).bold());
        println!("\t{}", sample.fields.description);
        println!("\t{}", style(&sample.path).dim());
    }

    println!();
    println!("{} sample(s)", samples.len());
}

fn print_json(samples: &[Sample]) -> MirrorResult<()> {
    let json = serde_json::to_string_pretty(samples)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(samples: &[Sample]) {
    for sample in samples {
        println!("{}", sample.path);
    }
}
