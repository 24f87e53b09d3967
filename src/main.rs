//! WaveForge - offline mastering for stereo audio
//!
//! Command-line entry point: decode, analyze, run the mastering chain,
//! export. The DSP itself lives in the wf-* crates.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use cli::{Cli, Command};
use wf_master::{
    AnalysisMetrics, AudioAnalyzer, AutoPresetEngine, GenrePreset, MasteringChain,
    MasteringSettings, STRENGTH_MAX, STRENGTH_MIN,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze { input, json } => analyze(&input, json),
        Command::Master {
            input,
            output,
            preset,
            strength,
            target_lufs,
            settings,
            save_settings,
        } => master(
            &input,
            &output,
            &preset,
            strength,
            target_lufs,
            settings.as_deref(),
            save_settings.as_deref(),
        ),
        Command::Presets => {
            println!("Available presets:");
            for preset in GenrePreset::all() {
                println!("  {:<10} {}", preset.name(), preset.description());
            }
            Ok(())
        }
    }
}

fn analyze(input: &Path, json: bool) -> Result<()> {
    let buffer = wf_file::decode_audio(input)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    log::info!(
        "Loaded {}: {:.1}s at {} Hz",
        input.display(),
        buffer.duration(),
        buffer.sample_rate().as_u32()
    );

    let metrics = AudioAnalyzer::new().analyze(&buffer);

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print_metrics(&metrics);
    }
    Ok(())
}

fn print_metrics(metrics: &AnalysisMetrics) {
    println!("Integrated loudness: {:>7.1} LUFS", metrics.integrated_lufs);
    println!("True peak:           {:>7.1} dBTP", metrics.true_peak_dbtp);
    println!("RMS:                 {:>7.1} dBFS", metrics.rms_dbfs);
    println!("Crest factor:        {:>7.1} dB", metrics.crest_factor_db);
}

fn master(
    input: &Path,
    output: &Path,
    preset_name: &str,
    strength: f64,
    target_lufs: Option<f64>,
    settings_path: Option<&Path>,
    save_settings_path: Option<&Path>,
) -> Result<()> {
    if !(STRENGTH_MIN..=STRENGTH_MAX).contains(&strength) {
        bail!("Strength must be between {STRENGTH_MIN} and {STRENGTH_MAX}");
    }

    let buffer = wf_file::decode_audio(input)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    log::info!(
        "Loaded {}: {:.1}s at {} Hz",
        input.display(),
        buffer.duration(),
        buffer.sample_rate().as_u32()
    );

    log::info!("Analyzing...");
    let metrics = AudioAnalyzer::new().analyze(&buffer);
    print_metrics(&metrics);

    // Resolve settings: explicit file wins over preset defaults
    let mut settings = match settings_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<MasteringSettings>(&json)
                .with_context(|| format!("Invalid settings in {}", path.display()))?
        }
        None => MasteringSettings::default(),
    };

    let preset = GenrePreset::from_name(preset_name)
        .with_context(|| format!("Unknown preset '{preset_name}' (see `waveforge presets`)"))?;
    if preset.is_auto() {
        let snapshot = AutoPresetEngine::derive(&metrics, strength);
        snapshot.apply_to(&mut settings);
        log::info!("Auto preset derived (strength {strength:.2})");
    } else {
        preset.apply(&mut settings);
        log::info!("Applied preset: {}", preset.name());
    }

    if let Some(target) = target_lufs {
        settings.loudness.target_lufs = target;
    }

    if let Some(path) = save_settings_path {
        std::fs::write(path, serde_json::to_string_pretty(&settings)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
    }

    // Progress bar fed by the chain's observer callback
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let chain = MasteringChain::new(settings);
    let outcome = chain.process_with_progress(&buffer, |percent, message| {
        bar.set_position(percent as u64);
        bar.set_message(message.to_string());
    });
    bar.finish_with_message("Done");

    for line in &outcome.summary {
        log::info!("{line}");
    }

    let result = AudioAnalyzer::new().analyze(&outcome.audio);
    println!("-- Mastered --");
    print_metrics(&result);

    wf_file::write_wav(output, &outcome.audio)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Output written to {}", output.display());
    Ok(())
}
