use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "waveforge", about = "Offline mastering and loudness analysis for stereo audio")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Measure loudness, peaks and spectrum of an audio file
    Analyze {
        /// Input audio file (WAV or MP3)
        input: PathBuf,

        /// Print metrics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Master an audio file and export IEEE-float WAV
    Master {
        /// Input audio file (WAV or MP3)
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long, default_value = "mastered.wav")]
        output: PathBuf,

        /// Preset name (see `waveforge presets`)
        #[arg(short, long, default_value = "Auto")]
        preset: String,

        /// Auto-preset strength (0.5-2.0)
        #[arg(long, default_value_t = 1.0)]
        strength: f64,

        /// Override the loudness target (LUFS)
        #[arg(long)]
        target_lufs: Option<f64>,

        /// Load chain settings from a JSON file instead of preset defaults
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Write the resolved chain settings to a JSON file
        #[arg(long)]
        save_settings: Option<PathBuf>,
    },

    /// List built-in presets
    Presets,
}
