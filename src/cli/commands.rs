use crate::context::{Versioning, DEFAULT_ORIGIN};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bundler-output to library-manifest translation for Drupal modules
#[derive(Parser, Debug)]
#[command(
    name = "libwright",
    about = "Bundler-output to library-manifest translation for Drupal modules",
    version,
    long_about = "libwright observes the output of a bundling pipeline and writes the \
                  module's libraries.yml manifest: assets grouped into named library \
                  units, stylesheets ordered by cascade group, and runtime dependencies \
                  inferred from the emitted code."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Translate an emitted bundle into the library manifest",
        long_about = "Consumes the bundle records emitted by a production build and \
                      rewrites the module's libraries.yml manifest.\n\n\
                      Examples:\n  \
                      libwright build --bundle dist/records.json\n  \
                      libwright build --bundle dist/records.json --versioning hash\n  \
                      libwright build --bundle records.json --project-dir web/modules/custom/demo"
    )]
    Build(BuildArgs),

    #[command(
        about = "Regenerate the library manifest for a dev-server cycle",
        long_about = "Scans the configured input files and rewrites the module's \
                      libraries.yml manifest with dev-server asset references, adding \
                      the dev client unit.\n\n\
                      Examples:\n  \
                      libwright dev js/app.js css/app.theme.css\n  \
                      libwright dev js/app.js --origin http://localhost:3000\n  \
                      libwright dev js/app.js --html index.html"
    )]
    Dev(DevArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Bundle records (JSON) emitted by the bundling pipeline"
    )]
    pub bundle: PathBuf,

    #[arg(
        long,
        value_name = "DIR",
        help = "Module directory holding the *.info.yml (defaults to current directory)"
    )]
    pub project_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        default_value = "dist",
        help = "Bundler output directory used for asset references"
    )]
    pub out_dir: String,

    #[arg(
        long,
        value_enum,
        default_value = "module",
        help = "Versioning policy for generated units"
    )]
    pub versioning: Versioning,
}

#[derive(Parser, Debug, Clone)]
pub struct DevArgs {
    #[arg(value_name = "INPUTS", help = "Input files considered for this cycle")]
    pub inputs: Vec<String>,

    #[arg(
        long,
        value_name = "URL",
        default_value = DEFAULT_ORIGIN,
        help = "Dev-server origin used for asset references"
    )]
    pub origin: String,

    #[arg(
        long,
        value_name = "DIR",
        help = "Module directory holding the *.info.yml (defaults to current directory)"
    )]
    pub project_dir: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        default_value = "module",
        help = "Versioning policy for generated units"
    )]
    pub versioning: Versioning,

    #[arg(
        long,
        value_name = "FILE",
        help = "HTML page to receive supplementary header markup"
    )]
    pub html: Option<PathBuf>,
}
