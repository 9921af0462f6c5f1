use crate::render::OutputFormat;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gittrail")]
#[command(about = "Export a unified audit trail of GitLab and local git activity")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Path to the local git repository (defaults to the current directory)")]
    pub repo: Option<PathBuf>,

    #[arg(long, help = "Base GitLab URL (e.g. https://gitlab.example.com)")]
    pub gitlab_url: Option<String>,

    #[arg(long, help = "GitLab private token (falls back to the GITLAB_TOKEN env var)")]
    pub token: Option<String>,

    #[arg(long, help = "GitLab project id or group/subgroup/project path")]
    pub project: Option<String>,

    #[arg(long, help = "Only include events from the last N calendar months")]
    pub months: Option<u32>,

    #[arg(long, help = "Window start date (YYYY-MM-DD, local calendar day)")]
    pub since: Option<String>,

    #[arg(long, help = "Window end date (YYYY-MM-DD, local calendar day, inclusive)")]
    pub until: Option<String>,

    #[arg(long, value_enum, help = "Output format (inferred from the output extension when omitted)")]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Skip TLS certificate verification")]
    pub insecure: bool,

    #[arg(help = "Output file path (.html or .csv)")]
    pub output: PathBuf,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::collect::exec(self)
    }
}
