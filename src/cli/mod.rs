pub mod diff;
pub mod report;

use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Debug, Parser)]
#[command(name = "k8s-diff", version, about)]
pub struct Cli {
    /// Directory to read the left side from
    #[arg(long, env = "K8S_DIFF_DIR_A")]
    pub dir_a: PathBuf,

    /// Directory to read the right side from
    #[arg(long, env = "K8S_DIFF_DIR_B")]
    pub dir_b: PathBuf,

    /// Rule file to load, can be given several times.
    /// Files are merged in the order given.
    #[arg(long = "rules", env = "K8S_DIFF_RULES", value_delimiter = ',')]
    pub rules: Vec<PathBuf>,

    /// Do not fill in server side defaults through a dry run
    #[arg(long, env = "K8S_DIFF_SKIP_DEFAULTS")]
    pub skip_defaults: bool,

    /// kubeconfig context used for the dry run, the current one when omitted
    #[arg(long, env = "K8S_DIFF_KUBE_CONTEXT")]
    pub kube_context: Option<String>,

    /// kubectl binary used for the dry run
    #[arg(long, env = "K8S_DIFF_KUBECTL", default_value = "kubectl")]
    pub kubectl: PathBuf,

    /// Log more, repeat for even more (overridden by RUST_LOG)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
