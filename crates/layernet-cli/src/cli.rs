use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "layernet CLI - Build a multi-layer interaction network from query results, group nodes by link signature and lay it out on a grid.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the network, apply grouping, compute the grid layout and write the scene as JSON.
    Layout(LayoutArgs),
    /// Print per-layer entry, group and link counts of the network.
    Inspect(InspectArgs),
}

/// Where the network comes from. Shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// CSV file of node records with the columns
    /// `layer,dbid,id,symbol,linked_to,linked_layer`. Can be given multiple times.
    #[arg(short, long = "records", value_name = "PATH")]
    pub records: Vec<PathBuf>,

    /// JSON array of query rows, mapped to records through the `[[sources]]`
    /// declarations of the configuration file.
    #[arg(long, value_name = "PATH")]
    pub rows: Option<PathBuf>,

    /// Path to the configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Layer catalog (TOML `[[layers]]` tables), overriding `catalog` from the config file.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Override `links.deduplicate` from the config file.
    #[command(flatten)]
    pub links: LinkPolicyFlags,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S layout.radius-factor=0.25
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive switches for the link policy of the network.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct LinkPolicyFlags {
    /// Treat repeated (target, layer) links of a node as one.
    #[arg(long)]
    pub dedupe_links: bool,
    /// Keep every link exactly as inserted, duplicates included.
    #[arg(long)]
    pub append_links: bool,
}

/// Layout parameters that can be given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutFlags {
    /// Viewport width, overriding `layout.width`.
    #[arg(long, value_name = "FLOAT")]
    pub width: Option<f64>,

    /// Viewport height, overriding `layout.height`.
    #[arg(long, value_name = "FLOAT")]
    pub height: Option<f64>,

    /// Node radius as a fraction of the smaller cell side, in (0, 0.5].
    #[arg(long, value_name = "FLOAT")]
    pub radius_factor: Option<f64>,

    /// Do not group or ungroup layers according to their `grouped` flag.
    #[arg(long)]
    pub no_grouping: bool,

    /// Lay out every entry on the grid, discarding pinned positions.
    #[arg(long)]
    pub ignore_pins: bool,
}

/// Arguments for the `layout` subcommand.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub layout: LayoutFlags,

    /// CSV file of pinned positions with the columns `layer,dbid,x,y`.
    /// A pin on a grouped node pins its group.
    #[arg(long, value_name = "PATH")]
    pub pins: Option<PathBuf>,

    /// Output file for the scene JSON. Written to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Group the named layer before layout. Can be given multiple times.
    #[arg(long = "group", value_name = "LAYER")]
    pub group: Vec<String>,

    /// Keep the named layer ungrouped. Can be given multiple times.
    #[arg(long = "ungroup", value_name = "LAYER")]
    pub ungroup: Vec<String>,

    /// Show the named layer. Can be given multiple times.
    #[arg(long = "show", value_name = "LAYER")]
    pub show: Vec<String>,

    /// Hide the named layer. Can be given multiple times.
    #[arg(long = "hide", value_name = "LAYER")]
    pub hide: Vec<String>,

    /// Pretty-print the scene JSON.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Report the layers as they are loaded, without applying grouping flags.
    #[arg(long)]
    pub no_grouping: bool,

    /// Print the summary as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn layout_arguments_parse() {
        let cli = Cli::try_parse_from([
            "layernet",
            "-vv",
            "layout",
            "--records",
            "a.csv",
            "--records",
            "b.csv",
            "--width",
            "800",
            "--group",
            "Compound",
            "--hide",
            "PPI",
            "-S",
            "layout.height=600",
            "--dedupe-links",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Layout(args) = cli.command else {
            panic!("expected layout command");
        };
        assert_eq!(args.input.records.len(), 2);
        assert_eq!(args.layout.width, Some(800.0));
        assert_eq!(args.group, vec!["Compound"]);
        assert_eq!(args.hide, vec!["PPI"]);
        assert_eq!(args.input.set_values, vec!["layout.height=600"]);
        assert!(args.input.links.dedupe_links);
    }

    #[test]
    fn link_policy_flags_are_exclusive() {
        let result = Cli::try_parse_from([
            "layernet",
            "inspect",
            "--dedupe-links",
            "--append-links",
        ]);
        assert!(result.is_err());
    }
}
