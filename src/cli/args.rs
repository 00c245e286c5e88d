use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tinyca-dashboard",
    version,
    about = "certificate list dashboard for TinyCA / step-ca",
    long_about = "Lists the certificates issued by a TinyCA certificate authority as a paginated, searchable table sorted by expiry.\nWhen the admin API can't be reached a sample certificate set is shown instead.\n\nExamples:\n  tinyca-dashboard -u https://ca.lan:9000\n  tinyca-dashboard -u https://ca.lan:9000 -k -q grafana --sort asc\n  tinyca-dashboard -u https://ca.lan:9000 -o certificates.html\n  tinyca-dashboard -u https://ca.lan:9000 -I\n\nTip: Use --config to persist the CA URL and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered page to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'O',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text, json or html (default: inferred from --output, else text)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'u',
        long = "u",
        visible_alias = "url",
        value_name = "URL",
        help_heading = "CA",
        help = "Base URL of the CA (default: https://localhost:9000)."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'k',
        long = "ins",
        visible_alias = "insecure",
        help_heading = "CA",
        help = "Accept CA certificates that are not in the system trust store."
    )]
    pub insecure: bool,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'q',
        long = "q",
        visible_alias = "search",
        value_name = "TEXT",
        help_heading = "View",
        help = "Only show certificates whose name or serial contains TEXT."
    )]
    pub search: Option<String>,

    #[arg(
        short = 's',
        long = "srt",
        visible_alias = "sort",
        value_name = "ORDER",
        help_heading = "View",
        help = "Sort by expiry: asc or desc (default: desc)."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'P',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "View",
        help = "Page to show (5 certificates per page)."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 'I',
        long = "it",
        visible_alias = "interactive",
        help_heading = "View",
        help = "Read search/sort/page commands from stdin."
    )]
    pub interactive: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.tinyca/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Config",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,
}
