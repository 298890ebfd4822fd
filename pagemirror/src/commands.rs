use crate::CLAP_STYLING;
use clap::arg;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("pagemirror")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pagemirror")
        .styles(CLAP_STYLING)
        .about("Mirrors a single web page and every asset it references into a local directory")
        .arg(
            arg!([URL])
                .required(false)
                .help("The URL of the page to mirror")
                .default_value("https://google.com"),
        )
        .arg(
            arg!(-o --"output" <DIR>)
                .required(false)
                .help("Parent directory the <host>/ workspace is created under")
                .default_value("."),
        )
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("The number of async download workers in the worker pool.")
                .value_parser(clap::value_parser!(usize))
                .default_value("8"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("30"),
        )
        .arg(
            arg!(--"tor")
                .required(false)
                .help("Route all traffic through the local Tor SOCKS proxy (127.0.0.1:9050)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(--"report" <PATH>)
                .required(false)
                .help("Save the report to a file in addition to printing it")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(arg!(-q --"quiet" "Suppress banner and progress bars").required(false))
}
