use clap::ArgMatches;
use colored::Colorize;
use pagemirror_core::mirror::{MirrorOptions, execute_mirror};
use pagemirror_core::report::{ReportFormat, generate_json_report, generate_text_report, save_report};
use pagemirror_scanner::TransportConfig;
use std::path::PathBuf;
use url::Url;

/// Parse a target argument as a URL, trying to add http:// if needed
pub fn normalize_target(raw: &str) -> Option<String> {
    // Try to parse as-is
    if Url::parse(raw).is_ok() {
        return Some(raw.to_string());
    }

    // Try adding http://
    let with_scheme = format!("http://{}", raw);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    None
}

pub async fn handle_mirror(matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let raw_target = matches.get_one::<String>("URL").unwrap();
    let output = matches.get_one::<String>("output").unwrap();
    let threads = *matches.get_one::<usize>("threads").unwrap_or(&8);
    let timeout = *matches.get_one::<u64>("timeout").unwrap_or(&30);
    let use_tor = matches.get_flag("tor");
    let quiet = matches.get_flag("quiet");
    let report_path = matches.get_one::<PathBuf>("report");
    let format = matches
        .get_one::<String>("format")
        .and_then(|s| ReportFormat::from_str(s))
        .unwrap_or(ReportFormat::Text);

    let Some(target) = normalize_target(raw_target) else {
        eprintln!("{} Invalid target URL '{}'", "✗".red().bold(), raw_target);
        std::process::exit(1);
    };

    let output_dir = PathBuf::from(shellexpand::tilde(output).as_ref());

    println!("\n🪞  Mirroring {}", target.as_str().bright_white());
    println!("Output: {}", output_dir.display());
    println!("Workers: {}", threads);
    println!("Timeout: {}s", timeout);
    if use_tor {
        println!("Transport: {}", "tor (socks5h://127.0.0.1:9050)".bright_cyan());
    }
    println!();

    let options = MirrorOptions {
        target,
        output_dir,
        threads,
        transport: TransportConfig::with_timeout(timeout).with_tor(use_tor),
        show_progress_bars: !quiet,
    };

    let summary = match execute_mirror(options).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{} Mirror failed: {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    println!("\n{} Mirror complete!\n", "✓".green().bold());

    let content = match format {
        ReportFormat::Text => generate_text_report(&summary),
        ReportFormat::Json => match generate_json_report(&summary) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("{} Failed to render JSON report: {}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        },
    };

    print!("{}", content);

    if let Some(path) = report_path {
        match save_report(&content, path) {
            Ok(()) => println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            ),
            Err(e) => eprintln!(
                "{} Failed to save report to {}: {}",
                "✗".red().bold(),
                path.display(),
                e
            ),
        }
    }
}
