pub mod download;
pub mod mirror;
pub mod report;
pub mod workspace;

pub use download::{AssetOutcome, AssetStatus, DownloadOptions, DownloadReport, execute_downloads};
pub use mirror::{MirrorOptions, MirrorSummary, execute_mirror};
pub use workspace::MirrorWorkspace;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
                            _
  _ __  __ _ __ _ ___ _ __ (_)_ _ _ _ ___ _ _
 | '_ \/ _` / _` / -_) '  \| | '_| '_/ _ \ '_|
 | .__/\__,_\__, \___|_|_|_|_|_| |_| \___/_|
 |_|        |___/
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "{}",
        format!(
            "  pagemirror v{} - one page, fully offline",
            env!("CARGO_PKG_VERSION")
        )
        .bright_white()
    );
    println!();
}
