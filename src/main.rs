//! rfm-dashboard: terminal dashboard over precomputed RFM customer segments
//!
//! This is the main entrypoint that wires the command line to the dashboard
//! and runs either a single render or the interactive selection loop.

use anyhow::Result;
use clap::Parser;
use rfm_dashboard::{Args, Dashboard};
use std::io::{self, BufRead, Write};
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level())).init();

    let catalog = args.load_catalog()?;
    let mut dashboard = Dashboard::new(args.data_paths(), catalog).with_chart_dir(&args.output_dir);

    if args.list_segments {
        let segments = dashboard.segment_options()?;
        if let Some(error) = segments.error {
            println!("{}", error);
        }
        for option in segments.options {
            println!("{}", option);
        }
        return Ok(());
    }

    if args.interactive {
        run_interactive(&mut dashboard, args.segment)
    } else {
        render_once(&mut dashboard, args.segment.as_deref())
    }
}

/// Render the page a single time
fn render_once(dashboard: &mut Dashboard, selection: Option<&str>) -> Result<()> {
    let start_time = Instant::now();
    let page = dashboard.render(selection)?;
    print!("{}", page);
    log::debug!("Rendered in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

/// Re-render after every line read from stdin
///
/// An empty line keeps the current selection, `:reload` drops cached data
/// and `:quit` exits. An unknown segment is reported and the previous
/// selection is kept; a kept selection that vanished after a reload falls
/// back to the first segment.
fn run_interactive(dashboard: &mut Dashboard, initial: Option<String>) -> Result<()> {
    let page = dashboard.render(initial.as_deref())?;
    print!("{}", page);
    let mut selection = page.selected_segment().map(str::to_string);

    let stdin = io::stdin();
    loop {
        print!("\nSelect a Customer Segment to view its Strategy (:reload, :quit): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let page = match line.trim() {
            ":quit" | ":q" => break,
            ":reload" => {
                dashboard.clear_cache();
                dashboard.render_or_default(selection.as_deref())?
            }
            "" => dashboard.render_or_default(selection.as_deref())?,
            choice => match dashboard.render(Some(choice)) {
                Ok(page) => page,
                Err(e) => {
                    eprintln!("{}", e);
                    continue;
                }
            },
        };

        if let Some(segment) = page.selected_segment() {
            selection = Some(segment.to_string());
        }
        print!("{}", page);
    }

    Ok(())
}
