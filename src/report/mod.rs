//! Terminal reporting.
//!
//! # Responsibilities
//! - Render one line per completed check
//! - Render the final statistics summary and catalog composition
//!
//! # Design Decisions
//! - The renderer hangs off the orchestrator's report callback; the core
//!   owns no output resource of its own
//! - Colors are plain ANSI escapes, switchable off for pipes and logs

use std::sync::Arc;

use crate::catalog::{Catalog, Server, ServerStatus};
use crate::checker::{Outcome, ReportFn, StatsSnapshot};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Console renderer for check results.
#[derive(Debug, Clone)]
pub struct Reporter {
    use_color: bool,
    only_online: bool,
}

impl Reporter {
    pub fn new(use_color: bool, only_online: bool) -> Self {
        Self {
            use_color,
            only_online,
        }
    }

    fn color(&self, code: &'static str) -> &'static str {
        if self.use_color {
            code
        } else {
            ""
        }
    }

    fn status_color(&self, status: ServerStatus) -> &'static str {
        match status {
            ServerStatus::Online => self.color(GREEN),
            ServerStatus::Timeout => self.color(YELLOW),
            _ => self.color(RED),
        }
    }

    /// One line per completed check.
    pub fn print_result(&self, server: &Server, outcome: &Outcome, position: usize, total: usize) {
        if self.only_online && outcome.status != ServerStatus::Online {
            return;
        }

        let color = self.status_color(outcome.status);
        let reset = self.color(RESET);
        let cyan = self.color(CYAN);

        if outcome.status == ServerStatus::Online {
            println!(
                "[{position:>4}/{total}] {color}{:<8}{reset} {:>8.2} ms  {cyan}{}{reset}",
                outcome.status.as_str(),
                outcome.latency_ms,
                server.url,
            );
        } else {
            println!(
                "[{position:>4}/{total}] {color}{:<8}{reset} {:>11}  {cyan}{}{reset}",
                outcome.status.as_str(),
                "-",
                server.url,
            );
        }
    }

    /// Final statistics summary. The latency block only appears once at
    /// least one server was online.
    pub fn print_summary(&self, snapshot: &StatsSnapshot) {
        let bold = self.color(BOLD);
        let reset = self.color(RESET);
        let total = snapshot.total;

        let percent = |count: usize| {
            if total > 0 {
                count as f64 * 100.0 / total as f64
            } else {
                0.0
            }
        };

        println!();
        println!("{bold}═══════════════════════════════════════════{reset}");
        println!("{bold}           CHECK STATISTICS{reset}");
        println!("{bold}═══════════════════════════════════════════{reset}");
        println!("Total Checked:   {total:>5}");
        println!("───────────────────────────────────────────");
        println!(
            "Online:          {:>5}  ({:.1}%)",
            snapshot.online,
            percent(snapshot.online)
        );
        println!(
            "Offline:         {:>5}  ({:.1}%)",
            snapshot.offline,
            percent(snapshot.offline)
        );
        println!(
            "Timeout:         {:>5}  ({:.1}%)",
            snapshot.timeout,
            percent(snapshot.timeout)
        );
        println!(
            "Error:           {:>5}  ({:.1}%)",
            snapshot.error,
            percent(snapshot.error)
        );

        if snapshot.online > 0 {
            println!("───────────────────────────────────────────");
            println!("Min Latency:     {:.2} ms", snapshot.min_latency_ms);
            println!("Max Latency:     {:.2} ms", snapshot.max_latency_ms);
            println!("Avg Latency:     {:.2} ms", snapshot.average_latency_ms());
        }

        println!("{bold}═══════════════════════════════════════════{reset}");
        println!();
    }

    /// Catalog composition without probing anything.
    pub fn print_catalog(&self, catalog: &Catalog) {
        let bold = self.color(BOLD);
        let reset = self.color(RESET);

        println!();
        println!("{bold}Server catalog{reset}");
        for category in catalog.categories() {
            println!("  {:<8} {:>5} servers", category.name(), category.len());
        }
        println!("  {:<8} {:>5} total", "", catalog.total());
        println!();
    }

    /// Wrap this reporter as the orchestrator's report callback.
    pub fn into_report_fn(self) -> ReportFn {
        let report: ReportFn = Arc::new(move |server, outcome, position, total| {
            self.print_result(server, outcome, position, total);
        });
        report
    }
}
