// Entry point and interactive console flow.
//
// - Option [1] loads the sales CSV and prints diagnostics.
// - Option [2] picks which segment marketplaces to include.
// - Option [3] generates the rankings, the pivot and a JSON summary.
// - After generating reports, the user can go back to the menu or exit.
use segment_sales_report::config::ReportConfig;
use segment_sales_report::filter::{self, Segment};
use segment_sales_report::reports::{self, Report};
use segment_sales_report::util::{format_int, format_number, truncate_label};
use segment_sales_report::{output, SourceCache};
use std::io::{self, Write};

/// State owned by the console session: the source cache and the current
/// marketplace selection.
struct App {
    config: ReportConfig,
    cache: SourceCache,
    selection: Vec<String>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after generating reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

impl App {
    /// The loaded table filtered to the segment, or `None` if nothing is
    /// loaded yet.
    fn segment(&self) -> Option<Segment> {
        let source = self.cache.current()?;
        Some(filter::filter(&source.records, &self.config.allow_list))
    }

    /// Handle option [1]: (re)load the CSV through the cache.
    fn handle_load(&mut self) {
        let path = self.config.source_path.clone();
        match self.cache.get_or_load(&path) {
            Ok(source) => {
                println!(
                    "Processing dataset... ({} rows loaded, {} marketplaces)",
                    format_int(source.report.total_rows),
                    format_int(source.report.marketplaces)
                );
                if source.report.duplicate_pairs > 0 {
                    println!(
                        "Note: {} rows repeat a marketplace/variant pair and were summed.",
                        format_int(source.report.duplicate_pairs)
                    );
                }
                if let Some(ts) = source.modified_at {
                    println!("Source last modified: {}", ts.format("%Y-%m-%d %H:%M UTC"));
                }
                println!();
            }
            Err(e) => {
                eprintln!("Failed to load file: {}\n", e);
            }
        }
    }

    /// Handle option [2]: choose a subset of the segment marketplaces.
    fn handle_select(&mut self) {
        let Some(segment) = self.segment() else {
            println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
            return;
        };
        println!("Available marketplaces:");
        for m in &segment.effective_marketplaces {
            let mark = if self.selection.is_empty() || self.selection.contains(m) {
                "x"
            } else {
                " "
            };
            println!("  [{}] {}", mark, m);
        }
        println!("Enter a comma-separated list, or leave blank for all.");
        let picked = segment_sales_report::config::parse_marketplace_list(&read_choice());
        let (known, unknown): (Vec<String>, Vec<String>) = picked
            .into_iter()
            .partition(|m| segment.effective_marketplaces.contains(m));
        for m in &unknown {
            println!("Ignoring unknown marketplace: {}", m);
        }
        self.selection = known;
        if self.selection.is_empty() {
            println!("Selection: all marketplaces\n");
        } else {
            println!("Selection: {}\n", self.selection.join(", "));
        }
    }

    /// Handle option [3]: generate all reports and the JSON summary.
    ///
    /// Writes four CSV files and a JSON summary, and prints Markdown previews
    /// of each report to the console.
    fn handle_generate_reports(&self) {
        let Some(segment) = self.segment() else {
            println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
            return;
        };
        let report = match reports::compose_report(
            &segment.select(&self.selection),
            self.config.top_products,
        ) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Report generation failed: {}\n", e);
                return;
            }
        };
        if let Err(e) = std::fs::create_dir_all(&self.config.output_dir) {
            eprintln!("Write error: {}", e);
        }

        println!("Generating reports...");
        println!("Outputs saved to individual files...\n");
        print_metrics(&report);

        let out = |name: &str| self.config.output_dir.join(name);

        let r1 = reports::product_rows(&report);
        let file1 = out("report1_top_products.csv");
        if let Err(e) = output::write_csv(&file1, &r1) {
            eprintln!("Write error: {}", e);
        }
        println!("Report 1: Top Selling Products");
        println!("(Top {} by Quantity)\n", self.config.top_products);
        output::preview_table_rows(&r1, 5);
        println!("(Full table exported to {})\n", file1.display());

        let r2 = reports::marketplace_rows(&report);
        let file2 = out("report2_marketplace_performance.csv");
        if let Err(e) = output::write_csv(&file2, &r2) {
            eprintln!("Write error: {}", e);
        }
        println!("Report 2: Marketplace Performance\n");
        output::preview_table_rows(&r2, 5);
        println!("(Full table exported to {})\n", file2.display());

        let r3 = reports::category_rows(&report);
        let file3 = out("report3_category_performance.csv");
        if let Err(e) = output::write_csv(&file3, &r3) {
            eprintln!("Write error: {}", e);
        }
        println!("Report 3: Category Performance\n");
        output::preview_table_rows(&r3, 5);
        println!("(Full table exported to {})\n", file3.display());

        let file4 = out("report4_marketplace_category_pivot.csv");
        if let Err(e) = output::write_pivot_csv(&file4, &report.pivot) {
            eprintln!("Write error: {}", e);
        }
        println!("Report 4: Marketplace and Category Breakdown\n");
        output::preview_pivot(&report.pivot, 5);
        println!("(Full table exported to {})\n", file4.display());

        let summary = out("summary.json");
        if let Err(e) = output::write_json(&summary, &report) {
            eprintln!("Write error: {}", e);
        }
        print_summary(&report);
        println!("(Summary exported to {})\n", summary.display());
    }
}

fn print_metrics(report: &Report) {
    println!("Total units sold:    {}", format_int(report.total_units));
    println!("Active marketplaces: {}", format_int(report.marketplace_count));
    println!("Product variants:    {}", format_int(report.product_count));
    println!("Categories:          {}\n", format_int(report.category_count));
}

fn print_summary(report: &Report) {
    let h = &report.highlights;
    if let Some(m) = &h.top_marketplace {
        println!("Largest marketplace: {} ({} units)", m.name, format_int(m.quantity));
    }
    if let Some(p) = &h.top_product {
        println!(
            "Best-selling product: {} ({} units)",
            truncate_label(&p.name, 40),
            format_int(p.quantity)
        );
    }
    if let Some(c) = &h.top_category {
        println!("Leading category: {} ({} units)", c.name, format_int(c.quantity));
    }
    let n = &report.narrative;
    println!(
        "Top 3 marketplaces account for {}% of units",
        format_number(n.top3_marketplace_share, 1)
    );
    println!(
        "Top 20 products account for {}% of units",
        format_number(n.top20_product_share, 1)
    );
    println!(
        "Top 5 categories account for {}% of units",
        format_number(n.top5_category_share, 1)
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = ReportConfig::from_env();
    let mut app = App {
        selection: config.selection.clone(),
        config,
        cache: SourceCache::new(),
    };

    loop {
        println!("America Marketplace Sales Report:");
        println!("[1] Load the file");
        println!("[2] Select marketplaces");
        println!("[3] Generate Reports\n");
        match read_choice().as_str() {
            "1" => app.handle_load(),
            "2" => app.handle_select(),
            "3" => {
                println!();
                app.handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2 or 3.\n");
            }
        }
    }
}
