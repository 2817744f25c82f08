// Keysvg CLI
// Renders logic-analyzer key captures into keyboard.svg

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use keysvg_core::pipeline::summarize;
use keysvg_core::{
    default_sources, down_code_table, pairing_summary, Layout, Pipeline, PipelineConfig,
    CAPTURE_NOTE, DEFAULT_OUTPUT, DEFAULT_ROWS,
};

/// Keyboard capture diagram generator
#[derive(Parser, Debug)]
#[command(name = "keysvg")]
#[command(author = "keysvg contributors")]
#[command(version)]
#[command(about = "Pair captured key codes and draw them on a keyboard diagram", long_about = None)]
struct Args {
    /// Directory holding the <row>.row.txt captures
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Number of row captures to read (1.row.txt ..= N.row.txt).
    /// The layout must define exactly these rows; anything other than 6
    /// needs a matching --layout
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_ROWS)]
    rows: u8,

    /// Layout TOML file (offsets, geometry, text style)
    #[arg(short, long, value_name = "LAYOUT")]
    layout: Option<PathBuf>,

    /// SVG output path
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate the layout and exit
    #[arg(long)]
    check_layout: bool,
}

/// Precedence: --layout > ~/.config/keysvg/layout.toml > built-in
fn resolve_layout(args: &Args) -> Result<Layout> {
    match args.layout {
        Some(ref path) => Layout::from_toml_path(path)
            .with_context(|| format!("failed to load layout {}", path.display())),
        None => Layout::load_default().context("failed to load default layout"),
    }
}

/// Slot counts per row, as printed by --check-layout
fn layout_report(layout: &Layout) -> String {
    let mut out = String::from("Layout is valid\n");
    for (row, offsets) in layout.offsets.rows() {
        let _ = writeln!(out, "  row {}: {} slots", row, offsets.len());
    }
    let _ = writeln!(out, "  total: {} slots", layout.offsets.slot_count());
    out
}

struct Application {
    args: Args,
    layout: Layout,
}

impl Application {
    fn new(args: Args) -> Result<Self> {
        let layout = resolve_layout(&args)?;
        Ok(Self { args, layout })
    }

    fn check_layout(&self) -> Result<()> {
        print!("{}", layout_report(&self.layout));
        Ok(())
    }

    fn run(self) -> Result<()> {
        let config = PipelineConfig::new(default_sources(&self.args.dir, self.args.rows), self.layout)
            .with_output(&self.args.output);
        let pipeline = Pipeline::new(config);

        let captures = pipeline.capture().context("failed to read row captures")?;

        print!("{}", down_code_table(&captures));
        if let Some(summary) = pairing_summary(&captures) {
            print!("{}", summary);
        }
        println!("{}", CAPTURE_NOTE);

        let svg = pipeline.render(&captures).context("failed to render keyboard diagram")?;
        pipeline.write(&svg)?;

        log::info!("{}", summarize(&captures, &svg, &self.args.output));
        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let app = Application::new(args)?;

    if app.args.check_layout {
        return app.check_layout();
    }

    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults_match_fixed_session() {
        let args = Args::parse_from(["keysvg"]);

        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.rows, 6);
        assert_eq!(args.layout, None);
        assert_eq!(args.output, PathBuf::from("keyboard.svg"));
        assert!(!args.verbose);
        assert!(!args.check_layout);
    }

    #[test]
    fn test_args_with_options() {
        let args = Args::parse_from([
            "keysvg",
            "--dir",
            "/tmp/captures",
            "--rows",
            "4",
            "--layout",
            "/tmp/layout.toml",
            "-o",
            "/tmp/out.svg",
            "--verbose",
        ]);

        assert_eq!(args.dir, PathBuf::from("/tmp/captures"));
        assert_eq!(args.rows, 4);
        assert_eq!(args.layout, Some(PathBuf::from("/tmp/layout.toml")));
        assert_eq!(args.output, PathBuf::from("/tmp/out.svg"));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_check_layout() {
        let args = Args::parse_from(["keysvg", "--check-layout"]);
        assert!(args.check_layout);
    }

    #[test]
    fn test_resolve_layout_prefers_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.toml");
        std::fs::write(&path, "[[row]]\nnumber = 1\noffsets = [0, 0]\n").unwrap();

        let args = Args::parse_from(["keysvg", "--layout", path.to_str().unwrap()]);
        let layout = resolve_layout(&args).unwrap();
        assert_eq!(layout.offsets.slot_count(), 2);
    }

    #[test]
    fn test_rows_help_mentions_layout() {
        use clap::CommandFactory;

        let command = Args::command();
        let rows = command
            .get_arguments()
            .find(|arg| arg.get_id() == "rows")
            .unwrap();
        assert!(rows.get_help().unwrap().to_string().contains("--layout"));
    }

    #[test]
    fn test_layout_report_lists_builtin_slots() {
        let report = layout_report(&Layout::default());
        assert_eq!(
            report,
            "Layout is valid\n  row 1: 21 slots\n  row 2: 23 slots\n  row 3: 23 slots\n  \
             row 4: 18 slots\n  row 5: 20 slots\n  row 6: 14 slots\n  total: 119 slots\n"
        );
    }

    #[test]
    fn test_check_layout_uses_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.toml");
        std::fs::write(&path, "[[row]]\nnumber = 2\noffsets = [0, 1, 0]\n").unwrap();

        let app = Application::new(Args::parse_from([
            "keysvg",
            "--check-layout",
            "--layout",
            path.to_str().unwrap(),
        ]))
        .unwrap();
        assert_eq!(
            layout_report(&app.layout),
            "Layout is valid\n  row 2: 3 slots\n  total: 3 slots\n"
        );
        assert!(app.check_layout().is_ok());
    }

    #[test]
    fn test_resolve_layout_falls_back_to_builtin() {
        let args = Args::parse_from(["keysvg"]);
        let layout = resolve_layout(&args).unwrap();

        let user_layout = Layout::default_path().filter(|p| p.exists());
        match user_layout {
            Some(path) => assert_eq!(layout, Layout::from_toml_path(path).unwrap()),
            None => assert_eq!(layout, Layout::default()),
        }
    }

    #[test]
    fn test_resolve_layout_reports_bad_file() {
        let args = Args::parse_from(["keysvg", "--layout", "/nonexistent/layout.toml"]);
        let err = resolve_layout(&args).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/layout.toml"));
    }
}
