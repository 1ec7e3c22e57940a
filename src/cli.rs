use crate::config::load_config;
use crate::filter::{FilterKey, FilterPatch};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_workspace;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::session::DiagramSession;
use crate::summary::summarize;
use crate::view::ViewType;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "c4r", version, about = "C4 architecture diagram renderer")]
pub struct Args {
    /// Input workspace (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, styles)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// View type: landscape, context, container, component, deployment, dynamic
    #[arg(long = "view")]
    pub view: Option<ViewType>,

    /// View key within the selected type
    #[arg(long = "key")]
    pub key: Option<String>,

    /// Comma-separated filters to turn off (e.g. database,asynchronous)
    #[arg(long = "hide", value_delimiter = ',')]
    pub hide: Vec<FilterKey>,

    /// Frame width used for fitting; also the PNG default width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Frame height used for fitting; also the PNG default height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Print the available views and exit
    #[arg(long = "list-views")]
    pub list_views: bool,

    /// Print an architecture summary as JSON and exit
    #[arg(long = "summary")]
    pub summary: bool,

    /// Write the computed layout as JSON to this path
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run(args: &Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let workspace = parse_workspace(&input).context("parsing workspace")?;

    if args.summary {
        let summary = summarize(&workspace);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let theme = config.theme.clone();
    let render_cfg = config.render.clone();
    let mut session = DiagramSession::new(workspace, config);

    if args.list_views {
        print!("{}", format_view_list(&session));
        return Ok(());
    }

    let view_type = args.view.unwrap_or_else(|| session.view_type());
    session.select_view(view_type, args.key.as_deref());
    let patch = args
        .hide
        .iter()
        .fold(FilterPatch::default(), |patch, key| patch.with(*key, false));
    session.set_filters(&patch);

    let scene = session.render();
    info!(
        view = scene.view_key.as_deref().unwrap_or(""),
        elements = scene.nodes.len(),
        relationships = scene.edges.len();
        "Rendered view"
    );

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &scene)
            .with_context(|| format!("writing layout dump {}", path.display()))?;
    }

    let svg = render_svg(&scene, &theme);
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &render_cfg, &theme)?;
        }
    }
    Ok(())
}

fn format_view_list(session: &DiagramSession) -> String {
    let mut out = String::new();
    let workspace = session.workspace();
    for summary in session.available_view_types() {
        out.push_str(&format!(
            "{} ({}): {}\n",
            summary.label,
            summary.view_type.token(),
            summary.count
        ));
        for (key, name) in crate::view::views_in_category(workspace, summary.view_type) {
            if key == name {
                out.push_str(&format!("  {key}\n"));
            } else {
                out.push_str(&format!("  {key} - {name}\n"));
            }
        }
    }
    out
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("reading input {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn parses_hide_list_and_view() {
        let args = Args::try_parse_from([
            "c4r",
            "-i",
            "ws.json",
            "--view",
            "container",
            "--hide",
            "database,async",
        ])
        .unwrap();
        assert_eq!(args.view, Some(ViewType::Container));
        assert_eq!(args.hide, vec![FilterKey::Database, FilterKey::Asynchronous]);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn rejects_unknown_view_type() {
        assert!(Args::try_parse_from(["c4r", "--view", "sequence"]).is_err());
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(&None, "png").is_err());
    }

    #[test]
    fn lists_views_with_descriptions() {
        let workspace = parse_workspace(
            r#"{"views": {"containerViews": [{"key": "c1", "description": "Shop"}, {"key": "c2"}]}}"#,
        )
        .unwrap();
        let session = DiagramSession::new(workspace, Config::default());
        let listing = format_view_list(&session);
        assert_eq!(listing, "Container View (container): 2\n  c1 - Shop\n  c2\n");
    }
}
