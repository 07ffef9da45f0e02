use std::path::Path;

use anyhow::Context;
use image::RgbaImage;

use crate::capture::image::BaseImage;
use crate::capture::stitch::stitch_vertical;
use crate::config::EditorConfig;
use crate::core::cli::{Command, HELP_TEXT, Opts, VERSION};
use crate::core::script;
use crate::export::{ClipboardFileSink, ExportSink, FileSink};
use crate::render::Renderer;
use crate::render::text::FontBook;
use crate::session::editor::Editor;
use crate::session::text_edit::HeadlessOverlay;

pub fn run() -> anyhow::Result<()> {
    let opts = match Opts::parse_from(std::env::args().skip(1))? {
        Command::Help => {
            println!("{HELP_TEXT}");
            return Ok(());
        }
        Command::Version => {
            println!("pagemark {VERSION}");
            return Ok(());
        }
        Command::Run(opts) => opts,
    };

    let mut config = EditorConfig::load();
    if let Some(color) = opts.color {
        config.tools.line_color = color;
        config.tools.shape_color = color;
    }

    let base = match load_base(&opts) {
        Ok(base) => base,
        Err(err) => {
            log::error!("Failed to load base image: {err:#}");
            eprintln!("{}", placeholder_message(&err));
            return Ok(());
        }
    };

    let mut editor = Editor::new(
        base,
        config.tools.clone(),
        Renderer::new(FontBook::system()),
        Box::new(HeadlessOverlay::default()),
    )?;

    if let Some(path) = &opts.script {
        let msgs = script::load_script(path)?;
        let count = script::replay(&mut editor, msgs);
        log::info!("Replayed {count} messages, {} annotations", editor.annotations().len());
    }

    let image = editor.export().context("Failed to flatten annotations")?;
    println!("{}", export_status(sink_for(&opts, &config).as_ref(), &image));

    if opts.save_tools {
        config.tools = editor.params().clone();
        config.save();
    }
    Ok(())
}

/// Decode the base image, stitching several slices top to bottom
fn load_base(opts: &Opts) -> anyhow::Result<BaseImage> {
    let base = match (opts.images.as_slice(), opts.page_height) {
        ([single], None) => BaseImage::from_path(single)?,
        (paths, page_height) => {
            let slices = paths
                .iter()
                .map(|p| decode(p))
                .collect::<anyhow::Result<Vec<_>>>()?;
            BaseImage::new(stitch_vertical(&slices, page_height)?)
        }
    };
    Ok(match opts.display {
        Some((w, h)) => base.with_display_size(w, h),
        None => base,
    })
}

fn decode(path: &Path) -> anyhow::Result<RgbaImage> {
    Ok(image::open(path)
        .with_context(|| format!("Failed to open slice {}", path.display()))?
        .to_rgba8())
}

fn sink_for(opts: &Opts, config: &EditorConfig) -> Box<dyn ExportSink> {
    if opts.clipboard {
        return Box::new(ClipboardFileSink::default());
    }
    match &opts.out {
        Some(path) => Box::new(FileSink::Path(path.clone())),
        None => Box::new(FileSink::Location(config.save_location)),
    }
}

/// Run a sink and turn its result into a status line
///
/// Sink failures are reported, never propagated.
fn export_status(sink: &dyn ExportSink, image: &RgbaImage) -> String {
    match sink.export(image) {
        Ok(outcome) => outcome.message,
        Err(err) => {
            log::error!("Export failed: {err:#}");
            format!("Export failed: {err}")
        }
    }
}

fn placeholder_message(err: &anyhow::Error) -> String {
    format!("No screenshot to annotate: {err}")
}
