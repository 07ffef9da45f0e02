//! Command-line argument parsing

use std::path::PathBuf;

use crate::config::ShapeColor;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
pagemark: annotate a full-page screenshot and export it

USAGE:
    pagemark [OPTIONS] <IMAGE>...

Several images are stitched top to bottom into one page.

OPTIONS:
    --script <FILE>      JSON array of editor messages to replay
    --display <WxH>      Size the page is displayed and annotated at
    --page-height <PX>   Height of the stitched page; the last slice is cropped
    --color <HEX>        Stroke color for lines and shapes (#rgb or #rrggbb)
    --out <FILE>         Write the PNG here instead of the pictures directory
    --clipboard          Write a temporary PNG for a clipboard tool
    --save-tools         Remember the tool parameters for next time
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    RUST_LOG             Log filter (default: warn)";

/// Parsed command-line options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opts {
    pub images: Vec<PathBuf>,
    pub script: Option<PathBuf>,
    pub display: Option<(u32, u32)>,
    pub page_height: Option<u32>,
    pub color: Option<ShapeColor>,
    pub out: Option<PathBuf>,
    pub clipboard: bool,
    pub save_tools: bool,
}

/// What the command line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse arguments, excluding the program name
    pub fn parse_from<I>(args: I) -> anyhow::Result<Command>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };
            let mut value = |name: &str| -> anyhow::Result<String> {
                match inline.clone() {
                    Some(v) => Ok(v),
                    None => args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("{name} requires a value")),
                }
            };

            match flag.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--clipboard" => opts.clipboard = true,
                "--save-tools" => opts.save_tools = true,
                "--script" => opts.script = Some(PathBuf::from(value("--script")?)),
                "--out" => opts.out = Some(PathBuf::from(value("--out")?)),
                "--display" => opts.display = Some(parse_size(&value("--display")?)?),
                "--page-height" => {
                    let raw = value("--page-height")?;
                    let height = raw
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid page height {raw:?}"))?;
                    opts.page_height = Some(height);
                }
                "--color" => {
                    let raw = value("--color")?;
                    let color = ShapeColor::from_hex(&raw)
                        .ok_or_else(|| anyhow::anyhow!("Invalid color {raw:?}"))?;
                    opts.color = Some(color);
                }
                other if other.starts_with('-') && other.len() > 1 => {
                    anyhow::bail!("Unknown option {other}, see --help")
                }
                _ => opts.images.push(PathBuf::from(arg)),
            }
        }

        if opts.images.is_empty() {
            anyhow::bail!("No image given, see --help");
        }
        Ok(Command::Run(opts))
    }
}

/// Parse "WxH"
fn parse_size(raw: &str) -> anyhow::Result<(u32, u32)> {
    let invalid = || anyhow::anyhow!("Invalid size {raw:?}, expected WxH");
    let (w, h) = raw.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w: u32 = w.trim().parse().map_err(|_| invalid())?;
    let h: u32 = h.trim().parse().map_err(|_| invalid())?;
    if w == 0 || h == 0 {
        return Err(invalid());
    }
    Ok((w, h))
}
