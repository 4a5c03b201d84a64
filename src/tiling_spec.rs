//////////////////////////////////////////////////////////////////////
// tiling files: one keyword per line, '#' starts a comment
//
//   offsets 0.3 0.2 -0.1 -0.4 0.0
//   size 10
//   canvas 800 800
//   scale 40              # or: fit_all
//   fill thick rgb 255 255 255
//   fill thin named gold
//   outline named black
//   line_width 1.0
//   output penrose.png

use std::io::BufRead;
use std::path::Path;

use phf::phf_map;
use tracing::debug;

use pentagrid_rs::{Pentagrid, RhombusShape, Vec2d};

use crate::errors::*;
use crate::render::{PageSettings, Placement};
use crate::Vec3d;

//////////////////////////////////////////////////////////////////////
// lookups during parsing

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum OutputFormat {
    Pdf,
    Png
}

// output file extension -> backend
static OUTPUT_FORMATS: phf::Map<&'static str, OutputFormat> = phf_map! {
    "pdf" => OutputFormat::Pdf,
    "png" => OutputFormat::Png,
};

static SHAPE_LOOKUP: phf::Map<&'static str, RhombusShape> = phf_map! {
    "thick" => RhombusShape::Thick,
    "thin" => RhombusShape::Thin,
};

static NAMED_COLORS: phf::Map<&'static str, (f64, f64, f64)> = phf_map! {
    "white" => (1.0, 1.0, 1.0),
    "black" => (0.0, 0.0, 0.0),
    "gray" => (0.5, 0.5, 0.5),
    "red" => (0.8, 0.1, 0.1),
    "blue" => (0.15, 0.3, 0.75),
    "sky" => (0.55, 0.75, 0.95),
    "gold" => (0.95, 0.75, 0.2),
    "green" => (0.2, 0.6, 0.3),
};

//////////////////////////////////////////////////////////////////////
// overengineered macro for parsing token lists

macro_rules! parse_tokens {

    // finalizer - no more input to match, just error if remaining
    // input or return collected outputs
    ($it:ident { } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            Some(value) => Err(format!("found extra token(s) starting with \"{:}\"", value)),
            None => Ok(($($tuple),*))
        }
    );

    // string map
    ($it:ident { $name:ident from $map:expr, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(&value) => {
                if let Some(&k) = $map.get(value) {
                    let $name = (value.to_string(), k);
                    parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } )
                } else {
                    let mut extended: Vec<&str> = Vec::new();
                    extended.extend($map.keys());
                    Err(format!("unexpected value \"{:}\" for {:}, expected one of: {{\"{:}\"}}",
                                value, stringify!($name), extended.join("\", \"") ))
                }
            }
        }
    );

    // name, type pair
    ($it:ident { $name:ident : $type:ident, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(value) => if let Ok($name) = value.parse::<$type>() {
                parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } )
            } else {
                Err(format!("error parsing {:} as type {:}",
                            value, stringify!($type)))
            }
        }
    );

    // Entry point
    ($a:expr, { $($ts:tt)+ }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { $($ts)* , } -> { } )
        }
    );

    // Entry point
    ($a:expr, { }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { } -> { } )
        }
    )

}

//////////////////////////////////////////////////////////////////////
// macros for inspecting/validating individual fields of TilingSpec

macro_rules! copy_field {

    ($dst:ident, $src:ident, $field:ident, $null:expr) => (
        if $src.$field != $null {
            if $dst.$field != $null {
                bail!("{:} is already set", stringify!($field));
            }
            $dst.$field = $src.$field;
        }
    );

    ($dst:ident, $src:ident, $field:ident) => (
        if $src.$field.is_some() {
            if $dst.$field.is_some() {
                bail!("{:} is already set", stringify!($field));
            }
            $dst.$field = $src.$field;
        }
    )

}

macro_rules! ensure_field {

    ($ts:ident, $fvec:ident, $field:ident, $null:expr) => (
        if $ts.$field == $null {
            $fvec.push(stringify!($field));
        }
    )

}

//////////////////////////////////////////////////////////////////////

fn parse_indices<T: std::str::FromStr>(tokens: &[&str]) -> Result<Vec<T>> {

    let mut rval = Vec::new();

    for value in tokens {
        if let Ok(idx) = value.parse::<T>() {
            rval.push(idx);
        } else {
            bail!("invalid value: {:}", value);
        }
    }

    Ok(rval)
}

// either "rgb R G B" with 0-255 components or "named NAME"
fn parse_color(tokens: &[&str]) -> Result<Vec3d> {

    match tokens.first() {

        Some(&"rgb") => {
            let rgb: Vec<u8> = parse_indices(&tokens[1..])?;
            if rgb.len() != 3 {
                bail!("need RGB triplet!");
            }
            Ok(Vec3d::new(rgb[0] as f64, rgb[1] as f64, rgb[2] as f64) / 255.0)
        },

        Some(&"named") => {
            let (_, (r, g, b)) = parse_tokens!(tokens[1..], { color from NAMED_COLORS })?;
            Ok(Vec3d::new(r, g, b))
        },

        Some(other) => bail!("invalid color type {:}, expected rgb or named", other),

        None => bail!("missing color")

    }

}

//////////////////////////////////////////////////////////////////////
// resolve a filename mentioned inside a tiling file relative to it

pub fn rel_path(orig_filename: &str,
                child_filename: String) -> String {

    let orig_filename = Path::new(orig_filename);

    match orig_filename.parent() {

        None => child_filename,

        Some(parent) => parent.join(child_filename).to_string_lossy().into_owned()

    }

}

//////////////////////////////////////////////////////////////////////
// an overall tiling specification

#[derive(Debug, PartialEq)]
pub struct TilingSpec {
    offsets: Option<[f64; 5]>,                    // one per line family
    size: usize,                                  // line levels in [-size, size]
    canvas: Option<Vec2d>,                        // output surface dims
    placement: Placement,                         // fixed scale or fit
    thick_fill: Option<Vec3d>,
    thin_fill: Option<Vec3d>,
    outline: Option<Vec3d>,
    line_width: f64,
    output: Option<(String, OutputFormat)>        // path, backend
}

impl TilingSpec {

    fn new() -> TilingSpec {
        TilingSpec {
            offsets: None,
            size: usize::MAX,
            canvas: None,
            placement: Placement::Unset,
            thick_fill: None,
            thin_fill: None,
            outline: None,
            line_width: -1.0,
            output: None
        }
    }

    fn update(&mut self, other: TilingSpec) -> Result<()> {

        copy_field!(self, other, offsets);
        copy_field!(self, other, size, usize::MAX);
        copy_field!(self, other, canvas);
        copy_field!(self, other, placement, Placement::Unset);
        copy_field!(self, other, thick_fill);
        copy_field!(self, other, thin_fill);
        copy_field!(self, other, outline);
        copy_field!(self, other, line_width, -1.0);
        copy_field!(self, other, output);

        Ok(())

    }

    fn parse_keyword(filename: &str,
                     keyword: &str,
                     rest: &[&str]) -> Result<TilingSpec> {

        let mut update = TilingSpec::new();

        match keyword {

            "offsets" => {

                let (a, b, c, d, e) = parse_tokens!(rest, {
                    a: f64, b: f64, c: f64, d: f64, e: f64
                })?;

                update.offsets = Some([a, b, c, d, e]);

            },

            "size" => {

                update.size = parse_tokens!(rest, { size: usize })?;

            },

            "canvas" => {

                let (w, h) = parse_tokens!(rest, { width: f64, height: f64 })?;

                if w <= 0.0 || h <= 0.0 {
                    bail!("canvas dimensions must be positive");
                }

                update.canvas = Some(Vec2d::new(w, h));

            },

            "scale" => {

                let scale = parse_tokens!(rest, { scale: f64 })?;

                if scale <= 0.0 {
                    bail!("scale must be positive");
                }

                update.placement = Placement::Scale(scale);

            },

            "fit_all" => {

                parse_tokens!(rest, { })?;

                update.placement = Placement::Fit;

            },

            "fill" => {

                let (_, shape) = match rest.first() {
                    None => bail!("missing tile shape"),
                    Some(_) => parse_tokens!(rest[..1], { shape from SHAPE_LOOKUP })?
                };

                let color = parse_color(&rest[1..])?;

                match shape {
                    RhombusShape::Thick => update.thick_fill = Some(color),
                    RhombusShape::Thin => update.thin_fill = Some(color)
                }

            },

            "outline" => {

                update.outline = Some(parse_color(rest)?);

            },

            "line_width" => {

                let width = parse_tokens!(rest, { width: f64 })?;

                if width < 0.0 {
                    bail!("line width must be nonnegative");
                }

                update.line_width = width;

            },

            "output" => {

                let ofilename = parse_tokens!(rest, { filename: String })?;

                let ext = Path::new(&ofilename)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("");

                let format = match OUTPUT_FORMATS.get(ext) {
                    Some(&format) => format,
                    None => bail!("unsupported output extension \"{:}\", expected pdf or png", ext)
                };

                update.output = Some((rel_path(filename, ofilename), format));

            },

            _ => {
                bail!("unrecognized keyword");
            }

        };

        Ok(update)

    }

    fn update_from(&mut self, filename: &str, line: &str) -> Result<()> {

        let mut trimmed = line.trim();

        if let Some(pos) = trimmed.find('#') {
            trimmed = &trimmed[0..pos];
        }

        if trimmed.trim().is_empty() {
            return Ok(());
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        let keyword = tokens[0];
        let rest = &tokens[1..];

        let update = Self::parse_keyword(filename, keyword, rest).chain_err(
            || format!("while parsing keyword {:}", keyword))?;

        self.update(update)

    }

    pub fn parse(filename: &str, istr: &mut impl BufRead) -> Result<TilingSpec> {

        let mut ts = TilingSpec::new();
        let mut lineno = 0;

        loop {

            let mut line = String::new();

            lineno += 1;

            let len = istr.read_line(&mut line).chain_err(|| format!("{:}:{:}: read error", filename, lineno))?;

            if len == 0 {
                break;
            }

            ts.update_from(filename, line.as_str()).chain_err(|| format!("{:}:{:}: parse error", filename, lineno))?;

        }

        let mut unset_fields = Vec::new();

        ensure_field!(ts, unset_fields, offsets, None);
        ensure_field!(ts, unset_fields, size, usize::MAX);
        ensure_field!(ts, unset_fields, canvas, None);
        ensure_field!(ts, unset_fields, placement, Placement::Unset);

        if !unset_fields.is_empty() {
            bail!("{:}: the following field(s) were unset: {:}",
                  filename, unset_fields.as_slice().join(", "));
        }

        debug!(?ts, "parsed tiling spec");

        Ok(ts)

    }

    //////////////////////////////////////////////////
    // accessors, filling in defaults for optional fields

    pub fn pentagrid(&self) -> Result<Pentagrid> {
        match self.offsets {
            Some(offsets) => Ok(Pentagrid::new(offsets)),
            None => bail!("offsets unset")
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn page_settings(&self) -> Result<PageSettings> {

        let canvas = match self.canvas {
            Some(canvas) => canvas,
            None => bail!("canvas unset")
        };

        let white = Vec3d::repeat(1.0);

        Ok(PageSettings {
            canvas,
            placement: self.placement,
            thick_fill: self.thick_fill.unwrap_or(white),
            thin_fill: self.thin_fill.unwrap_or(white),
            outline: self.outline.unwrap_or_else(Vec3d::zeros),
            line_width: if self.line_width < 0.0 { 1.0 } else { self.line_width }
        })

    }

    // explicit output, else <stem>.pdf beside the tiling file
    pub fn output(&self, filename: &str) -> (String, OutputFormat) {

        match &self.output {

            Some(output) => output.clone(),

            None => {
                let basename = match Path::new(filename).file_stem() {
                    None => "output",
                    Some(os_str) => os_str.to_str().unwrap_or("output")
                };
                (rel_path(filename, basename.to_owned() + ".pdf"), OutputFormat::Pdf)
            }

        }

    }

}
