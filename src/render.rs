//////////////////////////////////////////////////////////////////////
// drawing tilings with cairo

use std::fs::File;

use tracing::{debug, info};

use pentagrid_rs::{Point2d, Rect2d, RhombusShape, Tiling, Vec2d};

use crate::errors::*;
use crate::Vec3d;

type Translation2d = nalgebra::Translation2<f64>;
type Transform2d = nalgebra::Transform2<f64>;
type Matrix3d = nalgebra::Matrix3<f64>;

//////////////////////////////////////////////////////////////////////
// how tiling coordinates land on the page

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Placement {
    Unset,
    Scale(f64), // origin at page center, this many output units per edge
    Fit         // scale bounding rect of whole tiling to the page
}

#[derive(Debug, PartialEq, Clone)]
pub struct PageSettings {
    pub canvas: Vec2d,
    pub placement: Placement,
    pub thick_fill: Vec3d,
    pub thin_fill: Vec3d,
    pub outline: Vec3d,
    pub line_width: f64
}

impl PageSettings {

    pub fn fill_for(&self, shape: RhombusShape) -> &Vec3d {
        match shape {
            RhombusShape::Thick => &self.thick_fill,
            RhombusShape::Thin => &self.thin_fill
        }
    }

    pub fn page_rect(&self) -> Rect2d {
        Rect2d::new(Point2d::origin(), Point2d::origin() + self.canvas)
    }

}

//////////////////////////////////////////////////////////////////////
//
// make a Transform2d that will map center (input) to the center of
// the given page_rect (output) with scale factor scl.
//
// always includes vertical flip because graphics coordinate system
// is left-handed (y increases going down)
//

pub fn page_transform(center: &Point2d,
                      scl: f64,
                      page_rect: &Rect2d) -> Transform2d {

    let pmid = page_rect.center();

    let translate_page = Translation2d::new(pmid[0], pmid[1]);

    let scale = Transform2d::from_matrix_unchecked(
        Matrix3d::new(
            scl, 0.0, 0.0,
            0.0, -scl, 0.0,
            0.0, 0.0, 1.0
        )
    );

    let translate_points = Translation2d::new(-center[0], -center[1]);

    translate_page * scale * translate_points

}

// largest scale that fits contents_rect inside page_rect
pub fn fit_scale(contents_rect: &Rect2d, page_rect: &Rect2d) -> f64 {

    let cdims = contents_rect.dims();
    let pdims = page_rect.dims();

    (pdims.component_div(&cdims)).min()

}

pub fn get_page_transform(tiling: &Tiling, page: &PageSettings) -> Result<Transform2d> {

    let page_rect = page.page_rect();

    match page.placement {

        Placement::Scale(scl) => {
            Ok(page_transform(&Point2d::origin(), scl, &page_rect))
        },

        Placement::Fit => {
            let contents_rect = tiling.bounds();
            let scl = fit_scale(&contents_rect, &page_rect);
            debug!(scl, "fit tiling to page");
            Ok(page_transform(&contents_rect.center(), scl, &page_rect))
        },

        Placement::Unset => bail!("no placement for tiling")

    }

}

//////////////////////////////////////////////////////////////////////

trait CairoVecOps {

    fn moveto(&self, p: &Point2d);
    fn lineto(&self, p: &Point2d);
    fn setcolor(&self, v: &Vec3d);
    fn drawpoly(&self, poly: &[Point2d]);

}

impl CairoVecOps for cairo::Context {

    fn setcolor(&self, v: &Vec3d) {
        self.set_source_rgb(v[0], v[1], v[2]);
    }

    fn moveto(&self, p: &Point2d) {
        self.move_to(p.x, p.y);
    }

    fn lineto(&self, p: &Point2d) {
        self.line_to(p.x, p.y);
    }

    fn drawpoly(&self, poly: &[Point2d]) {
        for (i, p) in poly.iter().enumerate() {
            if i == 0 {
                self.moveto(p);
            } else {
                self.lineto(p);
            }
        }
        self.close_path();
    }

}

//////////////////////////////////////////////////////////////////////
// fill and outline every tile; returns number of tiles drawn

pub fn draw_tiling(ctx: &cairo::Context,
                   tiling: Tiling,
                   page: &PageSettings) -> Result<usize> {

    let transform = get_page_transform(&tiling, page)?;

    let page_rect = page.page_rect();

    ctx.setcolor(&Vec3d::repeat(1.0));
    ctx.rectangle(page_rect.p0.x, page_rect.p0.y,
                  page_rect.dims().x, page_rect.dims().y);
    ctx.fill();

    ctx.set_line_width(page.line_width);
    ctx.set_line_join(cairo::LineJoin::Round);

    let mut count = 0;

    for rhombus in tiling {

        let poly: Vec<Point2d> = rhombus.points.iter().map(|p| transform * p).collect();

        ctx.drawpoly(&poly);
        ctx.setcolor(page.fill_for(rhombus.shape()));
        ctx.fill_preserve();

        if page.line_width > 0.0 {
            ctx.setcolor(&page.outline);
            ctx.stroke();
        } else {
            ctx.new_path();
        }

        count += 1;

    }

    Ok(count)

}

//////////////////////////////////////////////////////////////////////
// output backends

pub fn write_pdf(tiling: Tiling, page: &PageSettings, pdffile: &str) -> Result<usize> {

    let surface = cairo::PdfSurface::new(page.canvas.x, page.canvas.y, pdffile)?;

    let ctx = cairo::Context::new(&surface);

    let count = draw_tiling(&ctx, tiling, page)?;

    ctx.show_page();

    info!(count, pdffile, "rendered pdf");

    Ok(count)

}

// draw into an in-memory ARGB surface the size of the canvas
pub fn render_image(tiling: Tiling, page: &PageSettings) -> Result<(cairo::ImageSurface, usize)> {

    let width = page.canvas.x.ceil() as i32;
    let height = page.canvas.y.ceil() as i32;

    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;

    let count = {
        let ctx = cairo::Context::new(&surface);
        draw_tiling(&ctx, tiling, page)?
    };

    surface.flush();

    Ok((surface, count))

}

pub fn write_png(tiling: Tiling, page: &PageSettings, pngfile: &str) -> Result<usize> {

    let (surface, count) = render_image(tiling, page)?;

    let mut file = File::create(pngfile).chain_err(|| format!("creating {:}", pngfile))?;
    surface.write_to_png(&mut file)?;

    info!(count, pngfile, "rendered png");

    Ok(count)

}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;
    use pentagrid_rs::tiling;

    const OFFSETS: [f64; 5] = [0.3, 0.2, -0.1, -0.4, 0.0];

    // opaque ARGB32 values of the fills and outline used below
    const RED: u32 = 0xFFFF0000;
    const BLUE: u32 = 0xFF0000FF;
    const BLACK: u32 = 0xFF000000;
    const WHITE: u32 = 0xFFFFFFFF;

    fn settings(placement: Placement) -> PageSettings {
        PageSettings {
            canvas: Vec2d::new(800.0, 600.0),
            placement,
            thick_fill: Vec3d::new(1.0, 0.0, 0.0),
            thin_fill: Vec3d::new(0.0, 0.0, 1.0),
            outline: Vec3d::zeros(),
            line_width: 1.0
        }
    }

    fn small_page(scale: f64, line_width: f64) -> PageSettings {
        PageSettings {
            canvas: Vec2d::new(600.0, 600.0),
            line_width,
            ..settings(Placement::Scale(scale))
        }
    }

    // pixel containing p, as native-endian ARGB
    fn argb_at(surface: &mut cairo::ImageSurface, p: &Point2d) -> u32 {

        let stride = surface.get_stride() as usize;
        let data = surface.get_data().unwrap();

        let i = (p.y.floor() as usize) * stride + 4 * (p.x.floor() as usize);

        u32::from_ne_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]])

    }

    // true if poly stays at least margin pixels inside the canvas
    fn inside(page: &PageSettings, poly: &[Point2d], margin: f64) -> bool {
        poly.iter().all(|p| {
            p.x >= margin && p.y >= margin &&
                p.x <= page.canvas.x - margin && p.y <= page.canvas.y - margin
        })
    }

    #[test]
    fn scale_transform_centers_and_flips() {

        let page = settings(Placement::Scale(40.0));
        let xform = get_page_transform(&tiling(&OFFSETS, 1).unwrap(), &page).unwrap();

        assert_abs_diff_eq!(xform * Point2d::origin(), Point2d::new(400.0, 300.0), epsilon = 1e-9);
        assert_abs_diff_eq!(xform * Point2d::new(1.0, 1.0), Point2d::new(440.0, 260.0), epsilon = 1e-9);

    }

    #[test]
    fn fit_transform_keeps_tiling_on_page() {

        let page = settings(Placement::Fit);
        let t = tiling(&OFFSETS, 2).unwrap();

        let xform = get_page_transform(&t, &page).unwrap();

        let page_rect = page.page_rect();
        let grown = Rect2d::new(page_rect.p0 - Vec2d::repeat(1e-6),
                                page_rect.p1 + Vec2d::repeat(1e-6));

        for rh in t {
            for p in rh.points.iter() {
                assert!(grown.contains(&(xform * p)));
            }
        }

    }

    #[test]
    fn unset_placement_is_an_error() {
        assert!(get_page_transform(&tiling(&OFFSETS, 0).unwrap(), &settings(Placement::Unset)).is_err());
    }

    #[test]
    fn fill_by_shape() {
        let page = settings(Placement::Fit);
        assert_eq!(page.fill_for(RhombusShape::Thick), &Vec3d::new(1.0, 0.0, 0.0));
        assert_eq!(page.fill_for(RhombusShape::Thin), &Vec3d::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn background_is_painted_white() {

        let page = small_page(2.0, 1.0);

        let (mut surface, count) = render_image(tiling(&OFFSETS, 1).unwrap(), &page).unwrap();

        assert_eq!(count, 90);
        assert_eq!(argb_at(&mut surface, &Point2d::new(0.5, 0.5)), WHITE);
        assert_eq!(argb_at(&mut surface, &Point2d::new(599.5, 599.5)), WHITE);

    }

    #[test]
    fn tile_centers_get_shape_fill() {

        for &line_width in &[1.0, 0.0] {

            let page = small_page(40.0, line_width);
            let t = tiling(&OFFSETS, 1).unwrap();
            let xform = get_page_transform(&t, &page).unwrap();

            let (mut surface, count) = render_image(t.clone(), &page).unwrap();
            assert_eq!(count, 90);

            let mut checked = [0, 0];

            for rh in t {

                let poly: Vec<Point2d> = rh.points.iter().map(|p| xform * p).collect();
                if !inside(&page, &poly, 2.0) {
                    continue;
                }

                let pixel = argb_at(&mut surface, &(xform * rh.center()));

                let (idx, expected) = match rh.shape() {
                    RhombusShape::Thick => (0, RED),
                    RhombusShape::Thin => (1, BLUE)
                };

                assert_eq!(pixel, expected, "tile {:?} {:?}", rh.r, rh.s);
                assert_ne!(pixel, BLACK);
                checked[idx] += 1;

            }

            assert!(checked[0] > 0 && checked[1] > 0, "{:?}", checked);

        }

    }

    #[test]
    fn zero_line_width_skips_outline() {

        let t = tiling(&OFFSETS, 1).unwrap();

        let stroked = small_page(40.0, 4.0);
        let bare = small_page(40.0, 0.0);

        // both pages share a transform since only line_width differs
        let xform = get_page_transform(&t, &stroked).unwrap();

        let edge_mid = t.clone()
            .map(|rh| {
                let poly: Vec<Point2d> = rh.points.iter().map(|p| xform * p).collect();
                (nalgebra::center(&poly[0], &poly[1]), inside(&stroked, &poly, 8.0))
            })
            .find(|&(_, ok)| ok)
            .map(|(mid, _)| mid)
            .unwrap();

        let (mut surface, _) = render_image(t.clone(), &stroked).unwrap();
        assert_eq!(argb_at(&mut surface, &edge_mid), BLACK);

        let (mut surface, _) = render_image(t, &bare).unwrap();
        let pixel = argb_at(&mut surface, &edge_mid);

        assert_ne!(pixel, BLACK);

        let brightest = pixel.to_be_bytes()[1..].iter().cloned().max().unwrap();
        assert!(brightest >= 0x40, "{:08x}", pixel);

    }

}
