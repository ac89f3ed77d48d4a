//! Polyline paths and multi-layer wires.
//!
//! A [`Path`] is an ordered point sequence drawn at a fixed width on one
//! layer. A [`Wire`] may switch layers mid-route through a via stack; the
//! via geometry is inserted automatically at each transition.

use arcstr::ArcStr;

use crate::layout::geom::{Int, Point, Rect};
use crate::pdk::{Pdk, ViaParams};
use crate::schematic::Module;

#[derive(Debug, Clone)]
pub struct Path {
    pub layer: ArcStr,
    pub width: Int,
    pub points: Vec<Point>,
}

impl Path {
    pub fn new(layer: impl Into<ArcStr>, width: Int, points: Vec<Point>) -> Self {
        assert!(points.len() >= 2, "a path needs at least two points");
        assert!(width > 0);
        Self {
            layer: layer.into(),
            width,
            points,
        }
    }

    pub fn draw_into(&self, module: &mut Module) {
        draw_segments(module, &self.layer, self.width, &self.points);
    }
}

fn draw_segments(module: &mut Module, layer: &ArcStr, width: Int, points: &[Point]) {
    let half = width / 2;
    for pair in points.windows(2) {
        if pair[0] == pair[1] {
            continue;
        }
        let seg = Rect::from_segment(pair[0], pair[1], width);
        // Square endcaps so corner joints overlap.
        let seg = if pair[0].y == pair[1].y {
            Rect::new(
                Point::new(seg.p0.x - half, seg.p0.y),
                Point::new(seg.p1.x + half, seg.p1.y),
            )
        } else {
            Rect::new(
                Point::new(seg.p0.x, seg.p0.y - half),
                Point::new(seg.p1.x, seg.p1.y + half),
            )
        };
        module.add_rect(layer.clone(), seg);
    }
}

struct WireSegment {
    layer: ArcStr,
    points: Vec<Point>,
}

/// A wire under construction. Layer transitions are resolved against the
/// technology table when the wire is drawn.
pub struct Wire {
    width: Int,
    segments: Vec<WireSegment>,
}

impl Wire {
    pub fn start(layer: impl Into<ArcStr>, width: Int, at: Point) -> Self {
        assert!(width > 0);
        Self {
            width,
            segments: vec![WireSegment {
                layer: layer.into(),
                points: vec![at],
            }],
        }
    }

    fn cursor(&self) -> Point {
        *self
            .segments
            .last()
            .and_then(|s| s.points.last())
            .expect("wire always has a cursor")
    }

    /// Extends the wire to `p` on the current layer. Segments must be
    /// axis-aligned; route corners with two calls.
    pub fn to(mut self, p: Point) -> Self {
        let cur = self.cursor();
        assert!(cur.x == p.x || cur.y == p.y, "wire segments must be axis-aligned");
        self.segments.last_mut().unwrap().points.push(p);
        self
    }

    /// Extends horizontally to x, then vertically to y.
    pub fn to_xy(self, p: Point) -> Self {
        let cur = self.cursor();
        self.to(Point::new(p.x, cur.y)).to(p)
    }

    /// Switches to `layer` at the current point. The via stack joining the
    /// two layers is looked up in the technology table and its geometry is
    /// inserted when the wire is drawn.
    pub fn switch(mut self, layer: impl Into<ArcStr>) -> Self {
        let at = self.cursor();
        self.segments.push(WireSegment {
            layer: layer.into(),
            points: vec![at],
        });
        self
    }

    /// Draws the wire's segments and transition vias into `module`.
    pub fn draw_into(self, module: &mut Module, pdk: &Pdk) {
        for seg in &self.segments {
            if seg.points.len() >= 2 {
                draw_segments(module, &seg.layer, self.width, &seg.points);
            }
        }
        for pair in self.segments.windows(2) {
            let at = *pair[0].points.last().unwrap();
            let (stack, _) = pdk.config().stack_between(&pair[0].layer, &pair[1].layer);
            let params = ViaParams::builder()
                .stack(stack.to_string())
                .build()
                .unwrap();
            for elem in pdk.draw_via(&params, at) {
                module.add_rect(elem.layer, elem.rect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Factory;

    #[test]
    fn test_path_draws_one_rect_per_segment() {
        let mut f = Factory::sky130().unwrap();
        let mut m = f.compound("path_test").unwrap();
        Path::new(
            "met1",
            140,
            vec![
                Point::new(0, 0),
                Point::new(1000, 0),
                Point::new(1000, 2000),
            ],
        )
        .draw_into(&mut m);
        assert_eq!(m.layout().elems().len(), 2);
    }

    #[test]
    fn test_wire_inserts_via_at_layer_transition() {
        let mut f = Factory::sky130().unwrap();
        let mut m = f.compound("wire_test").unwrap();
        let pdk = crate::tech::sky130::pdk().unwrap();
        Wire::start("met1", 140, Point::new(0, 0))
            .to(Point::new(2000, 0))
            .switch("met2")
            .to(Point::new(2000, 3000))
            .draw_into(&mut m, &pdk);
        let elems = m.layout().elems();
        assert!(elems.iter().any(|e| e.layer == "via1"));
        assert!(elems.iter().any(|e| e.layer == "met1"));
        assert!(elems.iter().any(|e| e.layer == "met2"));
    }

    #[test]
    #[should_panic]
    fn test_wire_rejects_diagonal_segment() {
        let _ = Wire::start("met1", 140, Point::new(0, 0)).to(Point::new(10, 10));
    }
}
