use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::layout::geom::{Dir, Point, Rect};
use crate::layout::Element;
use crate::pdk::Pdk;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, derive_builder::Builder)]
pub struct ViaParams {
    /// Name of the via stack in the technology table.
    pub stack: String,
    #[builder(default = "1")]
    pub rows: i64,
    #[builder(default = "1")]
    pub cols: i64,
    /// The "relaxed" direction, ie. the direction in which the endpoint
    /// layers may be extended to satisfy one-sided enclosure rules.
    #[builder(default)]
    pub dir: Dir,
}

impl Display for ViaParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}x{}{}",
            &self.stack,
            self.rows,
            self.cols,
            self.dir.short_form()
        )
    }
}

impl ViaParams {
    pub fn builder() -> ViaParamsBuilder {
        ViaParamsBuilder::default()
    }
}

impl Pdk {
    /// Generates the shapes of a via: a grid of cuts plus the enclosing
    /// endpoint-layer rectangles, centered at `center`.
    pub fn draw_via(&self, params: &ViaParams, center: Point) -> Vec<Element> {
        let rows = params.rows;
        let cols = params.cols;
        assert!(rows > 0);
        assert!(cols > 0);

        let tc = self.config();
        let stack = tc.stack(&params.stack);
        assert_eq!(stack.layers.len(), 3);

        let cut_name = &stack.layers[1];
        let cutw = tc.layer(cut_name).width;
        let cuts = tc.layer(cut_name).space;
        let aw = cutw * cols + cuts * (cols - 1);
        let ah = cutw * rows + cuts * (rows - 1);

        let x0 = center.x - aw / 2;
        let y0 = center.y - ah / 2;
        let cut_bbox = Rect::new(Point::new(x0, y0), Point::new(x0 + aw, y0 + ah));

        let mut elems = Vec::new();
        for i in 0..rows {
            for j in 0..cols {
                let left = x0 + j * (cutw + cuts);
                let bot = y0 + i * (cutw + cuts);
                elems.push(Element::new(
                    cut_name.as_str(),
                    Rect::with_size(Point::new(left, bot), cutw, cutw),
                ));
            }
        }

        for lay_name in [&stack.layers[0], &stack.layers[2]] {
            let enc = tc.layer(cut_name).enclosure(lay_name);
            let ose = tc.layer(cut_name).one_side_enclosure(lay_name);
            let mut laybox = cut_bbox.expand(enc);
            match params.dir {
                Dir::Vert => {
                    laybox.p0.y = laybox.p0.y.min(cut_bbox.p0.y - ose);
                    laybox.p1.y = laybox.p1.y.max(cut_bbox.p1.y + ose);
                }
                Dir::Horiz => {
                    laybox.p0.x = laybox.p0.x.min(cut_bbox.p0.x - ose);
                    laybox.p1.x = laybox.p1.x.max(cut_bbox.p1.x + ose);
                }
            }
            elems.push(Element::new(lay_name.as_str(), laybox));
        }

        elems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tech::sky130;

    #[test]
    fn test_via_name() {
        let params = ViaParams::builder()
            .stack("via1".to_string())
            .rows(2)
            .cols(1)
            .dir(Dir::Horiz)
            .build()
            .unwrap();
        assert_eq!(params.to_string(), "via1_2x1h");
    }

    #[test]
    fn test_draw_via_layers() {
        let pdk = sky130::pdk().unwrap();
        let params = ViaParams::builder()
            .stack("via1".to_string())
            .build()
            .unwrap();
        let elems = pdk.draw_via(&params, Point::zero());
        // One cut plus the two endpoint layers.
        assert_eq!(elems.len(), 3);
        let cut = elems.iter().find(|e| e.layer == "via1").unwrap();
        let m1 = elems.iter().find(|e| e.layer == "met1").unwrap();
        let m2 = elems.iter().find(|e| e.layer == "met2").unwrap();
        assert!(m1.rect.width() >= cut.rect.width());
        assert!(m2.rect.height() >= cut.rect.height());
    }

    #[test]
    fn test_via_grid_dimensions() {
        let pdk = sky130::pdk().unwrap();
        let params = ViaParams::builder()
            .stack("via1".to_string())
            .rows(2)
            .cols(3)
            .build()
            .unwrap();
        let elems = pdk.draw_via(&params, Point::new(1000, 1000));
        let cuts = elems.iter().filter(|e| e.layer == "via1").count();
        assert_eq!(cuts, 6);
    }
}
