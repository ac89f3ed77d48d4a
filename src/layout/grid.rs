//! Grid placement of module instances.
//!
//! Used by array generators: cells are arranged on a rectangular grid, row
//! heights and column widths are derived from the cell footprints, and
//! instances are placed row-major with row 0 at the bottom.

use std::sync::Arc;

use crate::layout::geom::{Int, Orient, Point};
use crate::schematic::{InstanceId, Module};
use crate::Result;

#[derive(Debug, Clone)]
pub struct GridCell {
    pub master: Arc<Module>,
    pub orient: Orient,
}

impl GridCell {
    pub fn new(master: Arc<Module>, orient: Orient) -> Self {
        Self { master, orient }
    }

    fn size(&self) -> (Int, Int) {
        let bbox = self.master.bbox().unwrap_or_default();
        match self.orient {
            Orient::R90 | Orient::R270 => (bbox.height(), bbox.width()),
            _ => (bbox.width(), bbox.height()),
        }
    }
}

#[derive(Debug)]
pub struct GridLayout {
    inner: grid::Grid<Option<GridCell>>,
    row_heights: Vec<Int>,
    col_widths: Vec<Int>,
}

impl GridLayout {
    pub fn new(inner: grid::Grid<Option<GridCell>>) -> Self {
        let (rows, cols) = inner.size();
        let mut row_heights = vec![0; rows];
        let mut col_widths = vec![0; cols];
        for i in 0..rows {
            for j in 0..cols {
                if let Some(Some(cell)) = inner.get(i, j) {
                    let (w, h) = cell.size();
                    row_heights[i] = row_heights[i].max(h);
                    col_widths[j] = col_widths[j].max(w);
                }
            }
        }
        Self {
            inner,
            row_heights,
            col_widths,
        }
    }

    pub fn width(&self) -> Int {
        self.col_widths.iter().sum()
    }

    pub fn height(&self) -> Int {
        self.row_heights.iter().sum()
    }

    /// Places one instance per occupied grid slot into `parent`, row-major
    /// with row 0 at the bottom, and returns the handles in placement
    /// order. Instances are left unconnected; the caller connects them in
    /// the same order.
    pub fn place(
        &self,
        parent: &mut Module,
        prefix: &str,
        origin: Point,
    ) -> Result<Vec<InstanceId>> {
        let (rows, cols) = self.inner.size();
        let mut ids = Vec::new();
        let mut y = origin.y;
        for i in 0..rows {
            let mut x = origin.x;
            for j in 0..cols {
                if let Some(Some(cell)) = self.inner.get(i, j) {
                    let id = parent.add_instance(
                        format!("{}_{}_{}", prefix, i, j),
                        &cell.master,
                        Point::new(x, y),
                        cell.orient,
                    )?;
                    ids.push(id);
                }
                x += self.col_widths[j];
            }
            y += self.row_heights[i];
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Factory;
    use crate::tech::sky130;

    #[test]
    fn test_grid_dimensions_from_footprints() {
        let mut f = Factory::sky130().unwrap();
        let cell = f.leaf(sky130::SRAM_CELL).unwrap();
        let mut g = grid::Grid::init(2, 3, None);
        for i in 0..2 {
            for j in 0..3 {
                let orient = if i % 2 == 0 { Orient::R0 } else { Orient::Mx };
                g[i][j] = Some(GridCell::new(Arc::clone(&cell), orient));
            }
        }
        let layout = GridLayout::new(g);
        assert_eq!(layout.width(), 3 * 1200);
        assert_eq!(layout.height(), 2 * 1580);
    }

    #[test]
    fn test_grid_placement_order_and_offsets() {
        let mut f = Factory::sky130().unwrap();
        let cell = f.leaf(sky130::SRAM_CELL).unwrap();
        let mut g = grid::Grid::init(2, 2, None);
        for i in 0..2 {
            for j in 0..2 {
                g[i][j] = Some(GridCell::new(Arc::clone(&cell), Orient::R0));
            }
        }
        let layout = GridLayout::new(g);

        let mut parent = f.compound("grid_place_test").unwrap();
        let ids = layout.place(&mut parent, "cell", Point::zero()).unwrap();
        assert_eq!(ids.len(), 4);
        let inst = parent.instance(ids[3]);
        assert_eq!(inst.loc, Point::new(1200, 1580));
        assert_eq!(inst.name.as_str(), "cell_1_1");
    }
}
