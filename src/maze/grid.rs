use super::Coord;

/// Row-major 2D storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    pub data: Box<[T]>,
    width: u8,
    height: u8,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: u8, height: u8, value: T) -> Self {
        let data = vec![value; width as usize * height as usize].into_boxed_slice();
        Grid {
            data,
            width,
            height,
        }
    }
}

impl<T> Grid<T> {
    /// Builds the grid by calling `f` for every coordinate in row-major order.
    pub fn from_fn(width: u8, height: u8, mut f: impl FnMut(Coord) -> T) -> Self {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(&mut f)
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Grid {
            data,
            width,
            height,
        }
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    fn ravel_index(&self, x: u8, y: u8) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, coord: Coord) -> Option<&T> {
        if coord.0 < self.width && coord.1 < self.height {
            self.data.get(self.ravel_index(coord.0, coord.1))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> std::ops::Index<Coord> for Grid<T> {
    type Output = T;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}

impl<T> std::ops::IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        let idx = self.ravel_index(index.0, index.1);
        &mut self.data[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::from_fn(3, 2, |(x, y)| y * 10 + x);
        assert_eq!(&*grid.data, &[0, 1, 2, 10, 11, 12]);
        assert_eq!(grid[(2, 1)], 12);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::new(3, 2, 0u8);
        assert_eq!(grid.get((2, 1)), Some(&0));
        assert_eq!(grid.get((3, 0)), None);
        assert_eq!(grid.get((0, 2)), None);
    }
}
