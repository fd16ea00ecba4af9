//! Quadtree grid for deterministic point location
//!
//! The tree is a fixed grid of root cells, each subdivided on demand while
//! cell definitions are loaded. Nodes live in a flat arena and refer to their
//! children by [`NodeId`], so the loaded tree is a plain immutable value that
//! can be shared between threads.
//!
//! Quadrant routing uses `<=` towards the south/west child and `>` towards the
//! north/east child. Points on a shared edge are therefore always routed the
//! same way by both [`QuadTree::lookup`] and [`QuadTree::load`].

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Two sizes closer than this are the same cell size
pub const SIZE_TOLERANCE: f64 = 1e-5;

/// Handle of a node in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Child slot, ordered as stored in [`GridCell::children`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    Ne = 0,
    Nw = 1,
    Se = 2,
    Sw = 3,
}

impl Quadrant {
    /// Identifier suffix appended to the parent's id
    pub const fn suffix(self) -> &'static str {
        match self {
            Quadrant::Ne => "10",
            Quadrant::Nw => "00",
            Quadrant::Se => "11",
            Quadrant::Sw => "01",
        }
    }

    /// Route a point relative to a centroid
    pub fn of(lat: f64, lon: f64, centre_lat: f64, centre_lon: f64) -> Self {
        if lat <= centre_lat && lon <= centre_lon {
            Quadrant::Sw
        } else if lat > centre_lat && lon > centre_lon {
            Quadrant::Ne
        } else if lat > centre_lat && lon <= centre_lon {
            Quadrant::Nw
        } else {
            Quadrant::Se
        }
    }

    /// Unit offsets of the child centroid as (lat, lon) signs
    const fn offsets(self) -> (f64, f64) {
        match self {
            Quadrant::Ne => (1.0, 1.0),
            Quadrant::Nw => (1.0, -1.0),
            Quadrant::Se => (-1.0, 1.0),
            Quadrant::Sw => (-1.0, -1.0),
        }
    }

    const ALL: [Quadrant; 4] = [Quadrant::Ne, Quadrant::Nw, Quadrant::Se, Quadrant::Sw];
}

/// One square cell of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Centroid latitude
    pub lat: f64,
    /// Centroid longitude
    pub lon: f64,
    /// Distance from centroid to edge, in degrees
    pub size: f64,
    /// Set once a cell definition has matched this node
    pub loaded: bool,
    pub id: String,
    /// NE, NW, SE, SW when subdivided
    pub children: Option<[NodeId; 4]>,
}

impl GridCell {
    fn new(id: String, size: f64, lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            size,
            loaded: false,
            id,
            children: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Whether a point falls inside this cell's square (edges inclusive)
    pub fn covers(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat - self.size
            && lat <= self.lat + self.size
            && lon >= self.lon - self.size
            && lon <= self.lon + self.size
    }
}

/// Fixed grid of root cells, each the top of its own quadtree
#[derive(Debug, Clone)]
pub struct QuadTree {
    lat_dim: usize,
    lon_dim: usize,
    min_lat: f64,
    min_lon: f64,
    base_size: f64,
    nodes: Vec<GridCell>,
    /// Row-major by latitude index
    roots: Vec<NodeId>,
}

impl QuadTree {
    /// Build the root grid
    ///
    /// `min_lat`/`min_lon` is the centroid of root cell (0, 0) and
    /// `base_size` the half-size of every root cell.
    pub fn new(lat_dim: usize, lon_dim: usize, min_lat: f64, min_lon: f64, base_size: f64) -> Self {
        let mut tree = Self {
            lat_dim,
            lon_dim,
            min_lat,
            min_lon,
            base_size,
            nodes: Vec::with_capacity(lat_dim * lon_dim),
            roots: Vec::with_capacity(lat_dim * lon_dim),
        };

        for lat_idx in 0..lat_dim {
            for lon_idx in 0..lon_dim {
                let cell = GridCell::new(
                    format!("b{lat_idx}-{lon_idx}-"),
                    base_size,
                    min_lat + 2.0 * lat_idx as f64 * base_size,
                    min_lon + 2.0 * lon_idx as f64 * base_size,
                );
                let id = tree.push(cell);
                tree.roots.push(id);
            }
        }
        tree
    }

    fn push(&mut self, cell: GridCell) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(cell);
        id
    }

    pub fn base_size(&self) -> f64 {
        self.base_size
    }

    /// Number of nodes, roots included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn cell(&self, id: NodeId) -> Option<&GridCell> {
        self.nodes.get(id.index())
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.nodes.iter()
    }

    fn axis_index(coord: f64, min: f64, base_size: f64, dim: usize) -> Option<usize> {
        let scaled = (coord - min + base_size) / (2.0 * base_size);
        // NaN fails the comparison; truncation is floor for non-negative values
        if !(scaled >= 0.0) {
            return None;
        }
        let idx = scaled as usize;
        (idx < dim).then_some(idx)
    }

    /// Root grid (lat, lon) indices for a point, `None` outside the grid
    pub fn root_index(&self, lat: f64, lon: f64) -> Option<(usize, usize)> {
        let lat_idx = Self::axis_index(lat, self.min_lat, self.base_size, self.lat_dim)?;
        let lon_idx = Self::axis_index(lon, self.min_lon, self.base_size, self.lon_dim)?;
        Some((lat_idx, lon_idx))
    }

    fn root(&self, lat: f64, lon: f64) -> Option<NodeId> {
        let (lat_idx, lon_idx) = self.root_index(lat, lon)?;
        Some(self.roots[lat_idx * self.lon_dim + lon_idx])
    }

    /// Handle of the leaf containing a point
    pub fn lookup_id(&self, lat: f64, lon: f64) -> Option<NodeId> {
        let mut current = self.root(lat, lon)?;
        loop {
            let cell = &self.nodes[current.index()];
            match cell.children {
                None => return Some(current),
                Some(children) => {
                    let quadrant = Quadrant::of(lat, lon, cell.lat, cell.lon);
                    current = children[quadrant as usize];
                }
            }
        }
    }

    /// Leaf cell containing a point, `None` outside the configured extent
    pub fn lookup(&self, lat: f64, lon: f64) -> Option<&GridCell> {
        self.lookup_id(lat, lon).map(|id| &self.nodes[id.index()])
    }

    /// Register a cell definition
    ///
    /// Descends from the root containing the point, subdividing leaves on
    /// the way, until a node whose half-size matches `size`. Returns `false`
    /// and leaves the tree untouched when the point lies outside the grid or
    /// `size` cannot match any node.
    pub fn load(&mut self, cell_id: &str, lat: f64, lon: f64, size: f64) -> bool {
        let Some(depth) = self.depth_of(size) else {
            return false;
        };
        let Some(mut current) = self.root(lat, lon) else {
            return false;
        };

        for _ in 0..depth {
            let cell = &self.nodes[current.index()];
            let quadrant = Quadrant::of(lat, lon, cell.lat, cell.lon);
            let existing = cell.children;
            let children = match existing {
                Some(children) => children,
                None => self.divide(current),
            };
            current = children[quadrant as usize];
        }

        let cell = &mut self.nodes[current.index()];
        cell.id = String::from(cell_id);
        cell.loaded = true;
        true
    }

    /// Subdivision depth whose half-size matches `size`
    ///
    /// Halves the root size the same way [`QuadTree::divide`] does, so a
    /// match here is a match on the node reached at that depth.
    pub fn depth_of(&self, size: f64) -> Option<usize> {
        if !size.is_finite() || size <= 0.0 {
            return None;
        }
        let mut level_size = self.base_size;
        let mut depth = 0;
        loop {
            let diff = size - level_size;
            if -SIZE_TOLERANCE < diff && diff < SIZE_TOLERANCE {
                return Some(depth);
            }
            // Levels only get smaller
            if diff > SIZE_TOLERANCE {
                return None;
            }
            level_size /= 2.0;
            depth += 1;
        }
    }

    fn divide(&mut self, parent: NodeId) -> [NodeId; 4] {
        let (lat, lon, size, id) = {
            let cell = &self.nodes[parent.index()];
            (cell.lat, cell.lon, cell.size / 2.0, cell.id.clone())
        };

        let mut children = [parent; 4];
        for quadrant in Quadrant::ALL {
            let (dlat, dlon) = quadrant.offsets();
            let child = GridCell::new(
                format!("{id}{}", quadrant.suffix()),
                size,
                lat + dlat * size,
                lon + dlon * size,
            );
            children[quadrant as usize] = self.push(child);
        }
        self.nodes[parent.index()].children = Some(children);
        children
    }

    /// Diagnostic check run after loading
    ///
    /// A loaded node must be a leaf. Every arena node is reachable from a
    /// root, so checking them all is the same as walking each tree.
    pub fn post_load_check(&self) -> bool {
        self.nodes.iter().all(|cell| !cell.loaded || cell.is_leaf())
    }

    /// Number of nodes marked loaded
    pub fn loaded_count(&self) -> usize {
        self.nodes.iter().filter(|cell| cell.loaded).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn small_tree() -> QuadTree {
        // Two by two roots centred on (0, 0), (0, 2), (2, 0), (2, 2)
        QuadTree::new(2, 2, 0.0, 0.0, 1.0)
    }

    #[test]
    fn test_root_grid() {
        let tree = small_tree();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root_index(0.0, 0.0), Some((0, 0)));
        assert_eq!(tree.root_index(-0.99, 2.5), Some((0, 1)));
        assert_eq!(tree.root_index(2.9, 2.9), Some((1, 1)));

        let cell = tree.lookup(2.1, 0.1).unwrap();
        assert_eq!(cell.id, "b1-0-");
        assert_eq!((cell.lat, cell.lon), (2.0, 0.0));
        assert!(cell.is_leaf());
        assert!(!cell.loaded);
    }

    #[test]
    fn test_outside_grid() {
        let tree = small_tree();
        assert!(tree.lookup(-1.01, 0.0).is_none());
        assert!(tree.lookup(0.0, -1.5).is_none());
        assert!(tree.lookup(3.0, 0.0).is_none());
        assert!(tree.lookup(0.0, 3.5).is_none());
        assert!(tree.lookup(f64::NAN, 0.0).is_none());
        assert!(tree.lookup(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_load_subdivides() {
        let mut tree = small_tree();
        assert!(tree.load("c1", 0.25, 0.25, 0.5));
        // Root plus four children
        assert_eq!(tree.len(), 8);

        let cell = tree.lookup(0.3, 0.2).unwrap();
        assert_eq!(cell.id, "c1");
        assert!(cell.loaded);
        assert_eq!(cell.size, 0.5);
        assert_eq!((cell.lat, cell.lon), (0.5, 0.5));

        let sibling = tree.lookup(-0.5, 0.5).unwrap();
        assert_eq!(sibling.id, "b0-0-11");
        assert!(!sibling.loaded);

        assert!(tree.post_load_check());
    }

    #[test]
    fn test_quadrant_tie_break() {
        let mut tree = small_tree();
        assert!(tree.load("sw", -0.5, -0.5, 0.5));

        // Exactly on the centroid goes south-west
        assert_eq!(tree.lookup(0.0, 0.0).unwrap().id, "sw");
        // On the vertical edge, north of centre goes north-west
        assert_eq!(tree.lookup(0.5, 0.0).unwrap().id, "b0-0-00");
        // On the horizontal edge, east of centre goes south-east
        assert_eq!(tree.lookup(0.0, 0.5).unwrap().id, "b0-0-11");
        assert_eq!(tree.lookup(0.1, 0.1).unwrap().id, "b0-0-10");
    }

    #[test]
    fn test_load_idempotent() {
        let mut once = small_tree();
        assert!(once.load("c9", 2.6, 2.6, 0.25));

        let mut twice = small_tree();
        assert!(twice.load("c9", 2.6, 2.6, 0.25));
        assert!(twice.load("c9", 2.6, 2.6, 0.25));

        assert_eq!(once.len(), twice.len());
        assert!(once.cells().eq(twice.cells()));
    }

    #[test]
    fn test_load_rejects() {
        let mut tree = small_tree();
        assert!(!tree.load("far", 10.0, 10.0, 0.5));
        assert!(!tree.load("zero", 0.0, 0.0, 0.0));
        assert!(!tree.load("neg", 0.0, 0.0, -0.5));
        assert!(!tree.load("big", 0.0, 0.0, 2.0));
        assert!(!tree.load("nan", 0.0, 0.0, f64::NAN));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_size_between_levels_leaves_tree_unchanged() {
        let mut tree = QuadTree::new(1, 1, 0.0, 0.0, 1.0);
        assert!(tree.load("A", 0.1, 0.1, 1.0));
        let before = tree.clone();

        assert!(!tree.load("x", 0.1, 0.1, 0.3));
        assert!(!tree.load("y", 0.1, 0.1, 0.6));
        assert_eq!(tree.len(), before.len());
        assert_eq!(tree.lookup(0.1, 0.1).map(|c| c.id.as_str()), Some("A"));
        assert!(tree.lookup(0.1, 0.1).unwrap().is_leaf());
        assert!(tree.post_load_check());
    }

    #[test]
    fn test_depth_of() {
        let tree = small_tree();
        assert_eq!(tree.depth_of(1.0), Some(0));
        assert_eq!(tree.depth_of(0.5), Some(1));
        assert_eq!(tree.depth_of(0.125 + 1e-6), Some(3));
        assert_eq!(tree.depth_of(0.3), None);
        assert_eq!(tree.depth_of(1.5), None);
        assert_eq!(tree.depth_of(f64::INFINITY), None);
    }

    #[test]
    fn test_loading_under_loaded_cell_is_invalid() {
        let mut tree = small_tree();
        assert!(tree.load("parent", 0.5, 0.5, 0.5));
        assert!(tree.post_load_check());

        assert!(tree.load("child", 0.75, 0.75, 0.25));
        assert!(!tree.post_load_check());
        assert_eq!(tree.loaded_count(), 2);
    }

    #[test]
    fn test_random_points_stay_in_cell() {
        let mut tree = QuadTree::new(8, 8, -44.36151598, 115.35990092, 2.56);
        let mut rng = StdRng::seed_from_u64(7);

        for i in 0..200 {
            let lat = rng.gen_range(-44.0..-10.0);
            let lon = rng.gen_range(113.0..153.0);
            let depth = rng.gen_range(1..6);
            let size = 2.56 / (1u32 << depth) as f64;
            assert!(tree.load(&format!("cell{i}"), lat, lon, size));
        }

        for _ in 0..2000 {
            let lat = rng.gen_range(-46.0..-8.0);
            let lon = rng.gen_range(112.0..156.0);
            if let Some(cell) = tree.lookup(lat, lon) {
                assert!(cell.is_leaf());
                assert!(cell.covers(lat, lon));
            }
        }
    }
}
