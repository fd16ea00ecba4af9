//! Point to postcode resolution
//!
//! Two-stage filter: the quadtree narrows a point to a grid cell, each cell
//! lists the postcodes whose boundaries overlap it, and the first candidate
//! whose polygon strictly contains the point wins.

use geo::Contains;
use geo_types::{MultiPolygon, Point, Polygon};
use hashbrown::HashMap;
use rfoasis_core::{PostcodeSource, QuadTree};

/// Postcode lookup over a loaded quadtree and boundary set
#[derive(Debug, Clone)]
pub struct PostcodeResolver {
    tree: QuadTree,
    /// Candidate postcodes per cell id, in load order
    candidates: HashMap<String, Vec<u32>>,
    boundaries: HashMap<u32, Vec<Polygon<f64>>>,
}

impl PostcodeResolver {
    pub fn new(tree: QuadTree) -> Self {
        Self {
            tree,
            candidates: HashMap::new(),
            boundaries: HashMap::new(),
        }
    }

    /// Register a cell definition in the quadtree
    pub fn load_cell(&mut self, cell_id: &str, lat: f64, lon: f64, size: f64) -> bool {
        self.tree.load(cell_id, lat, lon, size)
    }

    /// Append a candidate postcode to a cell
    pub fn add_candidate(&mut self, cell_id: &str, postcode: u32) {
        match self.candidates.get_mut(cell_id) {
            Some(list) => list.push(postcode),
            None => {
                self.candidates.insert(cell_id.to_string(), vec![postcode]);
            }
        }
    }

    pub fn add_boundary(&mut self, postcode: u32, polygon: Polygon<f64>) {
        self.boundaries.entry(postcode).or_default().push(polygon);
    }

    /// Register every part of a multi-part boundary
    pub fn add_boundaries(&mut self, postcode: u32, shape: MultiPolygon<f64>) {
        self.boundaries
            .entry(postcode)
            .or_default()
            .extend(shape.0);
    }

    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    pub fn cell_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Candidate postcodes of the cell containing a point
    pub fn candidates_at(&self, lat: f64, lon: f64) -> &[u32] {
        self.tree
            .lookup(lat, lon)
            .and_then(|cell| self.candidates.get(cell.id.as_str()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Exact postcode at a point
    pub fn postcode_at(&self, lon: f64, lat: f64) -> Option<u32> {
        let point = Point::new(lon, lat);
        self.candidates_at(lat, lon).iter().copied().find(|postcode| {
            self.boundaries
                .get(postcode)
                .is_some_and(|polygons| polygons.iter().any(|polygon| polygon.contains(&point)))
        })
    }

    /// Postcode at `(lon, lat)`, `None` when either coordinate is missing
    pub fn get_postcode(&self, lon: Option<f64>, lat: Option<f64>) -> Option<u32> {
        self.postcode_at(lon?, lat?)
    }
}

impl PostcodeSource for PostcodeResolver {
    fn get_postcode(&self, lon: Option<f64>, lat: Option<f64>) -> Option<u32> {
        PostcodeResolver::get_postcode(self, lon, lat)
    }
}
