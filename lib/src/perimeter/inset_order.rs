//! Wall (inset) ordering and emission for one part on one layer.
//!
//! # Overview
//!
//! The wall toolpaths of a part are binned by inset depth. The bins are then
//! walked outer-first (ascending depth) or inner-first (descending depth);
//! every non-empty bin primes the extruder, marks the plan as inside the part
//! and emits its walls with the outer or inner wall profile. Empty bins are
//! skipped without touching the plan.
//!
//! Within a bin the walls are sequenced by an [`InsetOrderPolicy`]:
//! - [`IndexedOrder`] keeps the order the wall generator produced
//! - [`OptimizedOrder`] prints each wall right after the wall it nests against
//!   in the previously printed bin
//!
//! [`InsetOrderOptimizer::move_inside`] repositions the nozzle inside the outer
//! wall before a loop starts, so a retraction does not happen on top of the
//! freshly printed outer wall.

use crate::clipper::{offset_polygons, polygons_intersect, OffsetJoinType};
use crate::gcode::{LayerPlanner, MeshPathConfigs, WallOptions, ZSeamConfig};
use crate::geometry::polygon_utils::{move_inside, polygon_outlines_adjacent};
use crate::geometry::{expolygons_contain_point, ExPolygons, Polygon};
use crate::perimeter::arachne::{ExtrusionJunctions, VariableWidthPaths};
use crate::slice::{SliceLayerPart, SliceMeshStorage};
use crate::{scale, unscale, Coord, CoordF};
use log::{debug, trace, warn};
use std::cell::OnceCell;
use std::cmp::{Ordering, Reverse};

/// Wall toolpaths binned by inset depth: bin `i` holds the junction sequences
/// of every line with `inset_idx == i`.
pub type BinJunctions = Vec<Vec<ExtrusionJunctions>>;

/// Flow multiplier for all walls.
const WALL_FLOW: CoordF = 1.0;

/// Clearance of the moved-inside point from the outer wall, in outer wall widths.
const MOVE_INSIDE_FACTOR: CoordF = 1.1;

/// Number of move-inside attempts before giving up.
const MOVE_INSIDE_ATTEMPTS: usize = 2;

/// Adjacency tolerance between neighbouring walls, in wall widths.
const ADJACENCY_GAP_FACTOR: CoordF = 1.1;

/// Sequencing of the walls within one bin.
pub trait InsetOrderPolicy {
    /// Compare two walls of the same bin.
    ///
    /// `previous_bin` holds the walls of the bin printed just before this one,
    /// in the order they were printed (empty for the first bin).
    fn compare(
        &self,
        previous_bin: &[ExtrusionJunctions],
        a: &ExtrusionJunctions,
        b: &ExtrusionJunctions,
    ) -> Ordering;

    /// Sort a bin in place. The sort is stable, so `Equal` keeps input order.
    fn order_bin(&self, previous_bin: &[ExtrusionJunctions], bin: &mut [ExtrusionJunctions]) {
        bin.sort_by(|a, b| self.compare(previous_bin, a, b));
    }
}

/// Keep walls in the order the wall generator produced them.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedOrder;

impl InsetOrderPolicy for IndexedOrder {
    fn compare(
        &self,
        _previous_bin: &[ExtrusionJunctions],
        _a: &ExtrusionJunctions,
        _b: &ExtrusionJunctions,
    ) -> Ordering {
        Ordering::Equal
    }

    fn order_bin(&self, _previous_bin: &[ExtrusionJunctions], _bin: &mut [ExtrusionJunctions]) {}
}

/// Print each wall after the wall it nests against in the previous bin.
///
/// Walls are keyed by the index of their adjacent wall in the previously
/// printed bin, which encloses them outside-in and is enclosed by them
/// inside-out (see [`find_adjacent_enclosing_poly`]). Walls with
/// no such neighbour come last, larger enclosed area first, so a contour is
/// printed before the holes inside it.
#[derive(Debug, Clone, Copy)]
pub struct OptimizedOrder {
    /// Largest distance at which two walls count as neighbours (scaled).
    pub max_gap: Coord,
}

impl OptimizedOrder {
    pub fn new(max_gap: Coord) -> Self {
        Self { max_gap }
    }

    /// Tolerance derived from the wall widths of a mesh.
    pub fn for_mesh(mesh_config: &MeshPathConfigs) -> Self {
        Self::new(adjacency_gap(
            mesh_config.inset0_config.line_width(),
            mesh_config.inset_x_config.line_width(),
        ))
    }

    fn sort_key(
        &self,
        candidates: &[Polygon],
        wall: &ExtrusionJunctions,
    ) -> (usize, Reverse<i128>) {
        let polygon = junctions_to_polygon(wall);
        match find_adjacent_neighbour(&polygon, candidates, self.max_gap) {
            Some(idx) => (idx, Reverse(0)),
            None => (usize::MAX, Reverse(polygon.area() as i128)),
        }
    }
}

impl InsetOrderPolicy for OptimizedOrder {
    fn compare(
        &self,
        previous_bin: &[ExtrusionJunctions],
        a: &ExtrusionJunctions,
        b: &ExtrusionJunctions,
    ) -> Ordering {
        let candidates: Vec<Polygon> = previous_bin.iter().map(junctions_to_polygon).collect();
        self.sort_key(&candidates, a).cmp(&self.sort_key(&candidates, b))
    }

    fn order_bin(&self, previous_bin: &[ExtrusionJunctions], bin: &mut [ExtrusionJunctions]) {
        // one adjacency search per wall instead of one per comparison
        let candidates: Vec<Polygon> = previous_bin.iter().map(junctions_to_polygon).collect();
        bin.sort_by_cached_key(|wall| self.sort_key(&candidates, wall));
    }
}

fn junctions_to_polygon(junctions: &ExtrusionJunctions) -> Polygon {
    junctions.iter().map(|j| j.position).collect()
}

/// Find the first candidate that overlaps `wall` with outlines within `max_gap`.
///
/// The previous bin is the outer neighbour when printing outside-in and the
/// inner one when printing inside-out, so adjacency is accepted measured from
/// either outline.
fn find_adjacent_neighbour(
    wall: &Polygon,
    candidates: &[Polygon],
    max_gap: Coord,
) -> Option<usize> {
    candidates.iter().position(|candidate| {
        polygons_intersect(candidate, wall)
            && (polygon_outlines_adjacent(wall, candidate, max_gap)
                || polygon_outlines_adjacent(candidate, wall, max_gap))
    })
}

/// Find the first candidate that encloses `enclosed` and runs within
/// `max_gap` of it.
///
/// Holes never overlap, so an area intersection together with outline
/// adjacency is enough to tell that `enclosed` sits directly inside the
/// candidate. Ties go to the earliest candidate.
pub fn find_adjacent_enclosing_poly(
    enclosed: &Polygon,
    candidates: &[&Polygon],
    max_gap: Coord,
) -> Option<usize> {
    candidates.iter().position(|enclosing| {
        polygons_intersect(enclosing, enclosed)
            && polygon_outlines_adjacent(enclosed, enclosing, max_gap)
    })
}

/// Bin wall toolpaths by inset depth.
///
/// The bin vector is pre-sized to the number of groups and grows when a depth
/// lies beyond it. A group's depth is that of its first line; empty groups
/// are skipped.
pub fn variable_width_path_to_bin_junctions(toolpaths: &VariableWidthPaths) -> BinJunctions {
    let mut insets: BinJunctions = vec![Vec::new(); toolpaths.len()];
    for path in toolpaths {
        let Some(first) = path.first() else {
            continue;
        };
        let inset_index = first.inset_idx;
        if insets.len() <= inset_index {
            insets.resize_with(inset_index + 1, Vec::new);
        }

        for line in path {
            if line.inset_idx != inset_index {
                warn!(
                    "wall group mixes inset {} into inset {}; binning with the group",
                    line.inset_idx, inset_index
                );
            }
            insets[inset_index].push(line.junctions.clone());
        }
    }
    insets
}

/// Orders and emits the walls of one part on one layer.
///
/// An optimizer is built per (mesh, layer, part, extruder) and borrows the
/// layer plan for its lifetime.
pub struct InsetOrderOptimizer<'a, P: LayerPlanner + ?Sized> {
    plan: &'a mut P,
    mesh: &'a SliceMeshStorage,
    extruder_nr: usize,
    mesh_config: &'a MeshPathConfigs,
    part: &'a SliceLayerPart,
    layer_nr: usize,
    z_seam_config: ZSeamConfig,
    added_something: bool,
    retraction_region: OnceCell<ExPolygons>,
}

impl<'a, P: LayerPlanner + ?Sized> InsetOrderOptimizer<'a, P> {
    pub fn new(
        plan: &'a mut P,
        mesh: &'a SliceMeshStorage,
        extruder_nr: usize,
        mesh_config: &'a MeshPathConfigs,
        part: &'a SliceLayerPart,
        layer_nr: usize,
    ) -> Self {
        let z_seam_config = ZSeamConfig::new(
            mesh.settings.z_seam_type,
            mesh.z_seam_hint(),
            mesh.settings.z_seam_corner,
        );
        Self {
            plan,
            mesh,
            extruder_nr,
            mesh_config,
            part,
            layer_nr,
            z_seam_config,
            added_something: false,
            retraction_region: OnceCell::new(),
        }
    }

    /// Seam configuration used for every bin.
    pub fn z_seam_config(&self) -> &ZSeamConfig {
        &self.z_seam_config
    }

    /// Whether any wall has been emitted so far.
    pub fn added_something(&self) -> bool {
        self.added_something
    }

    /// Emit the part's walls into the plan. Returns whether any wall was added.
    pub fn optimize(&mut self) -> bool {
        if Self::optimizing_insets_is_worthwhile(self.mesh, self.part) {
            let order = OptimizedOrder::for_mesh(self.mesh_config);
            debug!(
                "layer {}: optimizing wall order (max gap {:.3}mm)",
                self.layer_nr,
                unscale(order.max_gap)
            );
            self.process_insets_ordered(&order)
        } else {
            self.process_insets_ordered(&IndexedOrder)
        }
    }

    /// Walk the bins in the configured direction and emit every non-empty one.
    pub fn process_insets_ordered(&mut self, ordering: &dyn InsetOrderPolicy) -> bool {
        let mut insets = variable_width_path_to_bin_junctions(&self.part.wall_toolpaths);

        let settings = &self.mesh.settings;
        let bin_order: Vec<usize> = if settings.outer_inset_first {
            (0..insets.len()).collect()
        } else {
            (0..insets.len()).rev().collect()
        };
        debug!(
            "layer {}: {} wall bins, {}",
            self.layer_nr,
            insets.len(),
            if settings.outer_inset_first {
                "outer first"
            } else {
                "inner first"
            }
        );

        let retract_before_outer_wall = settings.travel_retract_before_outer_wall;
        let wall_0_wipe_dist = settings.wall_0_wipe_dist_scaled();
        let mut previous_bin: Vec<ExtrusionJunctions> = Vec::new();

        for inset in bin_order {
            if insets[inset].is_empty() {
                // no extruder switch, no travel
                continue;
            }
            let mut bin = std::mem::take(&mut insets[inset]);
            ordering.order_bin(&previous_bin, &mut bin);
            trace!(
                "layer {}: emitting {} walls of inset {}",
                self.layer_nr,
                bin.len(),
                inset
            );

            self.added_something = true;
            self.plan.set_extruder_add_prime(self.extruder_nr);
            self.plan.set_is_inside(true);

            let options = if inset == 0 {
                WallOptions {
                    config: &self.mesh_config.inset0_config,
                    bridge_config: &self.mesh_config.bridge_inset0_config,
                    z_seam_config: &self.z_seam_config,
                    wipe_dist: wall_0_wipe_dist,
                    flow: WALL_FLOW,
                    always_retract: retract_before_outer_wall,
                }
            } else {
                WallOptions {
                    config: &self.mesh_config.inset_x_config,
                    bridge_config: &self.mesh_config.bridge_inset_x_config,
                    z_seam_config: &self.z_seam_config,
                    wipe_dist: 0,
                    flow: WALL_FLOW,
                    always_retract: false,
                }
            };
            self.plan.add_walls(&bin, &options);
            previous_bin = bin;
        }
        self.added_something
    }

    /// Region at least one outer wall width inside the outer wall centerline.
    ///
    /// Computed on first access and kept for the optimizer's lifetime.
    pub fn retraction_region(&self) -> &ExPolygons {
        self.retraction_region.get_or_init(|| {
            let outer_wall_line_width = self.mesh_config.inset0_config.line_width();
            match self.part.insets.first() {
                Some(outer) => offset_polygons(
                    outer,
                    -unscale(outer_wall_line_width),
                    OffsetJoinType::Miter,
                ),
                None => Vec::new(),
            }
        })
    }

    /// Move the plan's current position inside the part before a loop starts.
    ///
    /// The position is stepped 1.1 outer wall widths inside the outer wall and
    /// committed with a travel once it lies inside the retraction region. A
    /// second step is tried when the first one only slid along an edge, as
    /// happens after a wall ends in a corner. Otherwise the plan is untouched.
    pub fn move_inside(&mut self) {
        let part = self.part;
        let Some(outer) = part.insets.first() else {
            return;
        };
        let outer_wall_line_width = self.mesh_config.inset0_config.line_width();
        let distance = (outer_wall_line_width as CoordF * MOVE_INSIDE_FACTOR) as Coord;

        let mut p = self.plan.last_planned_position_or_starting_position();
        for attempt in 1..=MOVE_INSIDE_ATTEMPTS {
            if move_inside(outer, &mut p, distance).is_none() {
                debug!("layer {}: no usable outer wall to move inside", self.layer_nr);
                return;
            }
            if expolygons_contain_point(self.retraction_region(), &p) {
                trace!(
                    "layer {}: moved inside to {} on attempt {}",
                    self.layer_nr,
                    p,
                    attempt
                );
                self.plan.add_travel_simple(p);
                self.plan.force_new_path_start();
                return;
            }
        }
        debug!(
            "layer {}: {} still too close to the outer wall, not moving",
            self.layer_nr, p
        );
    }

    /// Whether reordering the walls can make any difference.
    ///
    /// False when the optimization is disabled, when the part has no walls, or
    /// when it is a single outline without holes.
    pub fn optimizing_insets_is_worthwhile(
        mesh: &SliceMeshStorage,
        part: &SliceLayerPart,
    ) -> bool {
        if !mesh.settings.optimize_wall_printing_order {
            return false;
        }
        match part.insets.as_slice() {
            [] => false,
            [only] => only.len() >= 2,
            _ => true,
        }
    }
}

/// Maximum adjacency gap for a pair of wall widths (scaled).
pub fn adjacency_gap(outer_width: Coord, inner_width: Coord) -> Coord {
    scale(unscale(outer_width.max(inner_width)) * ADJACENCY_GAP_FACTOR)
}
