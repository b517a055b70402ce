//! Layer plan: the mutation surface wall ordering writes into.
//!
//! [`LayerPlanner`] is the set of operations the ordering stage needs from a
//! layer plan. [`LayerPlan`] implements it by recording [`PlanCommand`]s in
//! order, which downstream G-code emission replays.

use super::path_config::{GCodePathConfig, PrintFeatureType};
use super::seam::{rotated_indices, ZSeamConfig};
use crate::geometry::{expolygons_contain_point, ExPolygons, Point};
use crate::perimeter::arachne::{ExtrusionJunction, ExtrusionJunctions};
use crate::{Coord, CoordF};
use log::trace;

/// Parameters shared by all walls of one `add_walls` call.
#[derive(Debug, Clone, Copy)]
pub struct WallOptions<'a> {
    /// Profile for regular wall segments.
    pub config: &'a GCodePathConfig,
    /// Profile for wall segments printed over air.
    pub bridge_config: &'a GCodePathConfig,
    /// Seam placement for the loops.
    pub z_seam_config: &'a ZSeamConfig,
    /// Wipe distance after each wall (scaled, 0 = no wipe).
    pub wipe_dist: Coord,
    /// Flow multiplier applied on top of the profile flow.
    pub flow: CoordF,
    /// Retract before travelling to each wall.
    pub always_retract: bool,
}

/// Operations the wall ordering stage performs on a layer plan.
pub trait LayerPlanner {
    /// Switch to `extruder_nr` if needed and prime it.
    fn set_extruder_add_prime(&mut self, extruder_nr: usize);

    /// Mark subsequent moves as inside (or outside) the part.
    fn set_is_inside(&mut self, is_inside: bool);

    /// Append one wall-printing command for a set of closed loops.
    fn add_walls(&mut self, walls: &[ExtrusionJunctions], options: &WallOptions<'_>);

    /// Append a plain travel move.
    fn add_travel_simple(&mut self, to: Point);

    /// Break continuity with the previous path.
    fn force_new_path_start(&mut self);

    /// Last planned position, or the layer start position if nothing is planned.
    fn last_planned_position_or_starting_position(&self) -> Point;
}

/// One wall loop as planned, starting at its seam vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct WallPath {
    /// Feature of the regular profile.
    pub feature: PrintFeatureType,
    /// Junctions rotated so that the seam vertex comes first.
    pub junctions: Vec<ExtrusionJunction>,
    /// Index of the seam vertex in the junction sequence as given.
    pub seam_index: usize,
    /// Regular profile.
    pub config: GCodePathConfig,
    /// Profile for bridged segments.
    pub bridge_config: GCodePathConfig,
    /// Per segment (closing segment last): printed with the bridge profile.
    pub bridged: Vec<bool>,
    /// Flow multiplier.
    pub flow: CoordF,
    /// Wipe distance after the loop (scaled).
    pub wipe_dist: Coord,
}

impl WallPath {
    /// Seam (first) position of the loop.
    pub fn start(&self) -> Option<Point> {
        self.junctions.first().map(|j| j.position)
    }

    /// Number of segments including the closing one.
    pub fn segment_count(&self) -> usize {
        self.bridged.len()
    }

    /// Check if any segment is printed with the bridge profile.
    pub fn has_bridges(&self) -> bool {
        self.bridged.iter().any(|&b| b)
    }
}

/// A recorded layer plan operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanCommand {
    /// Active extruder changed.
    SetExtruder(usize),
    /// Extruder primed.
    Prime(usize),
    /// Inside flag changed.
    SetInside(bool),
    /// Travel move.
    Travel { to: Point, retract: bool },
    /// The next extrusion starts a new path.
    ForceNewPathStart,
    /// A wall loop.
    Wall(WallPath),
}

/// Recording layer plan for one layer.
#[derive(Debug, Clone)]
pub struct LayerPlan {
    layer_nr: usize,
    start_position: Point,
    last_position: Option<Point>,
    current_extruder: Option<usize>,
    is_inside: bool,
    bridge_regions: ExPolygons,
    commands: Vec<PlanCommand>,
}

impl LayerPlan {
    /// Create an empty plan starting at `start_position`.
    pub fn new(layer_nr: usize, start_position: Point) -> Self {
        Self {
            layer_nr,
            start_position,
            last_position: None,
            current_extruder: None,
            is_inside: false,
            bridge_regions: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Builder method: areas without support from the layer below.
    ///
    /// Wall segments whose midpoint lies in one of these areas are printed with
    /// the bridge profile.
    pub fn with_bridge_regions(mut self, regions: ExPolygons) -> Self {
        self.bridge_regions = regions;
        self
    }

    pub fn layer_nr(&self) -> usize {
        self.layer_nr
    }

    pub fn is_inside(&self) -> bool {
        self.is_inside
    }

    pub fn current_extruder(&self) -> Option<usize> {
        self.current_extruder
    }

    /// Recorded commands in order.
    pub fn commands(&self) -> &[PlanCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<PlanCommand> {
        self.commands
    }

    /// Iterator over the planned wall loops.
    pub fn wall_paths(&self) -> impl Iterator<Item = &WallPath> {
        self.commands.iter().filter_map(|c| match c {
            PlanCommand::Wall(wall) => Some(wall),
            _ => None,
        })
    }

    fn is_bridged(&self, a: Point, b: Point) -> bool {
        if self.bridge_regions.is_empty() {
            return false;
        }
        let mid = Point::new(a.x + (b.x - a.x) / 2, a.y + (b.y - a.y) / 2);
        expolygons_contain_point(&self.bridge_regions, &mid)
    }

    fn plan_wall(&self, wall: &[ExtrusionJunction], options: &WallOptions<'_>) -> Option<WallPath> {
        let points: Vec<Point> = wall.iter().map(|j| j.position).collect();
        let from = self.last_planned_position_or_starting_position();
        let seam_index = options.z_seam_config.find_start_index(&points, from)?;

        let junctions: Vec<ExtrusionJunction> = rotated_indices(wall.len(), seam_index)
            .map(|i| wall[i])
            .collect();
        let bridged = if junctions.len() < 2 {
            Vec::new()
        } else {
            (0..junctions.len())
                .map(|i| {
                    let next = (i + 1) % junctions.len();
                    self.is_bridged(junctions[i].position, junctions[next].position)
                })
                .collect()
        };

        Some(WallPath {
            feature: options.config.feature,
            junctions,
            seam_index,
            config: options.config.clone(),
            bridge_config: options.bridge_config.clone(),
            bridged,
            flow: options.flow,
            wipe_dist: options.wipe_dist,
        })
    }
}

impl LayerPlanner for LayerPlan {
    fn set_extruder_add_prime(&mut self, extruder_nr: usize) {
        if self.current_extruder != Some(extruder_nr) {
            self.current_extruder = Some(extruder_nr);
            self.commands.push(PlanCommand::SetExtruder(extruder_nr));
        }
        self.commands.push(PlanCommand::Prime(extruder_nr));
    }

    fn set_is_inside(&mut self, is_inside: bool) {
        self.is_inside = is_inside;
        self.commands.push(PlanCommand::SetInside(is_inside));
    }

    fn add_walls(&mut self, walls: &[ExtrusionJunctions], options: &WallOptions<'_>) {
        for wall in walls {
            let Some(path) = self.plan_wall(wall, options) else {
                continue;
            };
            let Some(start) = path.start() else {
                continue;
            };
            trace!(
                "layer {}: {} with {} junctions, seam at {}",
                self.layer_nr,
                path.feature.name(),
                path.junctions.len(),
                start
            );

            self.commands.push(PlanCommand::Travel {
                to: start,
                retract: options.always_retract,
            });
            self.commands.push(PlanCommand::Wall(path));
            // closed loop: the nozzle ends where it started
            self.last_position = Some(start);
        }
    }

    fn add_travel_simple(&mut self, to: Point) {
        self.commands.push(PlanCommand::Travel { to, retract: false });
        self.last_position = Some(to);
    }

    fn force_new_path_start(&mut self) {
        self.commands.push(PlanCommand::ForceNewPathStart);
    }

    fn last_planned_position_or_starting_position(&self) -> Point {
        self.last_position.unwrap_or(self.start_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EZSeamCornerPrefType, EZSeamType};
    use crate::geometry::{ExPolygon, Polygon};
    use crate::gcode::MeshPathConfigs;
    use crate::scale;

    fn square_loop(min: f64, max: f64) -> ExtrusionJunctions {
        Polygon::rectangle(Point::new_scale(min, min), Point::new_scale(max, max))
            .iter()
            .map(|&p| ExtrusionJunction::new(p, scale(0.4), 0))
            .collect()
    }

    #[test]
    fn test_start_position() {
        let mut plan = LayerPlan::new(3, Point::new_scale(1.0, 2.0));
        assert_eq!(plan.layer_nr(), 3);
        assert_eq!(
            plan.last_planned_position_or_starting_position(),
            Point::new_scale(1.0, 2.0)
        );

        plan.add_travel_simple(Point::new_scale(5.0, 5.0));
        assert_eq!(
            plan.last_planned_position_or_starting_position(),
            Point::new_scale(5.0, 5.0)
        );
    }

    #[test]
    fn test_extruder_switch_recorded_once() {
        let mut plan = LayerPlan::new(0, Point::zero());
        plan.set_extruder_add_prime(1);
        plan.set_extruder_add_prime(1);
        assert_eq!(
            plan.commands(),
            &[
                PlanCommand::SetExtruder(1),
                PlanCommand::Prime(1),
                PlanCommand::Prime(1)
            ]
        );
        assert_eq!(plan.current_extruder(), Some(1));
    }

    #[test]
    fn test_add_walls_rotates_to_seam() {
        let configs = MeshPathConfigs::default();
        let seam = ZSeamConfig::new(
            EZSeamType::Shortest,
            Point::zero(),
            EZSeamCornerPrefType::None,
        );
        let options = WallOptions {
            config: &configs.inset0_config,
            bridge_config: &configs.bridge_inset0_config,
            z_seam_config: &seam,
            wipe_dist: scale(0.2),
            flow: 1.0,
            always_retract: true,
        };

        let mut plan = LayerPlan::new(0, Point::new_scale(11.0, 11.0));
        plan.add_walls(&[square_loop(0.0, 10.0), Vec::new()], &options);

        let commands = plan.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            PlanCommand::Travel {
                to: Point::new_scale(10.0, 10.0),
                retract: true
            }
        );
        let wall = plan.wall_paths().next().unwrap();
        assert_eq!(wall.seam_index, 2);
        assert_eq!(wall.feature, PrintFeatureType::OuterWall);
        assert_eq!(wall.segment_count(), 4);
        assert!(!wall.has_bridges());
        assert_eq!(wall.wipe_dist, scale(0.2));
        assert_eq!(
            plan.last_planned_position_or_starting_position(),
            Point::new_scale(10.0, 10.0)
        );
    }

    #[test]
    fn test_add_walls_marks_bridges() {
        let configs = MeshPathConfigs::default();
        let seam = ZSeamConfig::default();
        let options = WallOptions {
            config: &configs.inset_x_config,
            bridge_config: &configs.bridge_inset_x_config,
            z_seam_config: &seam,
            wipe_dist: 0,
            flow: 1.0,
            always_retract: false,
        };
        // unsupported area under the right-hand edge of the loop
        let gap = ExPolygon::new(Polygon::rectangle(
            Point::new_scale(9.0, -1.0),
            Point::new_scale(11.0, 11.0),
        ));

        let mut plan = LayerPlan::new(0, Point::zero()).with_bridge_regions(vec![gap]);
        plan.add_walls(&[square_loop(0.0, 10.0)], &options);

        let wall = plan.wall_paths().next().unwrap();
        assert_eq!(wall.bridged.iter().filter(|&&b| b).count(), 1);
        // seam at (0, 0); the segment (10, 0) -> (10, 10) is second
        assert_eq!(wall.bridged, vec![false, true, false, false]);
    }
}
