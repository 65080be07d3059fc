//! Navigation capability used by enemies.
//!
//! The agent only asks for "go there" and reads back a velocity; how the path
//! is found is not its concern. `NavAgent` steers in a straight line over the
//! walkable regions of the arena's `NavMesh`, which is enough for open arenas
//! and keeps the same surface a real navmesh solver would expose.

use bevy::prelude::*;

/// Agents closer than this to their destination stop moving.
const STOPPING_DISTANCE: f32 = 0.1;

/// Movement request state for one agent.
#[derive(Component, Debug, Clone)]
pub struct NavAgent {
    destination: Option<Vec3>,
    velocity: Vec3,
    speed: f32,
    stopped: bool,
    enabled: bool,
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self {
            destination: None,
            velocity: Vec3::ZERO,
            speed,
            stopped: false,
            enabled: true,
        }
    }

    pub fn set_destination(&mut self, destination: Vec3) {
        if self.enabled {
            self.destination = Some(destination);
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Current movement velocity (zero while stopped).
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Halt movement immediately.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.velocity = Vec3::ZERO;
    }

    pub fn resume(&mut self) {
        self.stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Permanently switch the agent off (dead enemies).
    pub fn disable(&mut self) {
        self.stop();
        self.enabled = false;
        self.destination = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Compute this tick's displacement from `position` and update velocity.
    ///
    /// Movement is horizontal and never overshoots the destination.
    pub fn steer(&mut self, position: Vec3, dt: f32) -> Vec3 {
        let Some(destination) = self.destination.filter(|_| self.enabled && !self.stopped) else {
            self.velocity = Vec3::ZERO;
            return Vec3::ZERO;
        };

        let to_destination = Vec3::new(destination.x - position.x, 0.0, destination.z - position.z);
        let distance = to_destination.length();
        if distance <= STOPPING_DISTANCE {
            self.velocity = Vec3::ZERO;
            return Vec3::ZERO;
        }

        self.velocity = to_destination / distance * self.speed;
        let step = self.velocity * dt;
        if step.length() > distance {
            to_destination
        } else {
            step
        }
    }
}

/// Axis-aligned walkable rectangle on the XZ plane at a fixed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkableRegion {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
}

impl WalkableRegion {
    fn closest_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            self.height,
            point.z.clamp(self.min.y, self.max.y),
        )
    }
}

/// Walkable surface of the current arena.
#[derive(Resource, Debug, Clone, Default)]
pub struct NavMesh {
    pub regions: Vec<WalkableRegion>,
}

impl NavMesh {
    pub fn new(regions: Vec<WalkableRegion>) -> Self {
        Self { regions }
    }

    /// Snap `point` to the nearest walkable point within `max_distance`.
    ///
    /// Returns `None` when no walkable surface is close enough.
    pub fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        self.regions
            .iter()
            .map(|region| region.closest_point(point))
            .map(|candidate| (candidate, candidate.distance(point)))
            .filter(|(_, distance)| *distance <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate)
    }
}

/// Move every navigating agent along its requested velocity.
pub fn steer_agents(time: Res<Time>, mut query: Query<(&mut NavAgent, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut agent, mut transform) in query.iter_mut() {
        let step = agent.steer(transform.translation, dt);
        transform.translation += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steer_moves_toward_destination() {
        let mut agent = NavAgent::new(2.0);
        agent.set_destination(Vec3::new(10.0, 0.0, 0.0));

        let step = agent.steer(Vec3::ZERO, 0.5);
        assert!((step - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        assert!((agent.velocity().length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_steer_never_overshoots() {
        let mut agent = NavAgent::new(100.0);
        agent.set_destination(Vec3::new(1.0, 0.0, 0.0));
        let step = agent.steer(Vec3::ZERO, 1.0);
        assert!((step - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_stopped_agent_has_zero_velocity() {
        let mut agent = NavAgent::new(2.0);
        agent.set_destination(Vec3::new(10.0, 0.0, 0.0));
        agent.steer(Vec3::ZERO, 0.1);

        agent.stop();
        assert_eq!(agent.velocity(), Vec3::ZERO);
        assert_eq!(agent.steer(Vec3::ZERO, 0.1), Vec3::ZERO);

        agent.resume();
        assert_ne!(agent.steer(Vec3::ZERO, 0.1), Vec3::ZERO);
    }

    #[test]
    fn test_disabled_agent_ignores_destinations() {
        let mut agent = NavAgent::new(2.0);
        agent.disable();
        agent.resume();
        agent.set_destination(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(agent.destination(), None);
        assert_eq!(agent.steer(Vec3::ZERO, 0.1), Vec3::ZERO);
    }

    #[test]
    fn test_sample_position_snaps_to_nearest_region() {
        let navmesh = NavMesh::new(vec![
            WalkableRegion { min: Vec2::new(-5.0, -5.0), max: Vec2::new(5.0, 5.0), height: 0.0 },
            WalkableRegion { min: Vec2::new(20.0, -5.0), max: Vec2::new(30.0, 5.0), height: 1.0 },
        ]);

        let inside = navmesh.sample_position(Vec3::new(1.0, 2.0, 1.0), 5.0);
        assert_eq!(inside, Some(Vec3::new(1.0, 0.0, 1.0)));

        let near_second = navmesh.sample_position(Vec3::new(19.0, 1.0, 0.0), 5.0);
        assert_eq!(near_second, Some(Vec3::new(20.0, 1.0, 0.0)));
    }

    #[test]
    fn test_sample_position_none_when_too_far() {
        let navmesh = NavMesh::new(vec![WalkableRegion {
            min: Vec2::new(-5.0, -5.0),
            max: Vec2::new(5.0, 5.0),
            height: 0.0,
        }]);
        assert_eq!(navmesh.sample_position(Vec3::new(50.0, 0.0, 0.0), 5.0), None);
        assert_eq!(NavMesh::default().sample_position(Vec3::ZERO, 5.0), None);
    }
}
