//! Collision events and the handlers they are delivered to

use crate::body::RigidBodyHandle;
use glam::Vec3;
use rapier3d::prelude as rapier;

/// A new contact, seen from one of the two bodies involved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Body this event is addressed to
    pub body: RigidBodyHandle,
    /// Body it collided with (`None` for colliders without a body)
    pub other: Option<RigidBodyHandle>,
    /// Closing speed along the contact normal at the moment of contact.
    /// Positive when the bodies move toward each other.
    pub impact_velocity_along_normal: f32,
    /// Contact point in world space
    pub contact_point: Option<Vec3>,
    /// Contact normal pointing from `body` toward `other`
    pub normal: Vec3,
    /// Simulated time of the substep that produced the contact
    pub time: f64,
}

impl CollisionEvent {
    /// The same contact addressed to the other body.
    ///
    /// Closing speed is symmetric, only the normal flips.
    pub fn mirrored(&self, body: RigidBodyHandle) -> Self {
        Self {
            body,
            other: Some(self.body),
            normal: -self.normal,
            ..*self
        }
    }
}

/// Receives collision events synchronously while the world steps
pub trait CollisionHandler {
    /// Called once per new contact for every subscribed body involved
    fn on_collide(&mut self, event: &CollisionEvent);
}

impl<F> CollisionHandler for F
where
    F: FnMut(&CollisionEvent),
{
    fn on_collide(&mut self, event: &CollisionEvent) {
        self(event)
    }
}

/// Handler that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHandler;

impl CollisionHandler for NullHandler {
    fn on_collide(&mut self, _event: &CollisionEvent) {}
}

/// Handler that keeps every delivered event
#[derive(Debug, Default)]
pub struct EventCollector {
    /// Delivered events, oldest first
    pub events: Vec<CollisionEvent>,
}

impl EventCollector {
    /// Create a new event collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all collected events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events addressed to one body
    pub fn for_body(&self, body: RigidBodyHandle) -> impl Iterator<Item = &CollisionEvent> {
        self.events.iter().filter(move |e| e.body == body)
    }
}

impl CollisionHandler for EventCollector {
    fn on_collide(&mut self, event: &CollisionEvent) {
        self.events.push(*event);
    }
}

/// Channel-based event collector for Rapier
pub(crate) struct ChannelEventCollector {
    pub(crate) collision_events: crossbeam_channel::Sender<rapier::CollisionEvent>,
}

impl rapier::EventHandler for ChannelEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        event: rapier::CollisionEvent,
        _contact_pair: Option<&rapier::ContactPair>,
    ) {
        let _ = self.collision_events.send(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        _contact_pair: &rapier::ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(index: u32) -> RigidBodyHandle {
        RigidBodyHandle::from_raw(rapier::RigidBodyHandle::from_raw_parts(index, 0))
    }

    fn event() -> CollisionEvent {
        CollisionEvent {
            body: handle(1),
            other: Some(handle(2)),
            impact_velocity_along_normal: 4.0,
            contact_point: Some(Vec3::ZERO),
            normal: Vec3::Y,
            time: 0.5,
        }
    }

    #[test]
    fn test_mirrored_keeps_strength() {
        let mirrored = event().mirrored(handle(2));
        assert_eq!(mirrored.body, handle(2));
        assert_eq!(mirrored.other, Some(handle(1)));
        assert_eq!(mirrored.normal, -Vec3::Y);
        assert_eq!(mirrored.impact_velocity_along_normal, 4.0);
        assert_eq!(mirrored.time, 0.5);
    }

    #[test]
    fn test_closure_handler() {
        let mut seen = 0;
        {
            let mut handler = |_: &CollisionEvent| seen += 1;
            handler.on_collide(&event());
            handler.on_collide(&event());
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_collector_filters_by_body() {
        let mut collector = EventCollector::new();
        collector.on_collide(&event());
        collector.on_collide(&event().mirrored(handle(2)));
        assert_eq!(collector.for_body(handle(2)).count(), 1);
        collector.clear();
        assert!(collector.events.is_empty());
    }
}
