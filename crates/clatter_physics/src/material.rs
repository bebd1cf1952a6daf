//! Contact materials: named surfaces and the coefficients used when two meet

use crate::error::{PhysicsError, Result};
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Interned material name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u32);

impl MaterialId {
    /// Raw index into the owning table
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Friction and restitution applied to a contact between two materials
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactMaterial {
    /// Friction coefficient, 0 = frictionless
    pub friction: f32,
    /// Restitution/bounciness (0 = no bounce, 1 = perfect bounce)
    pub restitution: f32,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.0,
        }
    }
}

impl ContactMaterial {
    /// Create a new contact material
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }

    /// Check the coefficient ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(PhysicsError::InvalidMaterial(format!(
                "friction must be >= 0, got {}",
                self.friction
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(PhysicsError::InvalidMaterial(format!(
                "restitution must be within [0, 1], got {}",
                self.restitution
            )));
        }
        Ok(())
    }
}

/// Symmetric lookup from material pairs to contact coefficients
#[derive(Debug, Clone, Default)]
pub struct ContactMaterialTable {
    names: Vec<String>,
    pairs: HashMap<(MaterialId, MaterialId), ContactMaterial>,
    default: Option<ContactMaterial>,
}

impl ContactMaterialTable {
    /// Create an empty table with no default
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a material name, returning the existing id if already known
    pub fn material(&mut self, name: &str) -> MaterialId {
        if let Some(id) = self.material_id(name) {
            return id;
        }
        let id = MaterialId(self.names.len() as u32);
        self.names.push(name.to_string());
        id
    }

    /// Look up a material name without interning it
    pub fn material_id(&self, name: &str) -> Option<MaterialId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| MaterialId(i as u32))
    }

    /// Name of an interned material
    pub fn name(&self, id: MaterialId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Register the coefficients used when `a` meets `b` (either order)
    pub fn add_contact_material(
        &mut self,
        a: MaterialId,
        b: MaterialId,
        contact: ContactMaterial,
    ) -> Result<()> {
        contact.validate()?;
        self.pairs.insert(pair_key(a, b), contact);
        Ok(())
    }

    /// Set the fallback used when no specific pair matches, replacing any previous one
    pub fn set_default(&mut self, contact: ContactMaterial) -> Result<()> {
        contact.validate()?;
        self.default = Some(contact);
        Ok(())
    }

    /// The registered fallback
    pub fn default_contact(&self) -> Option<ContactMaterial> {
        self.default
    }

    /// Whether a fallback has been registered
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Number of explicit pair entries
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Coefficients for a contact between two (possibly unassigned) materials
    pub fn resolve(&self, a: Option<MaterialId>, b: Option<MaterialId>) -> Result<ContactMaterial> {
        let specific = match (a, b) {
            (Some(a), Some(b)) => self.pairs.get(&pair_key(a, b)).copied(),
            _ => None,
        };
        specific
            .or(self.default)
            .ok_or(PhysicsError::MissingDefaultContactMaterial)
    }
}

fn pair_key(a: MaterialId, b: MaterialId) -> (MaterialId, MaterialId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Colliders carry their material in `user_data`; 0 means unassigned.
pub(crate) fn material_to_user_data(material: Option<MaterialId>) -> u128 {
    material.map_or(0, |m| m.0 as u128 + 1)
}

pub(crate) fn material_from_user_data(user_data: u128) -> Option<MaterialId> {
    user_data.checked_sub(1).map(|raw| MaterialId(raw as u32))
}

/// Rewrites every solver contact with the table's coefficients for the pair
pub(crate) struct MaterialHooks<'a> {
    pub(crate) table: &'a ContactMaterialTable,
}

impl rapier::PhysicsHooks for MaterialHooks<'_> {
    fn modify_solver_contacts(&self, context: &mut rapier::ContactModificationContext) {
        let m1 = context
            .colliders
            .get(context.collider1)
            .and_then(|c| material_from_user_data(c.user_data));
        let m2 = context
            .colliders
            .get(context.collider2)
            .and_then(|c| material_from_user_data(c.user_data));

        // The world refuses to step without a default, so this only misses on a bug.
        let Ok(contact) = self.table.resolve(m1, m2) else {
            return;
        };

        for solver_contact in context.solver_contacts.iter_mut() {
            solver_contact.friction = contact.friction;
            solver_contact.restitution = contact.restitution;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (ContactMaterialTable, MaterialId, MaterialId) {
        let mut table = ContactMaterialTable::new();
        let concrete = table.material("concrete");
        let plastic = table.material("plastic");
        table
            .add_contact_material(concrete, plastic, ContactMaterial::new(0.1, 0.7))
            .unwrap();
        table.set_default(ContactMaterial::new(0.3, 0.2)).unwrap();
        (table, concrete, plastic)
    }

    #[test]
    fn test_interning_is_stable() {
        let mut table = ContactMaterialTable::new();
        let a = table.material("concrete");
        let b = table.material("concrete");
        assert_eq!(a, b);
        assert_eq!(table.name(a), Some("concrete"));
        assert_eq!(table.material_id("rubber"), None);
    }

    #[test]
    fn test_resolve_is_symmetric() {
        let (table, concrete, plastic) = table();
        let pairs = [
            (Some(concrete), Some(plastic)),
            (Some(concrete), Some(concrete)),
            (Some(plastic), None),
            (None, None),
        ];
        for (a, b) in pairs {
            assert_eq!(table.resolve(a, b).unwrap(), table.resolve(b, a).unwrap());
        }
        assert_eq!(
            table.resolve(Some(plastic), Some(concrete)).unwrap(),
            ContactMaterial::new(0.1, 0.7)
        );
    }

    #[test]
    fn test_unmatched_pair_uses_default() {
        let (table, concrete, _) = table();
        assert_eq!(
            table.resolve(Some(concrete), None).unwrap(),
            ContactMaterial::new(0.3, 0.2)
        );
        assert_eq!(
            table.resolve(Some(concrete), Some(concrete)).unwrap(),
            ContactMaterial::new(0.3, 0.2)
        );
    }

    #[test]
    fn test_missing_default_is_an_error() {
        let table = ContactMaterialTable::new();
        assert_eq!(
            table.resolve(None, None),
            Err(PhysicsError::MissingDefaultContactMaterial)
        );
    }

    #[test]
    fn test_set_default_replaces() {
        let mut table = ContactMaterialTable::new();
        table.set_default(ContactMaterial::new(0.5, 0.5)).unwrap();
        table.set_default(ContactMaterial::new(0.1, 0.7)).unwrap();
        assert_eq!(table.default_contact(), Some(ContactMaterial::new(0.1, 0.7)));
    }

    #[test]
    fn test_rejects_out_of_range_coefficients() {
        let mut table = ContactMaterialTable::new();
        let a = table.material("a");
        assert!(table
            .add_contact_material(a, a, ContactMaterial::new(-0.1, 0.5))
            .is_err());
        assert!(table.set_default(ContactMaterial::new(0.1, 1.5)).is_err());
        assert!(!table.has_default());
        assert_eq!(table.pair_count(), 0);
    }

    #[test]
    fn test_user_data_round_trip() {
        assert_eq!(material_from_user_data(material_to_user_data(None)), None);
        let mut table = ContactMaterialTable::new();
        let id = table.material("x");
        assert_eq!(material_from_user_data(material_to_user_data(Some(id))), Some(id));
    }
}
