//! Schema-wide ignore rules.
//!
//! Ignored shapes disappear from the name index and from every structure that
//! used them as a member. Ignored field paths remove a single member from the
//! structure the path's parent resolves to.

use tracing::warn;

use crate::fieldpath::FieldPath;
use crate::shape::{Api, ShapeKind, ShapeRef};

impl Api {
    /// Remove ignored shapes and member paths before any model is derived.
    ///
    /// Names and paths that do not exist in this schema are skipped with a
    /// warning, since ignore lists are often shared across schema versions.
    pub fn apply_ignore_rules(&mut self, shape_names: &[String], field_paths: &[String]) {
        for name in shape_names {
            let Some(id) = self.unindex_shape(name) else {
                warn!(shape = %name, "ignored shape not found in schema");
                continue;
            };
            let ids: Vec<_> = self.shapes().map(|(id, _)| id).collect();
            for owner in ids {
                if let ShapeKind::Structure { members } = &mut self.shape_mut(owner).kind {
                    members.retain(|_, member| member.shape != id);
                }
            }
        }

        for dotted in field_paths {
            if !self.remove_member_at(&FieldPath::parse(dotted)) {
                warn!(path = %dotted, "ignored field path not found in schema");
            }
        }
    }

    /// Delete the member addressed by `path`, whose first segment names a shape.
    fn remove_member_at(&mut self, path: &FieldPath) -> bool {
        if path.size() < 2 {
            return false;
        }
        let Some(root_id) = self.shape_id(path.front()) else {
            return false;
        };
        let root = ShapeRef::new(path.front(), root_id);
        let Some(parent) = path.resolve_at(self, &root, path.size() - 2) else {
            return false;
        };
        let parent_id = self.container_ref(parent).shape;
        let target = path.back();
        match &mut self.shape_mut(parent_id).kind {
            ShapeKind::Structure { members } => {
                let key = members
                    .keys()
                    .find(|key| key.eq_ignore_ascii_case(target))
                    .cloned();
                key.is_some_and(|key| members.remove(&key).is_some())
            }
            _ => false,
        }
    }
}
