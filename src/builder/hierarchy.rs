//! Registry of parent/child state relationships.

use tracing::trace;

use crate::core::Value;

/// Children of one parent state, with the designated initial child.
#[derive(Clone)]
pub struct ParentLink {
    parent: Value,
    children: Vec<Value>,
    initial_child: Value,
}

impl ParentLink {
    /// The parent state's identifier.
    pub fn parent(&self) -> &Value {
        &self.parent
    }

    /// The children, in attachment order.
    pub fn children(&self) -> &[Value] {
        &self.children
    }

    /// The child entered by default when the parent is entered.
    pub fn initial_child(&self) -> &Value {
        &self.initial_child
    }
}

/// Owns the parent→children adjacency and each parent's initial child.
///
/// Invariants: a state has at most one parent, no state is its own
/// ancestor, the initial child is always a member of the child set, and a
/// parent holds exactly one initial child while it has any children at
/// all (a childless parent drops its link entirely). All mutations are
/// silent no-ops on invalid input.
#[derive(Default)]
pub struct HierarchyRegistry {
    links: Vec<ParentLink>,
}

impl HierarchyRegistry {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `child` under `parent`. No-op if the two are the same
    /// state, the child already has a parent, or the link would make
    /// `parent` its own ancestor. The first child attached to a parent
    /// becomes its initial child.
    pub fn add_child(&mut self, parent: &Value, child: &Value) {
        if parent == child || self.has_parent(child) || self.is_descendant_of(parent, child) {
            trace!(parent = ?parent, child = ?child, "hierarchy link rejected");
            return;
        }

        match self.link_index(parent) {
            Some(index) => self.links[index].children.push(child.clone()),
            None => self.links.push(ParentLink {
                parent: parent.clone(),
                children: vec![child.clone()],
                initial_child: child.clone(),
            }),
        }
    }

    /// Designate the child entered by default. No-op unless `child` is
    /// attached under `parent`.
    pub fn set_initial_child(&mut self, parent: &Value, child: &Value) {
        if let Some(index) = self.link_index(parent) {
            if self.links[index].children.contains(child) {
                self.links[index].initial_child = child.clone();
            }
        }
    }

    /// Detach `child` from whichever parent holds it. Detaching the
    /// initial child promotes the first remaining child; a parent left
    /// childless drops its link.
    pub fn detach(&mut self, child: &Value) {
        let Some(index) = self
            .links
            .iter()
            .position(|link| link.children.contains(child))
        else {
            return;
        };

        let link = &mut self.links[index];
        link.children.retain(|c| c != child);

        match link.children.first() {
            None => {
                self.links.remove(index);
            }
            Some(first) => {
                if &link.initial_child == child {
                    link.initial_child = first.clone();
                }
            }
        }
    }

    /// Drop every hierarchy membership of `id`: its attachment as a
    /// child, and its link as a parent (its children become roots).
    pub fn remove_all_for(&mut self, id: &Value) {
        self.detach(id);
        self.links.retain(|link| &link.parent != id);
    }

    /// Children attached under `parent`, in attachment order.
    pub fn children_of(&self, parent: &Value) -> &[Value] {
        self.link_of(parent)
            .map(|link| link.children.as_slice())
            .unwrap_or(&[])
    }

    /// The initial child of `parent`, if it has any children.
    pub fn initial_child_of(&self, parent: &Value) -> Option<&Value> {
        self.link_of(parent).map(|link| &link.initial_child)
    }

    /// Whether `id` is attached under some parent.
    pub fn has_parent(&self, id: &Value) -> bool {
        self.links.iter().any(|link| link.children.contains(id))
    }

    /// The parent holding `id`, if any.
    pub fn parent_of(&self, id: &Value) -> Option<&Value> {
        self.links
            .iter()
            .find(|link| link.children.contains(id))
            .map(|link| &link.parent)
    }

    /// All of `states` that have no parent.
    pub fn roots<'a, I>(&self, states: I) -> Vec<Value>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        states
            .into_iter()
            .filter(|id| !self.has_parent(id))
            .cloned()
            .collect()
    }

    /// Whether `id` appears in the subtree rooted at `ancestor`
    /// (excluding `ancestor` itself).
    pub fn is_descendant_of(&self, id: &Value, ancestor: &Value) -> bool {
        let mut pending: Vec<&Value> = self.children_of(ancestor).iter().collect();

        while let Some(current) = pending.pop() {
            if current == id {
                return true;
            }
            pending.extend(self.children_of(current));
        }
        false
    }

    /// All parent links, for persistence and assembly.
    pub fn links(&self) -> &[ParentLink] {
        &self.links
    }

    /// Drop every link.
    pub fn clear(&mut self) {
        self.links.clear();
    }

    fn link_of(&self, parent: &Value) -> Option<&ParentLink> {
        self.links.iter().find(|link| &link.parent == parent)
    }

    fn link_index(&self, parent: &Value) -> Option<usize> {
        self.links.iter().position(|link| &link.parent == parent)
    }
}
