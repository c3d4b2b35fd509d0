//! Partitioning demands into independent components.
//!
//! Two demands are connected when they belong to the same class or when
//! their eligible pairs share a teacher or a room. Demands in different
//! components never compete for the same occupancy cell, so components can
//! be searched separately (and concurrently).

use serde::Serialize;

use super::Demand;

/// A set of demands sharing no class, teacher, or room with any other set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Demand indices in global demand order.
    pub demands: Vec<usize>,
    /// Class indices involved, ascending.
    pub classes: Vec<usize>,
}

impl Component {
    /// Total weekly hours in this component.
    pub fn total_units(&self, demands: &[Demand]) -> u64 {
        self.demands.iter().map(|&d| demands[d].required as u64).sum()
    }
}

/// Disjoint-set forest with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

fn link(owner: &mut Option<usize>, d: usize, set: &mut DisjointSet) {
    match *owner {
        Some(first) => set.union(first, d),
        None => *owner = Some(d),
    }
}

/// Splits demands into independent components, ordered by first demand.
pub(crate) fn partition(
    demands: &[Demand],
    class_count: usize,
    teacher_count: usize,
    room_count: usize,
) -> Vec<Component> {
    let mut set = DisjointSet::new(demands.len());
    let mut class_owner: Vec<Option<usize>> = vec![None; class_count];
    let mut teacher_owner: Vec<Option<usize>> = vec![None; teacher_count];
    let mut room_owner: Vec<Option<usize>> = vec![None; room_count];

    for (d, demand) in demands.iter().enumerate() {
        link(&mut class_owner[demand.class], d, &mut set);
        for pair in &demand.pairs {
            link(&mut teacher_owner[pair.teacher], d, &mut set);
            link(&mut room_owner[pair.room], d, &mut set);
        }
    }

    // Roots in order of first appearance keep components in global order
    let mut root_to_component: Vec<Option<usize>> = vec![None; demands.len()];
    let mut components: Vec<Component> = Vec::new();
    for (d, demand) in demands.iter().enumerate() {
        let root = set.find(d);
        let index = match root_to_component[root] {
            Some(index) => index,
            None => {
                components.push(Component {
                    demands: Vec::new(),
                    classes: Vec::new(),
                });
                root_to_component[root] = Some(components.len() - 1);
                components.len() - 1
            }
        };
        let component = &mut components[index];
        component.demands.push(d);
        if !component.classes.contains(&demand.class) {
            component.classes.push(demand.class);
        }
    }

    for component in &mut components {
        component.classes.sort_unstable();
    }
    components
}
