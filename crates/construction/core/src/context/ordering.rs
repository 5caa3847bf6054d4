//! Dependency ordering of components within a phase.

use core::fmt::Display;

use crate::error::ConstructionError;

/// Orders nodes so that every node runs after the nodes whose kind it lists
/// in its prerequisites.
///
/// Each node is `(kind, prerequisites)`. Among nodes that are ready at the
/// same time the one declared first wins, so components without constraints
/// keep their stage order. Returns indices into `nodes`.
pub(crate) fn dependency_order<K>(
    phase: &impl Display,
    nodes: &[(K, &[K])],
) -> Result<Vec<usize>, ConstructionError>
where
    K: Copy + PartialEq + Display,
{
    let count = nodes.len();
    let mut pending = vec![0usize; count];
    let mut successors = vec![Vec::new(); count];
    for (after, (_, prerequisites)) in nodes.iter().enumerate() {
        for (before, (kind, _)) in nodes.iter().enumerate() {
            if before != after && prerequisites.contains(kind) {
                successors[before].push(after);
                pending[after] += 1;
            }
        }
    }

    let mut placed = vec![false; count];
    let mut order = Vec::with_capacity(count);
    while order.len() < count {
        let Some(next) = (0..count).find(|&node| !placed[node] && pending[node] == 0) else {
            return Err(ConstructionError::OrderingCycle {
                phase: phase.to_string(),
                components: (0..count)
                    .filter(|&node| !placed[node])
                    .map(|node| nodes[node].0.to_string())
                    .collect(),
            });
        };
        placed[next] = true;
        order.push(next);
        for &successor in &successors[next] {
            pending[successor] -= 1;
        }
    }
    Ok(order)
}
